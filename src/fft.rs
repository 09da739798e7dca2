//! Fast Fourier Transform used as the spectral engine of the convolution
//! primitive.
//!
//! Only power-of-two lengths are supported: the convolution pads to the next
//! power of two, and arbitrary-length spectra are what the chirp transform
//! itself is for. A [`FftPlanner`] caches twiddle tables per length with a
//! bounded, least-recently-used eviction policy.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

use crate::fft_kernels::{fft2, fft4, fft8};
pub use crate::num::{Complex, Complex32, Complex64, Float};

/// Number of distinct lengths a planner keeps twiddles for by default.
pub const DEFAULT_PLANNER_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    EmptyInput,
    NonPowerOfTwo,
    MismatchedLengths,
}

impl core::fmt::Display for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "input is empty"),
            FftError::NonPowerOfTwo => write!(f, "length is not a power of two"),
            FftError::MismatchedLengths => write!(f, "input and output lengths differ"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

struct CachedTwiddles<T: Float> {
    table: Arc<[Complex<T>]>,
    last_used: u64,
}

pub struct FftPlanner<T: Float> {
    /// Twiddle tables keyed by transform length. The table for length `n`
    /// has `n/2` entries, `exp(-2πi k / n)` for `k = 0..n/2`.
    cache: HashMap<usize, CachedTwiddles<T>>,
    capacity: usize,
    clock: u64,
    scratch: Vec<Complex<T>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PLANNER_CAPACITY)
    }

    /// Planner that keeps twiddles for at most `lengths` distinct sizes
    /// (at least one).
    pub fn with_capacity(lengths: usize) -> Self {
        Self {
            cache: HashMap::new(),
            capacity: lengths.max(1),
            clock: 0,
            scratch: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lengths currently holding a twiddle table, ascending.
    pub fn cached_lengths(&self) -> Vec<usize> {
        let mut lengths: Vec<usize> = self.cache.keys().copied().collect();
        lengths.sort_unstable();
        lengths
    }

    /// Drop every cached table and the scratch buffer.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.scratch = Vec::new();
    }

    /// Retrieve the twiddle table for length `n`, building it on first use
    /// and evicting the least recently used length when the cache is full.
    pub fn get_twiddles(&mut self, n: usize) -> Arc<[Complex<T>]> {
        self.clock += 1;
        let now = self.clock;
        if let Some(entry) = self.cache.get_mut(&n) {
            entry.last_used = now;
            return Arc::clone(&entry.table);
        }
        if self.cache.len() >= self.capacity {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(&len, _)| len);
            if let Some(len) = oldest {
                self.cache.remove(&len);
                debug_log!("fft planner evicted twiddles for length {}", len);
            }
        }
        let table = twiddle_table::<T>(n);
        self.cache.insert(
            n,
            CachedTwiddles {
                table: Arc::clone(&table),
                last_used: now,
            },
        );
        table
    }
}

fn twiddle_table<T: Float>(n: usize) -> Arc<[Complex<T>]> {
    // Each entry is computed directly; a running recurrence drifts too far
    // for f64 round trips at large n.
    let step = -T::from_f64(2.0 * core::f64::consts::PI / n as f64);
    let table: Vec<Complex<T>> = (0..n / 2)
        .map(|k| Complex::expi(step * T::from_f64(k as f64)))
        .collect();
    Arc::from(table)
}

pub trait FftImpl<T: Float> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
    fn ifft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
    fn fft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.fft(output)
    }
    fn ifft_out_of_place(
        &self,
        input: &[Complex<T>],
        output: &mut [Complex<T>],
    ) -> Result<(), FftError> {
        if input.len() != output.len() {
            return Err(FftError::MismatchedLengths);
        }
        output.copy_from_slice(input);
        self.ifft(output)
    }
}

/// Scalar FFT backed by a private planner.
///
/// The planner sits in a `RefCell`, so an instance is meant to be owned by
/// one computation at a time; independent callers create their own.
pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> ScalarFftImpl<T> {
    pub fn with_planner(planner: FftPlanner<T>) -> Self {
        Self {
            planner: RefCell::new(planner),
        }
    }

    pub fn into_planner(self) -> FftPlanner<T> {
        self.planner.into_inner()
    }

    pub fn cached_lengths(&self) -> Vec<usize> {
        self.planner.borrow().cached_lengths()
    }

    pub fn fft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = Vec::from(input);
        self.fft(&mut out)?;
        Ok(out)
    }

    pub fn ifft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = Vec::from(input);
        self.ifft(&mut out)?;
        Ok(out)
    }

    /// Stockham auto-sort FFT, double-buffered against the planner's scratch.
    fn stockham_fft(&self, input: &mut [Complex<T>]) {
        let n = input.len();
        let (twiddles, mut scratch) = {
            let mut planner = self.planner.borrow_mut();
            let twiddles = planner.get_twiddles(n);
            let scratch = core::mem::take(&mut planner.scratch);
            (twiddles, scratch)
        };
        if scratch.len() < n {
            scratch.resize(n, Complex::zero());
        }

        {
            let mut src: &mut [Complex<T>] = &mut *input;
            let mut dst: &mut [Complex<T>] = &mut scratch[..n];
            // n1 = number of groups, n2 = size of each group in this pass.
            let mut n1 = 1usize;
            let mut n2 = n;
            while n1 < n {
                n2 >>= 1;
                for k in 0..n1 {
                    // exp(-2πi * k / (2*n1)) = table[k * n2]
                    let w = twiddles[k * n2];
                    let (even, odd) = src[2 * k * n2..2 * (k + 1) * n2].split_at(n2);
                    for j in 0..n2 {
                        let u = even[j];
                        let v = odd[j] * w;
                        dst[k * n2 + j] = u + v;
                        dst[(k + n1) * n2 + j] = u - v;
                    }
                }
                core::mem::swap(&mut src, &mut dst);
                n1 <<= 1;
            }
        }

        // An odd number of passes leaves the result in scratch.
        if n.trailing_zeros() % 2 == 1 {
            input.copy_from_slice(&scratch[..n]);
        }

        self.planner.borrow_mut().scratch = scratch;
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if !n.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo);
        }
        match n {
            1 => {}
            2 => fft2(input),
            4 => fft4(input),
            8 => fft8(input),
            _ => self.stockham_fft(input),
        }
        Ok(())
    }

    fn ifft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        for c in input.iter_mut() {
            *c = c.conj();
        }
        self.fft(input)?;
        let scale = T::one() / T::from_f64(n as f64);
        for c in input.iter_mut() {
            *c = c.conj().scale(scale);
        }
        Ok(())
    }
}
