//! Chirp Z-Transform (CZT) module
//!
//! Samples the z-transform of a finite sequence at `z_k = A·W^{-k}`,
//! `X[k] = Σ_n x[n]·A^{-n}·W^{kn}`, in `O((N+M) log(N+M))`.
//!
//! With `kn = (k² + n² - (k-n)²)/2` the `M×N` transform matrix factors as
//! `D_out·T·D_in`:
//!
//! - `D_in  = diag(A^{-n}·W^{n²/2})`
//! - `T[k][n] = W^{-(k-n)²/2}`, a Toeplitz matrix
//! - `D_out = diag(W^{k²/2})`
//!
//! so the transform is two elementwise scalings around one convolution.
//! No `M×N` matrix is ever built.

use alloc::vec::Vec;

use crate::conv::ConvolutionKernel;
use crate::fft::{FftError, FftImpl, ScalarFftImpl};
use crate::num::{Complex, Float};
use crate::toeplitz::{toeplitz_kernel, toeplitz_multiply_with};

/// Errors that can occur during CZT or ICZT computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CztError {
    /// `A` or `W` is zero or not finite; the contour is degenerate.
    InvalidContour,
    /// A transform length of zero was requested or supplied.
    DegenerateLength,
    /// A sequence length does not match the length the operation expects.
    ShapeMismatch,
    /// An inverse was requested for a configuration with `M != N`.
    NonInvertibleConfiguration,
    /// The inverse solve met a pivot below tolerance, exceeded its condition
    /// or residual limits, or produced a non-finite value.
    IllConditioned,
    /// The underlying FFT rejected its input.
    Fft(FftError),
}

impl core::fmt::Display for CztError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CztError::InvalidContour => write!(f, "contour parameters A and W must be nonzero"),
            CztError::DegenerateLength => write!(f, "transform length must be at least 1"),
            CztError::ShapeMismatch => write!(f, "sequence length does not match transform size"),
            CztError::NonInvertibleConfiguration => {
                write!(f, "inverse requires as many output samples as input samples")
            }
            CztError::IllConditioned => write!(f, "inverse system is numerically singular"),
            CztError::Fft(e) => write!(f, "fft failure: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CztError {}

impl From<FftError> for CztError {
    fn from(e: FftError) -> Self {
        CztError::Fft(e)
    }
}

/// Geometric sampling contour `z_k = A·W^{-k}`.
///
/// `|W| = 1` keeps every point at radius `|A|`. With `|W| > 1` the contour
/// spirals inward and the fast transform stays accurate as long as the
/// values are representable. With `|W| < 1` it spirals outward and the
/// fast transform loses accuracy quickly with size; see [`czt`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contour<T: Float> {
    w: Complex<T>,
    a: Complex<T>,
}

impl<T: Float> Contour<T> {
    /// `w` is the per-step ratio and `a` the starting point; both must be
    /// finite and nonzero.
    pub fn new(w: Complex<T>, a: Complex<T>) -> Result<Self, CztError> {
        let usable = |z: Complex<T>| z.is_finite() && !z.is_zero();
        if !usable(w) || !usable(a) {
            return Err(CztError::InvalidContour);
        }
        Ok(Self { w, a })
    }

    /// The `n` roots of unity visited clockwise from 1: with `M = N = n`
    /// the transform is the forward DFT.
    pub fn unit_circle(n: usize) -> Result<Self, CztError> {
        if n == 0 {
            return Err(CztError::DegenerateLength);
        }
        let step = T::from_f64(2.0 * core::f64::consts::PI / n as f64);
        Ok(Self {
            w: Complex::expi(-step),
            a: Complex::one(),
        })
    }

    /// Points `exp(i·(theta_start + k·theta_step))` on the unit circle, the
    /// usual zoom-spectrum contour. Non-finite angles are rejected.
    pub fn arc(theta_start: T, theta_step: T) -> Result<Self, CztError> {
        Self::new(Complex::expi(-theta_step), Complex::expi(theta_start))
    }

    pub fn w(&self) -> Complex<T> {
        self.w
    }

    pub fn a(&self) -> Complex<T> {
        self.a
    }

    /// The `k`-th sample point `A·W^{-k}`.
    pub fn point(&self, k: usize) -> Complex<T> {
        self.a * self.w.powf(-T::from_f64(k as f64))
    }
}

/// `k²/2` in the working precision.
#[inline]
pub(crate) fn half_square<T: Float>(k: usize) -> T {
    let k = k as f64;
    T::from_f64(k * k / 2.0)
}

/// `D_in`: `A^{-n}·W^{n²/2}` for `n < len`.
fn input_chirp<T: Float>(contour: &Contour<T>, len: usize) -> Vec<Complex<T>> {
    let ln_w = contour.w.ln();
    let ln_a = contour.a.ln();
    (0..len)
        .map(|n| (ln_w.scale(half_square(n)) - ln_a.scale(T::from_f64(n as f64))).exp())
        .collect()
}

/// `W^{sign·k²/2}` for `k < len`.
pub(crate) fn chirp<T: Float>(w: Complex<T>, len: usize, sign: T) -> Vec<Complex<T>> {
    let ln_w = w.ln();
    (0..len)
        .map(|k| ln_w.scale(sign * half_square::<T>(k)).exp())
        .collect()
}

/// Compute the Chirp Z-Transform of `input` at `m` points of the contour
/// `A·W^{-k}`.
///
/// # Parameters
/// - `input`: the `N` complex samples to transform.
/// - `m`: number of output samples.
/// - `w`: complex ratio between successive points (`exp(-2πi/N)` for a DFT).
/// - `a`: complex starting point (`1` for a DFT).
///
/// Reliability depends on `|W|`. The chirp factors scale like
/// `|W|^{±k²/2}`, so off the unit circle the convolution mixes terms of very
/// different magnitude:
///
/// - `|W| > 1`: the result stays within a few ulps of direct evaluation,
///   relative to its largest sample, until the powers of `W` overflow
///   (about `N = M = 32` for `|W| = 2` in `f64`).
/// - `|W| < 1`: the rounding error of the large chirp terms swamps the
///   result. In `f64` `|W| = 0.5` is accurate up to about 6 points and
///   meaningless from 12, and `|W| = 0.9` is meaningless from about 32.
///   Evaluate such contours with [`czt_direct`].
pub fn czt<T: Float>(
    input: &[Complex<T>],
    m: usize,
    w: Complex<T>,
    a: Complex<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    let contour = Contour::new(w, a)?;
    let fft = ScalarFftImpl::<T>::default();
    czt_with(&fft, input, m, &contour)
}

/// [`czt`] for real-valued input, widened to complex at the boundary.
pub fn czt_real<T: Float>(
    input: &[T],
    m: usize,
    w: Complex<T>,
    a: Complex<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    let widened: Vec<Complex<T>> = input.iter().map(|&x| Complex::from_real(x)).collect();
    czt(&widened, m, w, a)
}

/// Forward transform through a caller-provided FFT.
pub(crate) fn czt_with<T: Float, F: FftImpl<T>>(
    fft: &F,
    input: &[Complex<T>],
    m: usize,
    contour: &Contour<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    let n = input.len();
    if n == 0 || m == 0 {
        return Err(CztError::DegenerateLength);
    }
    let scaled: Vec<Complex<T>> = input
        .iter()
        .zip(input_chirp(contour, n))
        .map(|(&x, d)| x * d)
        .collect();
    // Both the first row and the first column of T are W^{-j²/2}.
    let kernel = chirp(contour.w, n.max(m), -T::one());
    let toeplitz = toeplitz_multiply_with(fft, &kernel[..n], &kernel[..m], &scaled)?;
    let out_chirp = chirp(contour.w, m, T::one());
    Ok(toeplitz
        .into_iter()
        .zip(out_chirp)
        .map(|(y, d)| y * d)
        .collect())
}

/// Direct `O(N·M)` evaluation of the transform.
///
/// Powers of `W` and `A^{-1}` are updated incrementally instead of being
/// recomputed per term. Useful as a reference and for very small sizes.
pub fn czt_direct<T: Float>(
    input: &[Complex<T>],
    m: usize,
    w: Complex<T>,
    a: Complex<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    let contour = Contour::new(w, a)?;
    if input.is_empty() || m == 0 {
        return Err(CztError::DegenerateLength);
    }
    let a_inv = contour.a.recip();
    let mut output = Vec::with_capacity(m);
    // `w_k` holds W^k for the current output sample.
    let mut w_k = Complex::one();
    for _ in 0..m {
        let mut acc = Complex::zero();
        // `wnk` tracks W^{kn}, `a_pow` tracks A^{-n}.
        let mut wnk = Complex::one();
        let mut a_pow = Complex::one();
        for &x in input {
            acc += x * a_pow * wnk;
            wnk *= w_k;
            a_pow *= a_inv;
        }
        output.push(acc);
        w_k *= contour.w;
    }
    Ok(output)
}

/// Reusable forward transform for a fixed `(N, M, W, A)`.
///
/// Both chirp diagonals and the spectrum of the Toeplitz kernel are computed
/// once. The plan owns its FFT scratch, so share it by reference within one
/// thread and build one per thread otherwise.
pub struct CztPlan<T: Float> {
    contour: Contour<T>,
    input_scale: Vec<Complex<T>>,
    output_scale: Vec<Complex<T>>,
    kernel: ConvolutionKernel<T>,
    fft: ScalarFftImpl<T>,
}

impl<T: Float> CztPlan<T> {
    pub fn new(
        input_len: usize,
        output_len: usize,
        w: Complex<T>,
        a: Complex<T>,
    ) -> Result<Self, CztError> {
        let contour = Contour::new(w, a)?;
        Self::for_contour(input_len, output_len, contour)
    }

    pub fn for_contour(
        input_len: usize,
        output_len: usize,
        contour: Contour<T>,
    ) -> Result<Self, CztError> {
        if input_len == 0 || output_len == 0 {
            return Err(CztError::DegenerateLength);
        }
        let fft = ScalarFftImpl::default();
        let kernel_values = chirp(contour.w, input_len.max(output_len), -T::one());
        let kernel = ConvolutionKernel::new(
            &fft,
            &toeplitz_kernel(&kernel_values[..input_len], &kernel_values[..output_len]),
            input_len,
        )?;
        debug_log!(
            "czt plan: n = {}, m = {}, fft length = {}",
            input_len,
            output_len,
            kernel.fft_len()
        );
        Ok(Self {
            contour,
            input_scale: input_chirp(&contour, input_len),
            output_scale: chirp(contour.w, output_len, T::one()),
            kernel,
            fft,
        })
    }

    pub fn input_len(&self) -> usize {
        self.input_scale.len()
    }

    pub fn output_len(&self) -> usize {
        self.output_scale.len()
    }

    pub fn contour(&self) -> &Contour<T> {
        &self.contour
    }

    pub fn process(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, CztError> {
        let n = self.input_len();
        if input.len() != n {
            return Err(CztError::ShapeMismatch);
        }
        let scaled: Vec<Complex<T>> = input
            .iter()
            .zip(self.input_scale.iter())
            .map(|(&x, &d)| x * d)
            .collect();
        let full = self.kernel.apply(&self.fft, &scaled)?;
        Ok(full[n - 1..]
            .iter()
            .zip(self.output_scale.iter())
            .map(|(&y, &d)| y * d)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Complex64;
    use alloc::vec;

    #[test]
    fn test_contour_validation() {
        let one = Complex64::one();
        assert_eq!(
            Contour::new(Complex64::zero(), one).unwrap_err(),
            CztError::InvalidContour
        );
        assert_eq!(
            Contour::new(one, Complex64::new(f64::NAN, 0.0)).unwrap_err(),
            CztError::InvalidContour
        );
        assert_eq!(
            Contour::<f64>::unit_circle(0).unwrap_err(),
            CztError::DegenerateLength
        );
        assert_eq!(
            Contour::arc(f64::NAN, 0.1).unwrap_err(),
            CztError::InvalidContour
        );
        assert_eq!(
            Contour::arc(0.0, f64::INFINITY).unwrap_err(),
            CztError::InvalidContour
        );
    }

    #[test]
    fn test_contour_points() {
        let contour = Contour::<f64>::unit_circle(4).unwrap();
        // Clockwise from 1: 1, -i, -1, i
        let expected = [
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(0.0, 1.0),
        ];
        for (k, e) in expected.iter().enumerate() {
            assert!((contour.point(k) - *e).norm() < 1e-12);
        }
        let arc = Contour::arc(0.5_f64, 0.25).unwrap();
        assert!((arc.point(2) - Complex64::expi(1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_plan_matches_one_shot() {
        let input: Vec<Complex64> = (0..6).map(|i| Complex64::new(i as f64, 1.0)).collect();
        let w = Complex64::new(0.9, 0.3);
        let a = Complex64::new(1.1, -0.2);
        let plan = CztPlan::new(6, 9, w, a).unwrap();
        let planned = plan.process(&input).unwrap();
        let direct = czt_direct(&input, 9, w, a).unwrap();
        assert_eq!(planned.len(), 9);
        for (p, d) in planned.iter().zip(direct.iter()) {
            assert!((*p - *d).norm() < 1e-9 * d.norm().max(1.0));
        }
        assert_eq!(
            plan.process(&input[..5]).unwrap_err(),
            CztError::ShapeMismatch
        );
    }

    #[test]
    fn test_single_output_is_weighted_sum() {
        let input = vec![Complex64::new(2.0, 0.0), Complex64::new(3.0, 0.0)];
        let a = Complex64::new(2.0, 0.0);
        let out = czt(&input, 1, Complex64::new(0.0, 1.0), a).unwrap();
        // X[0] = x[0] + x[1]/A
        assert!((out[0] - Complex64::new(3.5, 0.0)).norm() < 1e-12);
    }
}
