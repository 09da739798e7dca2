//! Linear convolution by zero-padded spectral multiplication.
//!
//! This is the one primitive both transform directions are built on: the
//! forward chirp transform applies a chirp Toeplitz matrix through it, and the
//! inverse solve recombines its half-size solutions with it.

use alloc::vec::Vec;

use crate::fft::{FftError, FftImpl, ScalarFftImpl};
use crate::num::{Complex, Float};

/// FFT length used for a linear convolution whose output has `output_len`
/// samples: the next power of two, so the product of spectra never wraps.
pub fn padded_len(output_len: usize) -> usize {
    output_len.max(1).next_power_of_two()
}

fn zero_padded<T: Float>(input: &[Complex<T>], len: usize) -> Vec<Complex<T>> {
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(input);
    out.resize(len, Complex::zero());
    out
}

/// Linear convolution `c[i] = Σ_j a[j]·b[i-j]`, of length `a.len() + b.len() - 1`.
///
/// An empty operand yields an empty result.
pub fn convolve<T: Float>(
    a: &[Complex<T>],
    b: &[Complex<T>],
) -> Result<Vec<Complex<T>>, FftError> {
    let fft = ScalarFftImpl::<T>::default();
    convolve_with(&fft, a, b)
}

/// [`convolve`] through a caller-provided FFT, so repeated calls share its
/// twiddle cache.
pub fn convolve_with<T: Float, F: FftImpl<T>>(
    fft: &F,
    a: &[Complex<T>],
    b: &[Complex<T>],
) -> Result<Vec<Complex<T>>, FftError> {
    if a.is_empty() || b.is_empty() {
        return Ok(Vec::new());
    }
    let output_len = a.len() + b.len() - 1;
    let fft_len = padded_len(output_len);
    let mut fa = zero_padded(a, fft_len);
    let mut fb = zero_padded(b, fft_len);
    fft.fft(&mut fa)?;
    fft.fft(&mut fb)?;
    for (x, &y) in fa.iter_mut().zip(fb.iter()) {
        *x = *x * y;
    }
    fft.ifft(&mut fa)?;
    fa.truncate(output_len);
    Ok(fa)
}

/// Convolve real sequences, widening them to complex at the boundary.
pub fn convolve_real<T: Float>(a: &[T], b: &[T]) -> Result<Vec<Complex<T>>, FftError> {
    let a: Vec<Complex<T>> = a.iter().map(|&x| Complex::from_real(x)).collect();
    let b: Vec<Complex<T>> = b.iter().map(|&x| Complex::from_real(x)).collect();
    convolve(&a, &b)
}

/// A convolution kernel whose zero-padded spectrum is computed once and then
/// applied to any number of inputs of one fixed length.
#[derive(Clone, Debug)]
pub struct ConvolutionKernel<T: Float> {
    kernel_len: usize,
    input_len: usize,
    spectrum: Vec<Complex<T>>,
}

impl<T: Float> ConvolutionKernel<T> {
    pub fn new<F: FftImpl<T>>(
        fft: &F,
        kernel: &[Complex<T>],
        input_len: usize,
    ) -> Result<Self, FftError> {
        if kernel.is_empty() || input_len == 0 {
            return Err(FftError::EmptyInput);
        }
        let fft_len = padded_len(kernel.len() + input_len - 1);
        let mut spectrum = zero_padded(kernel, fft_len);
        fft.fft(&mut spectrum)?;
        Ok(Self {
            kernel_len: kernel.len(),
            input_len,
            spectrum,
        })
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.kernel_len + self.input_len - 1
    }

    pub fn fft_len(&self) -> usize {
        self.spectrum.len()
    }

    /// Full linear convolution of `input` with the kernel.
    pub fn apply<F: FftImpl<T>>(
        &self,
        fft: &F,
        input: &[Complex<T>],
    ) -> Result<Vec<Complex<T>>, FftError> {
        if input.len() != self.input_len {
            return Err(FftError::MismatchedLengths);
        }
        let mut buf = zero_padded(input, self.spectrum.len());
        fft.fft(&mut buf)?;
        for (x, &k) in buf.iter_mut().zip(self.spectrum.iter()) {
            *x = *x * k;
        }
        fft.ifft(&mut buf)?;
        buf.truncate(self.output_len());
        Ok(buf)
    }
}
