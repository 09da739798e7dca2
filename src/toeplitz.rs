//! Toeplitz matrix–vector products through the convolution primitive.
//!
//! An `M×N` Toeplitz matrix with first column `c` and first row `r` is
//! constant along diagonals, so `T·x` is a window of the linear convolution
//! of `x` with the kernel `[r[N-1], …, r[1], c[0], …, c[M-1]]`.

use alloc::vec::Vec;

use crate::conv::convolve_with;
use crate::czt::CztError;
use crate::fft::{FftImpl, ScalarFftImpl};
use crate::num::{Complex, Float};

/// Convolution kernel of the Toeplitz matrix with first row `r` and first
/// column `c`. Entry `N-1+d` holds the value on diagonal `d = i - j`.
/// The main diagonal is taken from `c[0]`; `r[0]` is ignored.
pub fn toeplitz_kernel<T: Float>(r: &[Complex<T>], c: &[Complex<T>]) -> Vec<Complex<T>> {
    let mut kernel = Vec::with_capacity(r.len().saturating_sub(1) + c.len());
    kernel.extend(r.iter().skip(1).rev().copied());
    kernel.extend_from_slice(c);
    kernel
}

/// Compute `T·x` for the Toeplitz matrix with first row `r` (length `N`)
/// and first column `c` (length `M`). Returns `M` values.
pub fn toeplitz_multiply<T: Float>(
    r: &[Complex<T>],
    c: &[Complex<T>],
    x: &[Complex<T>],
) -> Result<Vec<Complex<T>>, CztError> {
    let fft = ScalarFftImpl::<T>::default();
    toeplitz_multiply_with(&fft, r, c, x)
}

pub fn toeplitz_multiply_with<T: Float, F: FftImpl<T>>(
    fft: &F,
    r: &[Complex<T>],
    c: &[Complex<T>],
    x: &[Complex<T>],
) -> Result<Vec<Complex<T>>, CztError> {
    let n = r.len();
    let m = c.len();
    if n == 0 || m == 0 {
        return Err(CztError::DegenerateLength);
    }
    if x.len() != n {
        return Err(CztError::ShapeMismatch);
    }
    let kernel = toeplitz_kernel(r, c);
    let full = convolve_with(fft, x, &kernel)?;
    Ok(full[n - 1..n - 1 + m].to_vec())
}

/// `T·x` for the upper-triangular Toeplitz matrix whose first row is `v`.
pub(crate) fn upper_triangular_multiply<T: Float, F: FftImpl<T>>(
    fft: &F,
    v: &[Complex<T>],
    x: &[Complex<T>],
) -> Result<Vec<Complex<T>>, CztError> {
    let mut column = alloc::vec![Complex::zero(); v.len()];
    if let Some(first) = column.first_mut() {
        *first = v[0];
    }
    toeplitz_multiply_with(fft, v, &column, x)
}

/// `T·x` for the lower-triangular Toeplitz matrix whose first column is `v`.
pub(crate) fn lower_triangular_multiply<T: Float, F: FftImpl<T>>(
    fft: &F,
    v: &[Complex<T>],
    x: &[Complex<T>],
) -> Result<Vec<Complex<T>>, CztError> {
    let row = alloc::vec![Complex::zero(); v.len()];
    toeplitz_multiply_with(fft, &row, v, x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::from_real(re)
    }

    #[test]
    fn test_kernel_layout() {
        let r = [c(1.0), c(2.0), c(3.0)];
        let col = [c(1.0), c(-1.0)];
        let k = toeplitz_kernel(&r, &col);
        assert_eq!(k, [c(3.0), c(2.0), c(1.0), c(-1.0)]);
    }

    #[test]
    fn test_triangular_products() {
        let fft = ScalarFftImpl::<f64>::default();
        let v = [c(1.0), c(2.0), c(3.0)];
        let x = [c(1.0), c(1.0), c(1.0)];
        // Upper: rows [1 2 3], [0 1 2], [0 0 1]
        let up = upper_triangular_multiply(&fft, &v, &x).unwrap();
        for (a, b) in up.iter().zip([6.0, 3.0, 1.0]) {
            assert!((*a - c(b)).norm() < 1e-12);
        }
        // Lower: rows [1 0 0], [2 1 0], [3 2 1]
        let low = lower_triangular_multiply(&fft, &v, &x).unwrap();
        for (a, b) in low.iter().zip([1.0, 3.0, 6.0]) {
            assert!((*a - c(b)).norm() < 1e-12);
        }
    }
}
