//! # chirpz - Chirp Z-Transform and its fast inverse
//!
//! Evaluates the z-transform of a finite complex sequence at `M` points of a
//! logarithmic spiral `z_k = A·W^{-k}`, and reconstructs the sequence from
//! those samples, both without forming an `M×N` matrix.
//!
//! ## Features
//!
//! - **Forward CZT** in `O((N+M) log(N+M))` via two chirp scalings around one
//!   fast convolution
//! - **Inverse CZT** (square case) by a divide-and-conquer solve of the chirp
//!   Toeplitz system, or by an explicit closed-form inverse
//! - **Reusable plans** for repeated transforms of one configuration
//! - **`no_std` + `alloc`**, generic over `f32` and `f64`
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls and environment overrides
//! - `parallel`: solve the two halves of large inverse subproblems with Rayon
//! - `verbose-logging`: emit plan and conditioning diagnostics through `log`
//!
//! ## Example
//!
//! ```
//! use chirpz::{czt, iczt, Complex64};
//!
//! let x: Vec<Complex64> = (0..8).map(|i| Complex64::new(i as f64, 0.0)).collect();
//! let w = Complex64::expi(-2.0 * core::f64::consts::PI / 8.0);
//! let a = Complex64::one();
//! let spectrum = czt(&x, 8, w, a).unwrap();
//! let back = iczt(&spectrum, 8, w, a).unwrap();
//! assert!((back[3] - x[3]).norm() < 1e-9);
//! ```

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "verbose-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "verbose-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}

/// Complex numbers and the `Float` abstraction over `f32`/`f64`.
pub mod num;

/// Fixed-size FFT butterflies used by the scalar FFT for tiny lengths.
pub mod fft_kernels;

/// Fast Fourier Transform (FFT)
///
/// Power-of-two complex FFT with a bounded twiddle cache.
pub mod fft;

/// Fast linear convolution
///
/// Zero-padded spectral multiplication, one-shot or with a prepared kernel.
pub mod conv;

/// Toeplitz matrix–vector products expressed as convolutions.
pub mod toeplitz;

/// Chirp Z-Transform (CZT)
///
/// Arbitrary spiral-contour spectra, one-shot or planned.
pub mod czt;

/// Inverse Chirp Z-Transform (ICZT)
///
/// Recursive and closed-form reconstruction from square CZT samples.
pub mod iczt;

pub use conv::{convolve, convolve_real, ConvolutionKernel};
pub use czt::{czt, czt_direct, czt_real, Contour, CztError, CztPlan};
pub use fft::{FftError, FftPlanner};
#[cfg(feature = "parallel")]
pub use iczt::{parallel_solve_threshold, set_parallel_solve_threshold};
pub use iczt::{iczt, iczt_with_options, IcztMethod, IcztOptions, IcztPlan};
pub use num::{Complex, Complex32, Complex64, Float};
pub use toeplitz::toeplitz_multiply;
