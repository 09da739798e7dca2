//! Unrolled butterflies for the smallest power-of-two lengths.

use crate::num::{Complex, Float};

#[inline(always)]
pub fn fft2<T: Float>(input: &mut [Complex<T>]) {
    debug_assert_eq!(input.len(), 2);
    let a = input[0];
    let b = input[1];
    input[0] = a + b;
    input[1] = a - b;
}

/// Multiply by `-i`, i.e. the twiddle `exp(-iπ/2)`.
#[inline(always)]
fn rotate_neg_i<T: Float>(z: Complex<T>) -> Complex<T> {
    Complex::new(z.im, -z.re)
}

#[inline(always)]
pub fn fft4<T: Float>(input: &mut [Complex<T>]) {
    debug_assert_eq!(input.len(), 4);
    let a0 = input[0];
    let a1 = input[1];
    let a2 = input[2];
    let a3 = input[3];
    let even0 = a0 + a2;
    let even1 = a0 - a2;
    let odd0 = a1 + a3;
    let t1 = rotate_neg_i(a1 - a3);
    input[0] = even0 + odd0;
    input[2] = even0 - odd0;
    input[1] = even1 + t1;
    input[3] = even1 - t1;
}

#[inline(always)]
pub fn fft8<T: Float>(input: &mut [Complex<T>]) {
    debug_assert_eq!(input.len(), 8);
    let x = [
        input[0], input[1], input[2], input[3], input[4], input[5], input[6], input[7],
    ];

    // FFT4 on even indices (0,2,4,6)
    let a0 = x[0] + x[4];
    let a1 = x[0] - x[4];
    let a2 = x[2] + x[6];
    let t = rotate_neg_i(x[2] - x[6]);
    let e0 = a0 + a2;
    let e2 = a0 - a2;
    let e1 = a1 + t;
    let e3 = a1 - t;

    // FFT4 on odd indices (1,3,5,7)
    let b0 = x[1] + x[5];
    let b1 = x[1] - x[5];
    let b2 = x[3] + x[7];
    let t = rotate_neg_i(x[3] - x[7]);
    let o0 = b0 + b2;
    let o2 = b0 - b2;
    let o1 = b1 + t;
    let o3 = b1 - t;

    let s = T::from_f64(core::f64::consts::FRAC_1_SQRT_2);
    let t1 = o1 * Complex::new(s, -s);
    let t2 = rotate_neg_i(o2);
    let t3 = o3 * Complex::new(-s, -s);

    input[0] = e0 + o0;
    input[4] = e0 - o0;
    input[1] = e1 + t1;
    input[5] = e1 - t1;
    input[2] = e2 + t2;
    input[6] = e2 - t2;
    input[3] = e3 + t3;
    input[7] = e3 - t3;
}
