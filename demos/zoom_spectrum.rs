//! Zoom into a narrow band of a spectrum with the CZT.
//!
//! Two tones 0.5 bins apart cannot be separated by a 64-point DFT, but the
//! CZT can sample the same band 32 times more densely.

use chirpz::{czt_real, Complex64, Contour, CztError};
use std::f64::consts::PI;

fn main() -> Result<(), CztError> {
    let n = 64;
    let (f1, f2) = (10.0, 10.5);
    let signal: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            (2.0 * PI * f1 * t).sin() + (2.0 * PI * f2 * t).sin()
        })
        .collect();

    // Bins 8..13 of the 64-point DFT, 32 samples per bin.
    let m = 160;
    let start = 2.0 * PI * 8.0 / n as f64;
    let step = 2.0 * PI * 5.0 / (n as f64 * m as f64);
    let contour = Contour::arc(start, step)?;
    let spectrum = czt_real(&signal, m, contour.w(), contour.a())?;

    let magnitudes: Vec<f64> = spectrum.iter().map(|c: &Complex64| c.norm()).collect();
    for (k, mag) in magnitudes.iter().enumerate().step_by(8) {
        let bin = 8.0 + 5.0 * k as f64 / m as f64;
        println!("bin {:6.3}: {}", bin, "#".repeat((*mag / 2.0) as usize));
    }
    Ok(())
}
