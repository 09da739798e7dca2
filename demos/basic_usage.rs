//! Basic usage example for chirpz
//!
//! Forward transform on the DFT contour and on a spiral, the reusable plans,
//! and both inverse methods.

use chirpz::{czt, iczt, iczt_with_options, Complex64, CztPlan, IcztMethod, IcztOptions, IcztPlan};

fn show(label: &str, values: &[Complex64]) {
    println!(
        "   {}: {:?}",
        label,
        values
            .iter()
            .map(|c| format!("{:.3}{:+.3}i", c.re, c.im))
            .collect::<Vec<_>>()
    );
}

fn main() {
    println!("=== chirpz Basic Usage Example ===\n");

    let signal: Vec<Complex64> = [1.0, 2.0, 3.0, 4.0, 0.0, -1.0]
        .iter()
        .map(|&x| Complex64::from_real(x))
        .collect();
    let n = signal.len();

    // 1. DFT of a non-power-of-two length
    println!("1. CZT on the unit circle (a {}-point DFT)", n);
    let w = Complex64::expi(-2.0 * std::f64::consts::PI / n as f64);
    let a = Complex64::one();
    let spectrum = czt(&signal, n, w, a).unwrap();
    show("Spectrum", &spectrum);
    let back = iczt(&spectrum, n, w, a).unwrap();
    show("ICZT", &back);
    println!();

    // 2. A spiral contour and both inverse methods
    println!("2. Spiral contour");
    let w = Complex64::expi(-0.7).scale(2.0);
    let a = Complex64::new(0.0, 1.1);
    let spectrum = czt(&signal, n, w, a).unwrap();
    show("Spectrum", &spectrum);
    for method in [IcztMethod::Recursive, IcztMethod::ClosedForm] {
        let options = IcztOptions::default().with_method(method);
        let back = iczt_with_options(&spectrum, n, w, a, options).unwrap();
        show(&format!("{:?}", method), &back);
    }
    println!();

    // 3. Plans for repeated transforms of one configuration
    println!("3. Plans");
    let w = Complex64::expi(-2.0 * std::f64::consts::PI / n as f64);
    let forward = CztPlan::new(n, n, w, a).unwrap();
    let inverse = IcztPlan::from_forward(&forward).unwrap();
    for shift in 0..2 {
        let mut shifted = signal.clone();
        shifted.rotate_left(shift);
        let restored = inverse.process(&forward.process(&shifted).unwrap()).unwrap();
        show(&format!("Round trip, shift {}", shift), &restored);
    }
}
