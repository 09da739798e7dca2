//! Demonstrates enabling verbose logging for chirpz.
use chirpz::{iczt, Complex64, IcztPlan};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let n = 12;
    let w = Complex64::expi(-2.0 * std::f64::consts::PI / n as f64);
    let a = Complex64::one();
    let spectrum = vec![Complex64::one(); n];

    // Plan construction logs sizes and the pivot range.
    let plan = IcztPlan::new(n, w, a).unwrap();
    let _ = plan.process(&spectrum).unwrap();

    // Coincident nodes are reported before the solve runs.
    let _ = iczt(&spectrum, n, Complex64::one(), a).unwrap_err();
}
