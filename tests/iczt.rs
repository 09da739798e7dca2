// Test intent: verifies the inverse CZT recovers the input and reports
// singular or malformed configurations.
use chirpz::czt::{czt, czt_direct, Contour, CztError, CztPlan};
use chirpz::iczt::{iczt, iczt_with_options, IcztMethod, IcztOptions, IcztPlan};
use chirpz::{Complex32, Complex64};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const METHODS: [IcztMethod; 2] = [IcztMethod::Recursive, IcztMethod::ClosedForm];

fn random_vec(rng: &mut StdRng, len: usize) -> Vec<Complex64> {
    (0..len)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

fn relative_error(actual: &[Complex64], expected: &[Complex64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let scale = expected.iter().fold(0.0f64, |m, x| m.max(x.norm()));
    actual
        .iter()
        .zip(expected.iter())
        .fold(0.0f64, |m, (a, e)| m.max((*a - *e).norm()))
        / scale
}

fn roundtrip(x: &[Complex64], w: Complex64, a: Complex64, method: IcztMethod) -> Vec<Complex64> {
    let n = x.len();
    let spectrum = czt(x, n, w, a).unwrap();
    let options = IcztOptions::default().with_method(method);
    iczt_with_options(&spectrum, n, w, a, options).unwrap()
}

#[test]
fn dft_roundtrip_recovers_input() {
    let mut rng = StdRng::seed_from_u64(21);
    for n in [1usize, 2, 3, 5, 8, 15, 16, 31, 32, 64, 100, 128] {
        let x = random_vec(&mut rng, n);
        let contour = Contour::<f64>::unit_circle(n).unwrap();
        for method in METHODS {
            let back = roundtrip(&x, contour.w(), contour.a(), method);
            let err = relative_error(&back, &x);
            assert!(err < 1e-9, "n = {n}, {method:?}: {err}");
        }
    }
}

#[test]
fn spiral_roundtrip_recovers_input() {
    let mut rng = StdRng::seed_from_u64(22);
    let cases = [
        (Complex64::expi(-0.7).scale(2.0), Complex64::new(0.0, 1.1), 6, 1e-9),
        (Complex64::expi(1.0).scale(0.5), Complex64::one(), 6, 1e-6),
        (Complex64::new(2.0, 0.0), Complex64::one(), 4, 1e-9),
        (Complex64::new(0.5, 0.0), Complex64::one(), 4, 1e-9),
        (Complex64::expi(0.3).scale(1.05), Complex64::new(0.9, 0.2), 16, 1e-7),
    ];
    for (w, a, n, tol) in cases {
        let x = random_vec(&mut rng, n);
        for method in METHODS {
            let back = roundtrip(&x, w, a, method);
            let err = relative_error(&back, &x);
            assert!(err < tol, "w = {w:?}, n = {n}, {method:?}: {err}");
        }
    }
}

#[test]
fn arc_with_offset_start_roundtrips() {
    let mut rng = StdRng::seed_from_u64(23);
    let n = 24;
    let x = random_vec(&mut rng, n);
    // A full turn split in n steps, starting a quarter turn in.
    let contour = Contour::arc(PI / 2.0, 2.0 * PI / n as f64).unwrap();
    for method in METHODS {
        let back = roundtrip(&x, contour.w(), contour.a(), method);
        assert!(relative_error(&back, &x) < 1e-9, "{method:?}");
    }
}

#[test]
fn real_signal_roundtrip_has_negligible_imaginary_part() {
    let real: Vec<f64> = (0..20).map(|i| (i as f64 * 0.37).sin()).collect();
    let x: Vec<Complex64> = real.iter().map(|&r| Complex64::from_real(r)).collect();
    let contour = Contour::<f64>::unit_circle(20).unwrap();
    let spectrum = czt(&x, 20, contour.w(), contour.a()).unwrap();
    let back = iczt(&spectrum, 20, contour.w(), contour.a()).unwrap();
    for (b, r) in back.iter().zip(real.iter()) {
        assert!((b.re - r).abs() < 1e-10);
        assert!(b.im.abs() < 1e-10);
    }
}

#[test]
fn single_sample_is_returned_unchanged() {
    let spectrum = [Complex64::new(0.25, -4.0)];
    let w = Complex64::expi(1.3).scale(1.7);
    let a = Complex64::new(3.0, -2.0);
    let x = iczt(&spectrum, 1, w, a).unwrap();
    assert_eq!(x.len(), 1);
    assert!((x[0] - spectrum[0]).norm() < 1e-12);
    let forward = czt(&x, 1, w, a).unwrap();
    assert!((forward[0] - spectrum[0]).norm() < 1e-12);
}

#[test]
fn single_precision_roundtrip() {
    let x: Vec<Complex32> = (0..16)
        .map(|i| Complex32::new((i as f32 * 0.5).cos(), i as f32 * 0.125))
        .collect();
    let contour = Contour::<f32>::unit_circle(16).unwrap();
    let spectrum = czt(&x, 16, contour.w(), contour.a()).unwrap();
    let back = iczt(&spectrum, 16, contour.w(), contour.a()).unwrap();
    for (b, o) in back.iter().zip(x.iter()) {
        assert!((*b - *o).norm() < 1e-3);
    }
}

#[test]
fn parameter_errors_are_reported() {
    let spectrum = [Complex64::one(); 4];
    let w = Complex64::expi(-0.5);
    let a = Complex64::one();
    assert_eq!(
        iczt(&spectrum, 4, Complex64::zero(), a).unwrap_err(),
        CztError::InvalidContour
    );
    assert_eq!(
        iczt(&spectrum, 4, w, Complex64::zero()).unwrap_err(),
        CztError::InvalidContour
    );
    assert_eq!(iczt(&spectrum, 0, w, a).unwrap_err(), CztError::DegenerateLength);
    assert_eq!(iczt(&spectrum, 3, w, a).unwrap_err(), CztError::ShapeMismatch);
    assert_eq!(iczt(&spectrum[..2], 4, w, a).unwrap_err(), CztError::ShapeMismatch);

    let plan = IcztPlan::new(4, w, a).unwrap();
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.process(&spectrum[..3]).unwrap_err(), CztError::ShapeMismatch);
}

#[test]
fn coincident_nodes_are_ill_conditioned() {
    let spectrum = [Complex64::one(); 8];
    let a = Complex64::one();
    // W = 1 puts every node at z = 1; W = exp(2πi/4) repeats after four.
    let cases = [(Complex64::one(), 2usize), (Complex64::expi(PI / 2.0), 8)];
    for (w, n) in cases {
        for method in METHODS {
            let options = IcztOptions::default().with_method(method);
            assert_eq!(
                iczt_with_options(&spectrum[..n], n, w, a, options).unwrap_err(),
                CztError::IllConditioned,
                "n = {n}, {method:?}"
            );
        }
    }
}

#[test]
fn tolerance_is_configurable() {
    let n = 16;
    let w = Complex64::expi(0.3).scale(1.05);
    let a = Complex64::one();
    assert!(IcztPlan::new(n, w, a).is_ok());
    let strict = IcztOptions::default().with_pivot_tolerance(0.5);
    assert_eq!(
        IcztPlan::with_options(n, w, a, strict).err(),
        Some(CztError::IllConditioned)
    );
}

#[test]
fn extreme_ratio_is_ill_conditioned_not_garbage() {
    let n = 64;
    let spectrum = vec![Complex64::one(); n];
    let w = Complex64::new(1.0e3, 0.0);
    let err = iczt(&spectrum, n, w, Complex64::one()).unwrap_err();
    assert_eq!(err, CztError::IllConditioned);
}

#[test]
fn unreachable_spirals_are_ill_conditioned_not_garbage() {
    // Exact spectra, nodes well separated, yet no solver can recover x.
    let mut rng = StdRng::seed_from_u64(25);
    let a = Complex64::one();
    for (radius, n) in [(0.9, 24usize), (1.1, 24), (1.1, 28)] {
        let w = Complex64::expi(-2.0 * PI / n as f64).scale(radius);
        let x = random_vec(&mut rng, n);
        let spectrum = czt_direct(&x, n, w, a).unwrap();
        for method in METHODS {
            let options = IcztOptions::default().with_method(method);
            assert_eq!(
                iczt_with_options(&spectrum, n, w, a, options).err(),
                Some(CztError::IllConditioned),
                "|W| = {radius}, n = {n}, {method:?}"
            );
        }
    }
}

#[test]
fn spiral_inverse_reach_at_radius_half_and_two() {
    let mut rng = StdRng::seed_from_u64(26);
    let a = Complex64::one();
    let contours = [
        Complex64::expi(1.0).scale(0.5),
        Complex64::new(0.5, 0.0),
        Complex64::expi(-0.7).scale(2.0),
        Complex64::new(2.0, 0.0),
    ];
    for w in contours {
        for n in 2..=16usize {
            let x = random_vec(&mut rng, n);
            let spectrum = czt(&x, n, w, a).unwrap();
            for method in METHODS {
                let options = IcztOptions::default().with_method(method);
                match iczt_with_options(&spectrum, n, w, a, options) {
                    Ok(back) => {
                        assert!(n < 12, "w = {w:?}, n = {n}, {method:?} accepted");
                        let err = relative_error(&back, &x);
                        assert!(err < 1e-4, "w = {w:?}, n = {n}, {method:?}: {err}");
                    }
                    Err(e) => {
                        assert_eq!(e, CztError::IllConditioned);
                        assert!(n > 5, "w = {w:?}, n = {n}, {method:?} rejected");
                    }
                }
            }
        }
    }
}

#[test]
fn residual_tolerance_is_configurable() {
    let mut rng = StdRng::seed_from_u64(27);
    let n = 8;
    let w = Complex64::expi(-0.7).scale(2.0);
    let a = Complex64::one();
    let x = random_vec(&mut rng, n);
    let spectrum = czt(&x, n, w, a).unwrap();
    let loose = IcztOptions::default().with_residual_tolerance(1.0);
    assert!(iczt_with_options(&spectrum, n, w, a, loose).is_ok());
    let strict = IcztOptions::default().with_residual_tolerance(0.0);
    assert_eq!(
        iczt_with_options(&spectrum, n, w, a, strict).err(),
        Some(CztError::IllConditioned)
    );
}

#[test]
fn plans_invert_only_square_forward_plans() {
    let w = Complex64::expi(-0.45);
    let a = Complex64::expi(0.2);
    let wide = CztPlan::new(8, 12, w, a).unwrap();
    assert_eq!(
        IcztPlan::from_forward(&wide).err(),
        Some(CztError::NonInvertibleConfiguration)
    );

    let mut rng = StdRng::seed_from_u64(24);
    let forward = CztPlan::new(12, 12, w, a).unwrap();
    let inverse = IcztPlan::from_forward(&forward).unwrap();
    assert_eq!(inverse.contour(), forward.contour());
    for _ in 0..3 {
        let x = random_vec(&mut rng, 12);
        let back = inverse.process(&forward.process(&x).unwrap()).unwrap();
        assert!(relative_error(&back, &x) < 1e-9);
    }
}

proptest! {
    #[test]
    fn prop_dft_contour_roundtrip(
        values in proptest::collection::vec(-100.0f64..100.0, 2..96),
        start in 0.0f64..6.28,
    ) {
        let x: Vec<Complex64> = values
            .chunks_exact(2)
            .map(|p| Complex64::new(p[0], p[1]))
            .collect();
        let n = x.len();
        prop_assume!(x.iter().any(|c| c.norm() > 1e-3));
        let w = Complex64::expi(-2.0 * PI / n as f64);
        let a = Complex64::expi(start);
        let spectrum = czt(&x, n, w, a).unwrap();
        let back = iczt(&spectrum, n, w, a).unwrap();
        prop_assert!(relative_error(&back, &x) < 1e-9);
    }
}
