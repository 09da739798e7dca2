//! Inverse Chirp Z-Transform (ICZT)
//!
//! Recovers `x` from `X = czt(x, N, W, A)`. With `c[n] = x[n]·A^{-n}` the
//! forward transform evaluates the polynomial `P(t) = Σ c[n]·tⁿ` at the nodes
//! `W^k`, so the inverse is polynomial interpolation at a geometric node set
//! followed by `x[n] = Aⁿ·c[n]`.
//!
//! Two solvers are provided:
//!
//! - [`IcztMethod::Recursive`] splits the nodes of a size-`n` system into its
//!   even and odd halves, each again a geometric node set with the squared
//!   ratio. The halves are solved independently and recombined through the
//!   vanishing polynomials of the opposite half with two convolutions.
//!   Vanishing polynomials and pivots depend only on `(n, W)` and are built
//!   once per plan; each distinct `(level, size)` node is built once.
//! - [`IcztMethod::ClosedForm`] applies an explicit Gohberg–Semencul style
//!   inverse of the chirp Toeplitz matrix as four triangular Toeplitz
//!   products.
//!
//! Both methods check their pivots against a tolerance relative to the
//! largest pivot seen, and the closed form also bounds the growth of its
//! generator. Every reconstruction is then transformed forward once more and
//! its residual, scaled by the plan's pivot spread, must stay within
//! [`IcztOptions::residual_tolerance`]. A failed check is reported as
//! [`CztError::IllConditioned`] instead of a reconstruction with unbounded
//! error.
//!
//! Off the unit circle the problem itself degrades quickly with `n`: for
//! `|W| = 0.5` or `|W| = 2` only a handful of samples invert in `f64`, and
//! larger sizes are reported as ill conditioned.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;

#[cfg(feature = "parallel")]
use core::sync::atomic::{AtomicUsize, Ordering};
#[cfg(all(feature = "parallel", feature = "std"))]
use std::sync::OnceLock;

use crate::conv::convolve_with;
use crate::czt::{chirp, czt_with, half_square, Contour, CztError, CztPlan};
use crate::fft::{FftImpl, ScalarFftImpl};
use crate::num::{Complex, Float};
use crate::toeplitz::{lower_triangular_multiply, upper_triangular_multiply};

/// Default subproblem size from which the recursive solve runs its two
/// halves on the rayon pool.
#[cfg(feature = "parallel")]
pub const DEFAULT_PARALLEL_SOLVE_THRESHOLD: usize = 2048;

/// `0` means no override.
#[cfg(feature = "parallel")]
static PARALLEL_SOLVE_THRESHOLD_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
#[cfg(all(feature = "parallel", feature = "std"))]
static PARALLEL_SOLVE_THRESHOLD_ENV: OnceLock<usize> = OnceLock::new();

#[cfg(feature = "parallel")]
/// Set the subproblem size from which the recursive inverse solves its two
/// halves in parallel.
///
/// Passing `0` reverts to `CHIRPZ_PAR_SOLVE_THRESHOLD` or the built-in
/// default.
pub fn set_parallel_solve_threshold(threshold: usize) {
    PARALLEL_SOLVE_THRESHOLD_OVERRIDE.store(threshold, Ordering::Relaxed);
}

#[cfg(feature = "parallel")]
/// Effective parallel solve threshold: the programmatic override, then the
/// `CHIRPZ_PAR_SOLVE_THRESHOLD` environment variable, then
/// [`DEFAULT_PARALLEL_SOLVE_THRESHOLD`].
pub fn parallel_solve_threshold() -> usize {
    let override_thr = PARALLEL_SOLVE_THRESHOLD_OVERRIDE.load(Ordering::Relaxed);
    if override_thr != 0 {
        return override_thr;
    }
    #[cfg(feature = "std")]
    {
        let env = *PARALLEL_SOLVE_THRESHOLD_ENV.get_or_init(|| {
            std::env::var("CHIRPZ_PAR_SOLVE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0)
        });
        if env != 0 {
            return env;
        }
    }
    DEFAULT_PARALLEL_SOLVE_THRESHOLD
}

/// Algorithm used to invert the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IcztMethod {
    /// Divide-and-conquer interpolation, `O(n log² n)`.
    #[default]
    Recursive,
    /// Explicit Toeplitz inverse from a closed-form generator, `O(n log n)`.
    /// Loses accuracy faster than the recursive solve once `|W| != 1`.
    ClosedForm,
}

/// Conditioning limits and solver choice for an inverse transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IcztOptions<T: Float> {
    /// Smallest accepted ratio between the smallest and the largest pivot
    /// magnitude. Its reciprocal also caps the closed form's condition
    /// estimate.
    pub pivot_tolerance: T,
    /// Largest accepted error estimate of a reconstruction `x̂`: the relative
    /// residual `max|czt(x̂) - X| / max|X|`, multiplied for the recursive
    /// solve by the ratio between its largest and smallest pivot.
    pub residual_tolerance: T,
    /// Solver used to build the plan.
    pub method: IcztMethod,
}

impl<T: Float> Default for IcztOptions<T> {
    fn default() -> Self {
        Self {
            pivot_tolerance: T::epsilon() * T::from_f64(4096.0),
            residual_tolerance: T::epsilon().sqrt() * T::from_f64(4.0),
            method: IcztMethod::default(),
        }
    }
}

impl<T: Float> IcztOptions<T> {
    /// Selects the solver.
    pub fn with_method(mut self, method: IcztMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets [`IcztOptions::pivot_tolerance`].
    pub fn with_pivot_tolerance(mut self, tolerance: T) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Sets [`IcztOptions::residual_tolerance`].
    pub fn with_residual_tolerance(mut self, tolerance: T) -> Self {
        self.residual_tolerance = tolerance;
        self
    }
}

/// Reconstruct the `n` samples whose forward CZT along `A·W^{-k}` with
/// `M = N = n` is `input`.
pub fn iczt<T: Float>(
    input: &[Complex<T>],
    n: usize,
    w: Complex<T>,
    a: Complex<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    iczt_with_options(input, n, w, a, IcztOptions::default())
}

/// [`iczt`] with explicit tolerances and solver.
///
/// Builds a one-off [`IcztPlan`]; use the plan directly to invert many
/// spectra of one configuration.
pub fn iczt_with_options<T: Float>(
    input: &[Complex<T>],
    n: usize,
    w: Complex<T>,
    a: Complex<T>,
    options: IcztOptions<T>,
) -> Result<Vec<Complex<T>>, CztError> {
    let contour = Contour::new(w, a)?;
    if n == 0 {
        return Err(CztError::DegenerateLength);
    }
    if input.len() != n {
        return Err(CztError::ShapeMismatch);
    }
    IcztPlan::for_contour(n, contour, options)?.process(input)
}

/// Sub-contours are only invalid when a ratio over- or underflowed.
fn as_conditioning(e: CztError) -> CztError {
    match e {
        CztError::InvalidContour => CztError::IllConditioned,
        other => other,
    }
}

/// One node of the recursive solve: interpolation at `ratio^k`, `k < size`.
struct SolveNode<T: Float> {
    size: usize,
    /// Coefficients of `Π_k (t - ratio^k)`, `size + 1` entries.
    vanishing: Vec<Complex<T>>,
    split: Option<Split<T>>,
}

struct Split<T: Float> {
    even: Arc<SolveNode<T>>,
    odd: Arc<SolveNode<T>>,
    /// Vanishing polynomial of this node's odd nodes.
    odd_vanishing: Vec<Complex<T>>,
    /// `odd_vanishing` at the even nodes.
    even_pivots: Vec<Complex<T>>,
    /// Even child's vanishing polynomial at the odd nodes.
    odd_pivots: Vec<Complex<T>>,
    /// `ratio^{-j}`, undoing the `t → ratio·t` substitution of the odd child.
    odd_unscale: Vec<Complex<T>>,
}

struct SolveTreeBuilder<'a, T: Float, F: FftImpl<T>> {
    fft: &'a F,
    ln_w: Complex<T>,
    nodes: HashMap<(usize, usize), Arc<SolveNode<T>>>,
}

impl<'a, T: Float, F: FftImpl<T>> SolveTreeBuilder<'a, T, F> {
    fn new(fft: &'a F, w: Complex<T>) -> Self {
        Self {
            fft,
            ln_w: w.ln(),
            nodes: HashMap::new(),
        }
    }

    /// `W^{2^level}`
    fn ratio(&self, level: usize) -> Result<Complex<T>, CztError> {
        let mut exponent = 1.0f64;
        for _ in 0..level {
            exponent *= 2.0;
        }
        let ratio = self.ln_w.scale(T::from_f64(exponent)).exp();
        if !ratio.is_finite() || ratio.is_zero() {
            debug_log!("iczt ratio at level {} left the representable range", level);
            return Err(CztError::IllConditioned);
        }
        Ok(ratio)
    }

    fn node(&mut self, level: usize, size: usize) -> Result<Arc<SolveNode<T>>, CztError> {
        if let Some(node) = self.nodes.get(&(level, size)) {
            return Ok(Arc::clone(node));
        }
        let node = if size == 1 {
            SolveNode {
                size,
                vanishing: vec![-Complex::one(), Complex::one()],
                split: None,
            }
        } else {
            self.split_node(level, size)?
        };
        let node = Arc::new(node);
        self.nodes.insert((level, size), Arc::clone(&node));
        Ok(node)
    }

    fn split_node(&mut self, level: usize, size: usize) -> Result<SolveNode<T>, CztError> {
        let q = self.ratio(level)?;
        let r = self.ratio(level + 1)?;
        let even_len = (size + 1) / 2;
        let odd_len = size / 2;
        let even = self.node(level + 1, even_len)?;
        let odd = self.node(level + 1, odd_len)?;

        // Odd nodes are q·r^i, so their vanishing polynomial is
        // q^o·V(t/q) with V the odd child's: coefficient j scales by q^{o-j}.
        let mut odd_vanishing = odd.vanishing.clone();
        let mut scale = Complex::one();
        for coeff in odd_vanishing.iter_mut().rev() {
            *coeff *= scale;
            scale *= q;
        }
        let q_inv = q.recip();
        let mut odd_unscale = Vec::with_capacity(odd_len);
        let mut unscale = Complex::one();
        for _ in 0..odd_len {
            odd_unscale.push(unscale);
            unscale *= q_inv;
        }

        let even_nodes = Contour::new(r, Complex::one()).map_err(as_conditioning)?;
        let odd_nodes = Contour::new(r, q_inv).map_err(as_conditioning)?;
        let even_pivots = czt_with(self.fft, &odd_vanishing, even_len, &even_nodes)?;
        let odd_pivots = czt_with(self.fft, &even.vanishing, odd_len, &odd_nodes)?;
        let vanishing = convolve_with(self.fft, &even.vanishing, &odd_vanishing)?;

        Ok(SolveNode {
            size,
            vanishing,
            split: Some(Split {
                even,
                odd,
                odd_vanishing,
                even_pivots,
                odd_pivots,
                odd_unscale,
            }),
        })
    }

    fn check_pivots(&self, tolerance: T) -> Result<T, CztError> {
        let pivots = self
            .nodes
            .values()
            .filter_map(|node| node.split.as_ref())
            .flat_map(|split| split.even_pivots.iter().chain(split.odd_pivots.iter()));
        check_pivot_range(pivots.copied(), tolerance)
    }
}

/// Fails unless every pivot is finite and `min|p| > tolerance · max|p|`.
/// Returns `max|p| / min|p|`, `1` without pivots.
fn check_pivot_range<T: Float>(
    pivots: impl Iterator<Item = Complex<T>>,
    tolerance: T,
) -> Result<T, CztError> {
    let mut range: Option<(T, T)> = None;
    for pivot in pivots {
        let magnitude = pivot.norm();
        if !magnitude.is_finite() {
            debug_log!("iczt pivot {:?} is not finite", pivot);
            return Err(CztError::IllConditioned);
        }
        range = Some(match range {
            None => (magnitude, magnitude),
            Some((lo, hi)) => (lo.min(magnitude), hi.max(magnitude)),
        });
    }
    if let Some((lo, hi)) = range {
        debug_log!("iczt pivot range [{:?}, {:?}]", lo, hi);
        // NaN-safe: a zero range fails as well.
        let separated = lo > tolerance * hi;
        if !separated {
            debug_log!("iczt pivots below relative tolerance {:?}", tolerance);
            return Err(CztError::IllConditioned);
        }
        return Ok(hi / lo);
    }
    Ok(T::one())
}

/// Coefficients of the polynomial of degree `< node.size` taking `samples[k]`
/// at the `k`-th node.
fn solve<T: Float, F: FftImpl<T>>(
    node: &SolveNode<T>,
    samples: &[Complex<T>],
    fft: &F,
) -> Result<Vec<Complex<T>>, CztError> {
    let split = match &node.split {
        None => return Ok(vec![samples[0]]),
        Some(split) => split,
    };
    let even_samples: Vec<Complex<T>> = samples
        .iter()
        .step_by(2)
        .zip(split.even_pivots.iter())
        .map(|(&y, &p)| y / p)
        .collect();
    let odd_samples: Vec<Complex<T>> = samples
        .iter()
        .skip(1)
        .step_by(2)
        .zip(split.odd_pivots.iter())
        .map(|(&y, &p)| y / p)
        .collect();

    let (even_coeffs, odd_coeffs) = solve_halves(split, &even_samples, &odd_samples, fft)?;
    let odd_coeffs: Vec<Complex<T>> = odd_coeffs
        .iter()
        .zip(split.odd_unscale.iter())
        .map(|(&b, &s)| b * s)
        .collect();

    let mut coeffs = convolve_with(fft, &split.odd_vanishing, &even_coeffs)?;
    let tail = convolve_with(fft, &split.even.vanishing, &odd_coeffs)?;
    coeffs.truncate(node.size);
    for (c, t) in coeffs.iter_mut().zip(tail) {
        *c += t;
    }
    Ok(coeffs)
}

#[cfg(not(feature = "parallel"))]
fn solve_halves<T: Float, F: FftImpl<T>>(
    split: &Split<T>,
    even_samples: &[Complex<T>],
    odd_samples: &[Complex<T>],
    fft: &F,
) -> Result<(Vec<Complex<T>>, Vec<Complex<T>>), CztError> {
    Ok((
        solve(&split.even, even_samples, fft)?,
        solve(&split.odd, odd_samples, fft)?,
    ))
}

#[cfg(feature = "parallel")]
fn solve_halves<T: Float, F: FftImpl<T>>(
    split: &Split<T>,
    even_samples: &[Complex<T>],
    odd_samples: &[Complex<T>],
    fft: &F,
) -> Result<(Vec<Complex<T>>, Vec<Complex<T>>), CztError> {
    if split.even.size + split.odd.size >= parallel_solve_threshold() {
        // The shared FFT holds a RefCell, so each task gets its own.
        let (even, odd) = rayon::join(
            || solve(&split.even, even_samples, &ScalarFftImpl::<T>::default()),
            || solve(&split.odd, odd_samples, &ScalarFftImpl::<T>::default()),
        );
        return Ok((even?, odd?));
    }
    Ok((
        solve(&split.even, even_samples, fft)?,
        solve(&split.odd, odd_samples, fft)?,
    ))
}

/// Explicit inverse `T⁻¹ = (L(u)·U(u) - L(û)·U(û)) / u[0]` of the chirp
/// Toeplitz matrix, with `U(v)` upper triangular Toeplitz with first row `v`
/// and `L(v)` lower triangular Toeplitz with first column `v`.
struct ClosedForm<T: Float> {
    generator: Vec<Complex<T>>,
    /// `[0, u[n-1], …, u[1]]`
    reflected: Vec<Complex<T>>,
    /// `W^{-k²/2}`
    input_scale: Vec<Complex<T>>,
}

impl<T: Float> ClosedForm<T> {
    fn new(n: usize, contour: &Contour<T>, tolerance: T) -> Result<Self, CztError> {
        let w = contour.w();
        // The system is singular exactly when two nodes coincide, W^j = 1.
        let separations: Vec<Complex<T>> = (1..n)
            .map(|j| w.powf(T::from_f64(j as f64)) - Complex::one())
            .collect();
        check_pivot_range(separations.iter().copied(), tolerance)?;

        // p[k] = Π_{j=1..k} (W^j - 1)
        let mut products = Vec::with_capacity(n);
        products.push(Complex::one());
        for &s in &separations {
            let last = products[products.len() - 1];
            products.push(last * s);
        }

        let ln_w = w.ln();
        let nf = n as f64;
        let generator: Vec<Complex<T>> = (0..n)
            .map(|k| {
                let kf = k as f64;
                let exponent = (2.0 * kf * kf - (2.0 * nf - 1.0) * kf + nf * (nf - 1.0)) / 2.0;
                let mut u = ln_w.scale(T::from_f64(exponent)).exp()
                    / (products[n - k - 1] * products[k]);
                if k % 2 == 1 {
                    u = -u;
                }
                u
            })
            .collect();
        if generator.iter().any(|u| !u.is_finite()) || generator[0].is_zero() {
            debug_log!("iczt closed-form generator is not representable");
            return Err(CztError::IllConditioned);
        }
        // Generator growth times the spread of the two W^{-k²/2} scalings.
        let peak = generator.iter().fold(T::zero(), |m, u| m.max(u.norm()));
        let last = (n - 1) as f64;
        let spread = (w.norm().ln().abs() * T::from_f64(last * last)).exp();
        let estimate = peak / generator[0].norm() * spread;
        let bounded = estimate * tolerance < T::one();
        if !bounded {
            debug_log!("iczt closed-form condition estimate {:?}", estimate);
            return Err(CztError::IllConditioned);
        }

        let mut reflected = Vec::with_capacity(n);
        reflected.push(Complex::zero());
        reflected.extend(generator[1..].iter().rev().copied());

        Ok(Self {
            generator,
            reflected,
            input_scale: chirp(w, n, -T::one()),
        })
    }

    fn apply<F: FftImpl<T>>(
        &self,
        fft: &F,
        samples: &[Complex<T>],
    ) -> Result<Vec<Complex<T>>, CztError> {
        let scaled: Vec<Complex<T>> = samples
            .iter()
            .zip(self.input_scale.iter())
            .map(|(&x, &s)| x * s)
            .collect();
        let direct = upper_triangular_multiply(fft, &self.generator, &scaled)?;
        let direct = lower_triangular_multiply(fft, &self.generator, &direct)?;
        let reflected = upper_triangular_multiply(fft, &self.reflected, &scaled)?;
        let reflected = lower_triangular_multiply(fft, &self.reflected, &reflected)?;
        let u0 = self.generator[0];
        Ok(direct
            .into_iter()
            .zip(reflected)
            .map(|(d, r)| (d - r) / u0)
            .collect())
    }
}

enum Solver<T: Float> {
    Recursive {
        root: Arc<SolveNode<T>>,
        nodes: usize,
    },
    ClosedForm(ClosedForm<T>),
}

/// Reusable inverse transform for a fixed `(N, W, A)`.
///
/// All pivots are computed and checked when the plan is built. Each
/// [`IcztPlan::process`] additionally runs the square forward transform on
/// its reconstruction to check the residual, so it costs one forward
/// transform more than the solve. Like [`CztPlan`] it owns FFT scratch and is
/// meant for one thread at a time.
pub struct IcztPlan<T: Float> {
    contour: Contour<T>,
    options: IcztOptions<T>,
    solver: Solver<T>,
    output_scale: Vec<Complex<T>>,
    /// Factor turning the relative residual into an error estimate.
    error_gain: T,
    forward: CztPlan<T>,
    fft: ScalarFftImpl<T>,
}

impl<T: Float> IcztPlan<T> {
    /// Plan with [`IcztOptions::default`].
    pub fn new(n: usize, w: Complex<T>, a: Complex<T>) -> Result<Self, CztError> {
        Self::with_options(n, w, a, IcztOptions::default())
    }

    pub fn with_options(
        n: usize,
        w: Complex<T>,
        a: Complex<T>,
        options: IcztOptions<T>,
    ) -> Result<Self, CztError> {
        Self::for_contour(n, Contour::new(w, a)?, options)
    }

    /// Inverse of a forward plan. Only square plans (`M == N`) invert.
    pub fn from_forward(plan: &CztPlan<T>) -> Result<Self, CztError> {
        if plan.input_len() != plan.output_len() {
            return Err(CztError::NonInvertibleConfiguration);
        }
        Self::for_contour(plan.input_len(), *plan.contour(), IcztOptions::default())
    }

    pub fn for_contour(
        n: usize,
        contour: Contour<T>,
        options: IcztOptions<T>,
    ) -> Result<Self, CztError> {
        if n == 0 {
            return Err(CztError::DegenerateLength);
        }
        let fft = ScalarFftImpl::default();
        let ln_a = contour.a().ln();
        let (solver, output_scale, error_gain) = match options.method {
            IcztMethod::Recursive => {
                let (root, nodes, spread) = {
                    let mut builder = SolveTreeBuilder::new(&fft, contour.w());
                    let root = builder.node(0, n)?;
                    let spread = builder.check_pivots(options.pivot_tolerance)?;
                    (root, builder.nodes.len(), spread)
                };
                // x[j] = A^j·c[j]
                let scale: Vec<Complex<T>> = (0..n)
                    .map(|j| ln_a.scale(T::from_f64(j as f64)).exp())
                    .collect();
                (Solver::Recursive { root, nodes }, scale, spread)
            }
            IcztMethod::ClosedForm => {
                let closed = ClosedForm::new(n, &contour, options.pivot_tolerance)?;
                let ln_w = contour.w().ln();
                // x[k] = A^k·W^{-k²/2}·v[k]
                let scale: Vec<Complex<T>> = (0..n)
                    .map(|k| {
                        (ln_a.scale(T::from_f64(k as f64)) - ln_w.scale(half_square(k))).exp()
                    })
                    .collect();
                (Solver::ClosedForm(closed), scale, T::one())
            }
        };
        debug_log!(
            "iczt plan: n = {}, method = {:?}, error gain = {:?}",
            n,
            options.method,
            error_gain
        );
        Ok(Self {
            contour,
            options,
            solver,
            output_scale,
            error_gain,
            forward: CztPlan::for_contour(n, n, contour)?,
            fft,
        })
    }

    pub fn len(&self) -> usize {
        self.output_scale.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output_scale.is_empty()
    }

    pub fn contour(&self) -> &Contour<T> {
        &self.contour
    }

    /// Tolerances and solver the plan was built with.
    pub fn options(&self) -> &IcztOptions<T> {
        &self.options
    }

    /// Distinct subproblems built for the recursive solve, `0` for the
    /// closed form.
    pub fn subproblem_count(&self) -> usize {
        match &self.solver {
            Solver::Recursive { nodes, .. } => *nodes,
            Solver::ClosedForm(_) => 0,
        }
    }

    /// Reconstructs the `n` samples whose square CZT is `input`.
    ///
    /// Fails with [`CztError::IllConditioned`] when the reconstruction is not
    /// finite or its residual check fails.
    pub fn process(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, CztError> {
        if input.len() != self.len() {
            return Err(CztError::ShapeMismatch);
        }
        let coeffs = match &self.solver {
            Solver::Recursive { root, .. } => solve(root, input, &self.fft)?,
            Solver::ClosedForm(closed) => closed.apply(&self.fft, input)?,
        };
        let output: Vec<Complex<T>> = coeffs
            .into_iter()
            .zip(self.output_scale.iter())
            .map(|(c, &s)| c * s)
            .collect();
        if output.iter().any(|x| !x.is_finite()) {
            debug_log!("iczt produced a non-finite reconstruction");
            return Err(CztError::IllConditioned);
        }
        self.check_residual(&output, input)?;
        Ok(output)
    }

    /// Transforms `output` forward again and compares it with `input`.
    fn check_residual(
        &self,
        output: &[Complex<T>],
        input: &[Complex<T>],
    ) -> Result<(), CztError> {
        let check = self.forward.process(output)?;
        let (diff, scale) = check
            .iter()
            .zip(input.iter())
            .fold((T::zero(), T::zero()), |(d, s), (&y, &x)| {
                (d.max((y - x).norm()), s.max(x.norm()))
            });
        // A zero spectrum passes only with a zero residual; NaN fails.
        let within = diff * self.error_gain <= self.options.residual_tolerance * scale;
        if !within {
            debug_log!(
                "iczt residual {:?} of {:?} with gain {:?} above tolerance",
                diff,
                scale,
                self.error_gain
            );
            return Err(CztError::IllConditioned);
        }
        Ok(())
    }
}
