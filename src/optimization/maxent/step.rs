//! maxent::step — choose the next move inside the three-direction subspace.
//!
//! Purpose
//! -------
//! Given the first-order projections (`c1`, `s1`) and curvature matrices
//! (`c2`, `s2`) of the chi-squared and entropy functionals over the current
//! search directions, pick the coefficients `beta` of the next step and the
//! next chi-squared target (Skilling & Bryan 1984, §3.6–3.7).
//!
//! Key behaviors
//! -------------
//! - [`chi_now`] blends the curvatures with weight `a ∈ [0, 1]`, solves the
//!   3×3 system with [`solve3`], and returns the predicted chi-squared ratio
//!   for that step.
//! - [`choose_step`] picks a target ratio, bisects `a` on `[0, 1]` until the
//!   predicted ratio is within `move_passes` of it (the "alpha chop"), then
//!   applies the distance penalty that keeps a single step inside the region
//!   where the quadratic model is trustworthy.
//!
//! Invariants & assumptions
//! ------------------------
//! - `c2` is positive semi-definite and `s2` negative semi-definite, so every
//!   blend `(1 − a)·c2 − a·s2` is positive semi-definite; a non-positive
//!   pivot is reported as a domain error and not retried here.
//! - `f_sum`, `blank`, `chisq`, `chizer` are strictly positive.
//!
//! Conventions
//! -----------
//! - Pure functions of their inputs; no logging and no allocation.
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::{
        cholesky::solve3,
        options::MaxEntOptions,
        types::{Subspace, SubspaceMetric},
    },
};

/// Per-iteration quantities the step chooser works from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInputs {
    /// Chi-squared gradient projected on each direction, divided by `chisq`.
    pub c1: Subspace,
    /// Entropy gradient projected on each direction.
    pub s1: Subspace,
    /// Chi-squared curvature over the directions, divided by `chisq`.
    pub c2: SubspaceMetric,
    /// Entropy curvature over the directions.
    pub s2: SubspaceMetric,
    /// Current `Σf`.
    pub f_sum: f64,
    /// Mean of the initial histogram.
    pub blank: f64,
    /// Current chi-squared.
    pub chisq: f64,
    /// Chi-squared target (`npt`).
    pub chizer: f64,
}

/// Result of [`choose_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveStep {
    /// Coefficients of the step along the three search directions.
    pub beta: Subspace,
    /// Chi-squared aimed for by this step.
    pub chi_target: f64,
    /// Entropy-metric distance of the step before any rescaling.
    pub distance: f64,
    /// Loop counter at exit of the bisection.
    pub loops: usize,
    /// Final blend parameter `a`.
    pub blend: f64,
    /// Final `predicted ratio − target ratio`.
    pub residual: f64,
}

/// Predicted chi-squared ratio and step for blend parameter `blend`.
///
/// With `bx = 1 − blend`, solves `(bx·c2 − blend·s2) · beta = −(bx·c1 −
/// blend·s1)` and returns `(1 + beta·c1 + ½ betaᵗ·c2·beta, beta)`.
///
/// # Errors
/// Propagates [`MaxEntError::NotPositiveDefinite`] from the linear solve.
pub fn chi_now(blend: f64, inputs: &StepInputs) -> MaxEntResult<(f64, Subspace)> {
    let bx = 1.0 - blend;
    let a = inputs.c2 * bx - inputs.s2 * blend;
    let b = -(inputs.c1 * bx - inputs.s1 * blend);

    let beta = solve3(&a, &b)?;
    let w = 1.0 + beta.dot(&(inputs.c1 + inputs.c2 * beta * 0.5));
    Ok((w, beta))
}

/// Distance of a step in the entropy metric: `−betaᵗ · s2 · beta`.
pub fn distance(s2: &SubspaceMetric, beta: &Subspace) -> f64 {
    -beta.dot(&(s2 * beta))
}

/// Choose the next step by bisection over the blend parameter.
///
/// # Behavior
/// 1. `cmin = chi_now(0)`. If `cmin · chisq > chizer` the target ratio is
///    `(1 + cmin) / 2`, otherwise `chizer / chisq`.
/// 2. Bisect on `[0, 1]`, keeping the side whose residual has the opposite
///    sign of the midpoint's, until `|residual| < move_passes` or
///    `max_move_loops` midpoints have been tried.
/// 3. If the step's distance exceeds `distance_limit_factor · f_sum /
///    blank`, scale `beta` by `sqrt(f_sum / (blank · distance))`.
///
/// # Errors
/// - [`MaxEntError::NotPositiveDefinite`] from any blend.
/// - [`MaxEntError::AlphaChopNoConvergence`] if the bisection runs out of
///   loops.
pub fn choose_step(inputs: &StepInputs, opts: &MaxEntOptions) -> MaxEntResult<MoveStep> {
    let (mut a_lower, mut a_upper) = (0.0_f64, 1.0_f64);

    let (cmin, _) = chi_now(a_lower, inputs)?;
    let ctarg = if cmin * inputs.chisq > inputs.chizer {
        0.5 * (1.0 + cmin)
    } else {
        inputs.chizer / inputs.chisq
    };
    let mut f_lower = cmin - ctarg;
    let (c_upper, _) = chi_now(a_upper, inputs)?;
    let mut f_upper = c_upper - ctarg;

    let mut fx = 2.0 * opts.move_passes;
    let mut loops = 1;
    let mut blend = a_lower;
    let mut beta = Subspace::zeros();
    while fx.abs() >= opts.move_passes && loops <= opts.max_move_loops {
        blend = 0.5 * (a_lower + a_upper);
        let (c_new, beta_new) = chi_now(blend, inputs)?;
        beta = beta_new;
        fx = c_new - ctarg;
        if f_lower * fx > 0.0 {
            a_lower = blend;
            f_lower = fx;
        }
        if f_upper * fx > 0.0 {
            a_upper = blend;
            f_upper = fx;
        }
        loops += 1;
    }

    // NaN residuals fall through the loop condition; treat them as failures.
    if !(fx.abs() < opts.move_passes) {
        return Err(MaxEntError::AlphaChopNoConvergence {
            loops: opts.max_move_loops,
            residual: fx,
        });
    }

    let w = distance(&inputs.s2, &beta);
    if w > opts.distance_limit_factor * inputs.f_sum / inputs.blank {
        beta *= (inputs.f_sum / (inputs.blank * w)).sqrt();
    }

    Ok(MoveStep {
        beta,
        chi_target: ctarg * inputs.chisq,
        distance: w,
        loops,
        blend,
        residual: fx,
    })
}
