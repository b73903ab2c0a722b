//! Power-law background fit and Q-range selection.
//!
//! Purpose
//! -------
//! Estimate a background `I(q) = A·q^m` over a Q window so it can be
//! subtracted before the MaxEnt inversion, and locate the index range of a Q
//! window in sorted data.
//!
//! Key behaviors
//! -------------
//! - [`fit_power_law`] linearizes the data to `ln I = ln A + m·ln q` and
//!   solves the weighted least-squares problem with uncertainties
//!   `sigma / I`, either for `(ln A, m)` or, with a fixed power, for `ln A`
//!   only.
//! - Parameter errors come from the covariance scaled by the reduced
//!   chi-squared of the linear fit; the error of `A` is propagated through
//!   `exp`. With no degrees of freedom left the errors are infinite.
//! - [`q_range_indices`] returns the half-open index range
//!   `[first q >= qmin, first q >= qmax)` of ascending data.
//!
//! Conventions
//! -----------
//! - `sigma` is `dy` when it is present, matches `q` in length and is
//!   strictly positive everywhere; otherwise unit uncertainties are used.
use crate::size_distribution::{
    errors::{SizeDistError, SizeDistResult},
    validation::{verify_non_empty, verify_same_length},
};
use nalgebra::{Matrix2, Vector2};
use ndarray::{Array1, ArrayView1};
use std::ops::Range;

/// Fitted background `A·q^m`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawFit {
    pub scale: f64,
    pub scale_err: f64,
    pub power: f64,
    /// `None` when the power was held fixed.
    pub power_err: Option<f64>,
}

impl PowerLawFit {
    /// Background curve `A·q^m` on `q`.
    pub fn evaluate(&self, q: ArrayView1<'_, f64>) -> Array1<f64> {
        q.mapv(|qi| self.scale * qi.powf(self.power))
    }
}

/// Fit `I = A·q^m` on `[qmin, qmax]`.
///
/// Parameters
/// ----------
/// - `q`, `intensity`: data, same length.
/// - `dy`: optional uncertainties of `intensity`.
/// - `power`: `Some(m)` holds the exponent fixed; `None` fits it.
/// - `qmin`, `qmax`: fit window, defaulting to the data range.
///
/// Errors
/// ------
/// - `LengthMismatch`/`EmptyInput` for inconsistent data.
/// - `InvalidQRange` unless `qmin < qmax`.
/// - `TooFewPoints` with fewer in-range points than free parameters.
/// - `NonPositiveValue` for `q <= 0` or `I <= 0` inside the window.
/// - `SingularFit` if the normal equations cannot be inverted.
pub fn fit_power_law(
    q: ArrayView1<'_, f64>, intensity: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>,
    power: Option<f64>, qmin: Option<f64>, qmax: Option<f64>,
) -> SizeDistResult<PowerLawFit> {
    verify_non_empty("q", q.len())?;
    verify_same_length("intensity", q.len(), intensity.len())?;
    let qmin = qmin.unwrap_or_else(|| q.fold(f64::INFINITY, |a, &b| a.min(b)));
    let qmax = qmax.unwrap_or_else(|| q.fold(f64::NEG_INFINITY, |a, &b| a.max(b)));
    if !(qmax > qmin) {
        return Err(SizeDistError::InvalidQRange { qmin, qmax });
    }

    let use_dy = dy.filter(|d| d.len() == q.len() && d.iter().all(|&v| v > 0.0));
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut weights = Vec::new();
    for index in 0..q.len() {
        let (qi, yi) = (q[index], intensity[index]);
        if !(qi >= qmin && qi <= qmax) {
            continue;
        }
        if qi <= 0.0 {
            return Err(SizeDistError::NonPositiveValue { name: "q", index, value: qi });
        }
        if yi <= 0.0 {
            return Err(SizeDistError::NonPositiveValue { name: "intensity", index, value: yi });
        }
        let sigma = use_dy.map_or(1.0, |d| d[index]);
        let sigma_log = sigma / yi;
        xs.push(qi.ln());
        ys.push(yi.ln());
        weights.push(1.0 / (sigma_log * sigma_log));
    }

    let needed = if power.is_some() { 1 } else { 2 };
    if xs.len() < needed {
        return Err(SizeDistError::TooFewPoints { needed, found: xs.len() });
    }
    let dof = xs.len() - needed;

    match power {
        Some(m) => {
            let sw: f64 = weights.iter().sum();
            let b = weights.iter().zip(&xs).zip(&ys).map(|((w, x), y)| w * (y - m * x)).sum::<f64>()
                / sw;
            let chisq = weighted_sse(&xs, &ys, &weights, b, m);
            let b_err = scaled_error(1.0 / sw, chisq, dof);
            Ok(PowerLawFit { scale: b.exp(), scale_err: b.exp() * b_err, power: m, power_err: None })
        }
        None => {
            let mut normal = Matrix2::<f64>::zeros();
            let mut rhs = Vector2::<f64>::zeros();
            for ((w, x), y) in weights.iter().zip(&xs).zip(&ys) {
                normal[(0, 0)] += w;
                normal[(0, 1)] += w * x;
                normal[(1, 1)] += w * x * x;
                rhs[0] += w * y;
                rhs[1] += w * x * y;
            }
            normal[(1, 0)] = normal[(0, 1)];
            let cov = normal.try_inverse().ok_or(SizeDistError::SingularFit)?;
            let params = cov * rhs;
            let (b, m) = (params[0], params[1]);
            let chisq = weighted_sse(&xs, &ys, &weights, b, m);
            let b_err = scaled_error(cov[(0, 0)], chisq, dof);
            let m_err = scaled_error(cov[(1, 1)], chisq, dof);
            Ok(PowerLawFit {
                scale: b.exp(),
                scale_err: b.exp() * b_err,
                power: m,
                power_err: Some(m_err),
            })
        }
    }
}

/// Half-open index range of `q` inside `[qmin, qmax)`, for ascending `q`.
pub fn q_range_indices(q: ArrayView1<'_, f64>, qmin: f64, qmax: f64) -> Range<usize> {
    let values = q.to_vec();
    let lo = values.partition_point(|&v| v < qmin);
    let hi = values.partition_point(|&v| v < qmax).max(lo);
    lo..hi
}

// ---- Helper Methods ----

fn weighted_sse(xs: &[f64], ys: &[f64], weights: &[f64], b: f64, m: f64) -> f64 {
    xs.iter()
        .zip(ys)
        .zip(weights)
        .map(|((x, y), w)| {
            let r = y - (b + m * x);
            w * r * r
        })
        .sum()
}

/// Standard error from an unscaled variance, scaled by reduced chi-squared.
fn scaled_error(variance: f64, chisq: f64, dof: usize) -> f64 {
    if dof == 0 {
        return f64::INFINITY;
    }
    (variance * chisq / dof as f64).sqrt()
}
