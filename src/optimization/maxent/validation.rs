//! Validation helpers for the MaxEnt solver.
//!
//! This module centralizes the precondition checks run before the first
//! iteration:
//!
//! - **Option checks**: [`verify_positive`] ensures tolerances and factors
//!   are finite and strictly positive.
//! - **Shape checks**: [`validate_shapes`] ties `I`, `sigma`, `G`, and
//!   `first_bins` to a common `(n_bins, npt)`.
//! - **Value checks**: [`validate_finite`], [`validate_sigma`], and
//!   [`validate_prior`] reject NaN/±inf entries and non-positive divisors or
//!   priors, which would otherwise surface as NaN deep inside the iteration.
//!
//! All helpers return [`MaxEntError`] variants in the `Precondition` kind.
use crate::optimization::errors::{MaxEntError, MaxEntResult};
use ndarray::{ArrayView1, ArrayView2};

/// Validate that a tolerance or factor is finite and strictly positive.
///
/// # Errors
/// Returns [`MaxEntError::InvalidTolerance`] naming `name` if `value` is
/// non-finite or ≤ 0.0.
pub fn verify_positive(name: &'static str, value: f64) -> MaxEntResult<()> {
    if !value.is_finite() {
        return Err(MaxEntError::InvalidTolerance { name, value, reason: "Value must be finite." });
    }
    if value <= 0.0 {
        return Err(MaxEntError::InvalidTolerance {
            name,
            value,
            reason: "Value must be positive.",
        });
    }
    Ok(())
}

/// Check that all inputs agree on `npt = intensity.len()` and
/// `n_bins = first_bins.len()`.
///
/// # Errors
/// - [`MaxEntError::EmptyData`] if `npt == 0`.
/// - [`MaxEntError::EmptyDistribution`] if `n_bins == 0`.
/// - [`MaxEntError::LengthMismatch`] if `sigma.len() != npt`.
/// - [`MaxEntError::KernelShapeMismatch`] if `kernel.dim() != (n_bins, npt)`.
pub fn validate_shapes(
    intensity: ArrayView1<'_, f64>, sigma: ArrayView1<'_, f64>, kernel: ArrayView2<'_, f64>,
    first_bins: ArrayView1<'_, f64>,
) -> MaxEntResult<()> {
    let npt = intensity.len();
    let n_bins = first_bins.len();
    if npt == 0 {
        return Err(MaxEntError::EmptyData);
    }
    if n_bins == 0 {
        return Err(MaxEntError::EmptyDistribution);
    }
    if sigma.len() != npt {
        return Err(MaxEntError::LengthMismatch {
            name: "sigma",
            expected: npt,
            found: sigma.len(),
        });
    }
    if kernel.dim() != (n_bins, npt) {
        return Err(MaxEntError::KernelShapeMismatch {
            expected: (n_bins, npt),
            found: kernel.dim(),
        });
    }
    Ok(())
}

/// Reject NaN/±inf entries in a vector.
///
/// # Errors
/// Returns [`MaxEntError::NonFiniteInput`] with the first offending index.
pub fn validate_finite(name: &'static str, values: ArrayView1<'_, f64>) -> MaxEntResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(MaxEntError::NonFiniteInput { name, index, value });
        }
    }
    Ok(())
}

/// Reject NaN/±inf kernel entries. The reported index is the flat
/// row-major position `row * npt + col`.
pub fn validate_kernel(kernel: ArrayView2<'_, f64>) -> MaxEntResult<()> {
    let npt = kernel.ncols();
    for ((row, col), &value) in kernel.indexed_iter() {
        if !value.is_finite() {
            return Err(MaxEntError::NonFiniteInput {
                name: "kernel",
                index: row * npt + col,
                value,
            });
        }
    }
    Ok(())
}

/// `sigma` divides every residual, so each entry must be finite and > 0.
///
/// # Errors
/// - [`MaxEntError::NonFiniteInput`] for NaN/±inf entries.
/// - [`MaxEntError::NonPositiveSigma`] for entries ≤ 0.
pub fn validate_sigma(sigma: ArrayView1<'_, f64>) -> MaxEntResult<()> {
    validate_finite("sigma", sigma)?;
    for (index, &value) in sigma.iter().enumerate() {
        if value <= 0.0 {
            return Err(MaxEntError::NonPositiveSigma { index, value });
        }
    }
    Ok(())
}

/// `first_bins` enters `ln(f / first_bins)` and seeds stray resets, so each
/// entry must be finite and > 0.
///
/// # Errors
/// - [`MaxEntError::NonFiniteInput`] for NaN/±inf entries.
/// - [`MaxEntError::NonPositivePrior`] for entries ≤ 0.
pub fn validate_prior(first_bins: ArrayView1<'_, f64>) -> MaxEntResult<()> {
    validate_finite("first_bins", first_bins)?;
    for (index, &value) in first_bins.iter().enumerate() {
        if value <= 0.0 {
            return Err(MaxEntError::NonPositivePrior { index, value });
        }
    }
    Ok(())
}
