//! Validation helpers for the size-distribution workflow.
//!
//! - **Scalar checks**: [`verify_positive`] reuses the MaxEnt option check
//!   and reports it as [`SizeDistError::InvalidParameter`].
//! - **Vector checks**: [`verify_non_empty`] and [`verify_same_length`] guard
//!   paired data vectors (`q`, `I`, `dy`, background, kernel rows).
use crate::{
    optimization::{errors::MaxEntError, maxent::validation as maxent_validation},
    size_distribution::errors::{SizeDistError, SizeDistResult},
};

/// Validate that a scalar option is finite and strictly positive.
///
/// # Errors
/// Returns [`SizeDistError::InvalidParameter`] naming `name` if `value` is
/// non-finite or ≤ 0.0.
pub fn verify_positive(name: &'static str, value: f64) -> SizeDistResult<()> {
    maxent_validation::verify_positive(name, value).map_err(|err| match err {
        MaxEntError::InvalidTolerance { name, value, reason } => {
            SizeDistError::InvalidParameter { name, value, reason }
        }
        other => SizeDistError::MaxEnt(other),
    })
}

/// # Errors
/// [`SizeDistError::EmptyInput`] if `len == 0`.
pub fn verify_non_empty(name: &'static str, len: usize) -> SizeDistResult<()> {
    if len == 0 {
        return Err(SizeDistError::EmptyInput { name });
    }
    Ok(())
}

/// # Errors
/// [`SizeDistError::LengthMismatch`] naming `name` if `found != expected`.
pub fn verify_same_length(name: &'static str, expected: usize, found: usize) -> SizeDistResult<()> {
    if found != expected {
        return Err(SizeDistError::LengthMismatch { name, expected, found });
    }
    Ok(())
}
