//! Errors for the maximum-entropy solver (input preconditions, option
//! checks, linear-algebra and step-selection failures, and argmin backend
//! errors).
//!
//! This module defines [`MaxEntError`], the single error type returned by the
//! MaxEnt core, and the [`MaxEntResult`] alias. Errors are grouped by
//! [`ErrorKind`] so callers can separate genuine numerical breakdowns from
//! "garbage in" preconditions without matching on every variant.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Outer-loop exhaustion is **not** an error; it is reported through
//!   `MaxEntOutcome::converged == false`.
//! - argmin errors raised inside the executor are downcast back into
//!   [`MaxEntError`] so the original variant survives the round trip.
use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for MaxEnt operations.
pub type MaxEntResult<T> = Result<T, MaxEntError>;

/// Coarse classification of a [`MaxEntError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The 3×3 curvature blend handed to the linear solver was not
    /// positive definite.
    Domain,
    /// The alpha chop in the step chooser ran out of loops.
    Convergence,
    /// Invalid caller input or options, detected before the first iteration.
    Precondition,
    /// A normalizing quantity vanished or the histogram left the finite range.
    Numerical,
    /// Error surfaced by the argmin executor itself.
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaxEntError {
    // ---- Linear solver ----
    /// Cholesky pivot `pivot` of the 3×3 system was not strictly positive.
    NotPositiveDefinite { pivot: usize, value: f64 },

    // ---- Step chooser ----
    /// Bisection over the blend parameter did not reach the target ratio.
    AlphaChopNoConvergence { loops: usize, residual: f64 },

    // ---- Iteration ----
    /// A quantity used as a divisor vanished (or became non-finite).
    DegenerateStep { quantity: &'static str, value: f64 },

    /// The updated histogram contains a non-finite bin.
    NonFiniteHistogram { index: usize, value: f64 },

    // ---- Input validation ----
    /// No data points were supplied.
    EmptyData,

    /// No size bins were supplied.
    EmptyDistribution,

    /// A data-space vector does not have `npt` entries.
    LengthMismatch { name: &'static str, expected: usize, found: usize },

    /// Kernel shape must be `(n_bins, npt)`.
    KernelShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// An input contains NaN or ±inf.
    NonFiniteInput { name: &'static str, index: usize, value: f64 },

    /// `sigma` entries are divisors and must be strictly positive.
    NonPositiveSigma { index: usize, value: f64 },

    /// `first_bins` entries are entropy priors and must be strictly positive.
    NonPositivePrior { index: usize, value: f64 },

    // ---- MaxEntOptions ----
    /// A tolerance or factor must be finite and strictly positive.
    InvalidTolerance { name: &'static str, value: f64, reason: &'static str },

    /// Outer iteration budget must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// Alpha-chop loop budget must be positive.
    InvalidMoveLoops { loops: usize, reason: &'static str },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl MaxEntError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MaxEntError::NotPositiveDefinite { .. } => ErrorKind::Domain,
            MaxEntError::AlphaChopNoConvergence { .. } => ErrorKind::Convergence,
            MaxEntError::DegenerateStep { .. } | MaxEntError::NonFiniteHistogram { .. } => {
                ErrorKind::Numerical
            }
            MaxEntError::EmptyData
            | MaxEntError::EmptyDistribution
            | MaxEntError::LengthMismatch { .. }
            | MaxEntError::KernelShapeMismatch { .. }
            | MaxEntError::NonFiniteInput { .. }
            | MaxEntError::NonPositiveSigma { .. }
            | MaxEntError::NonPositivePrior { .. }
            | MaxEntError::InvalidTolerance { .. }
            | MaxEntError::InvalidMaxIter { .. }
            | MaxEntError::InvalidMoveLoops { .. } => ErrorKind::Precondition,
            MaxEntError::InvalidParameter { .. }
            | MaxEntError::NotInitialized { .. }
            | MaxEntError::ConditionViolated { .. }
            | MaxEntError::PotentialBug { .. }
            | MaxEntError::BackendError { .. }
            | MaxEntError::UnknownError => ErrorKind::Backend,
        }
    }
}

impl std::error::Error for MaxEntError {}

impl std::fmt::Display for MaxEntError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Linear solver ----
            MaxEntError::NotPositiveDefinite { pivot, value } => {
                write!(
                    f,
                    "Matrix not positive definite: pivot {pivot} is {value}, value must be positive"
                )
            }

            // ---- Step chooser ----
            MaxEntError::AlphaChopNoConvergence { loops, residual } => {
                write!(
                    f,
                    "No convergence in alpha chop after {loops} loops (residual {residual})"
                )
            }

            // ---- Iteration ----
            MaxEntError::DegenerateStep { quantity, value } => {
                write!(
                    f,
                    "Degenerate step: {quantity} is {value}; try increasing the error weighting"
                )
            }
            MaxEntError::NonFiniteHistogram { index, value } => {
                write!(f, "Histogram bin {index} became non-finite: {value}")
            }

            // ---- Input validation ----
            MaxEntError::EmptyData => {
                write!(f, "Intensity data is empty")
            }
            MaxEntError::EmptyDistribution => {
                write!(f, "Initial distribution has no bins")
            }
            MaxEntError::LengthMismatch { name, expected, found } => {
                write!(f, "Length mismatch for {name}: expected {expected}, found {found}")
            }
            MaxEntError::KernelShapeMismatch { expected, found } => {
                write!(f, "Kernel shape mismatch: expected {expected:?}, found {found:?}")
            }
            MaxEntError::NonFiniteInput { name, index, value } => {
                write!(f, "Invalid {name} at index {index}: {value}, must be finite")
            }
            MaxEntError::NonPositiveSigma { index, value } => {
                write!(f, "Invalid sigma at index {index}: {value}, must be > 0")
            }
            MaxEntError::NonPositivePrior { index, value } => {
                write!(f, "Invalid initial bin at index {index}: {value}, must be > 0")
            }

            // ---- MaxEntOptions ----
            MaxEntError::InvalidTolerance { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            MaxEntError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            MaxEntError::InvalidMoveLoops { loops, reason } => {
                write!(f, "Invalid alpha-chop loop limit {loops}: {reason}")
            }

            // ---- Argmin ----
            MaxEntError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            MaxEntError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            MaxEntError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            MaxEntError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            MaxEntError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            MaxEntError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for MaxEntError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<MaxEntError>() {
            Ok(maxent_err) => return maxent_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => MaxEntError::InvalidParameter { text },
                ArgminError::NotInitialized { text } => MaxEntError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => MaxEntError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => MaxEntError::PotentialBug { text },
                _ => MaxEntError::UnknownError,
            },
            Err(err) => MaxEntError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<MaxEntError> for PyErr {
    fn from(err: MaxEntError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `ErrorKind` classification of the domain / convergence / precondition
    //   variants named in the error taxonomy.
    // - Payload embedding in `Display` messages.
    // - Round trip of a `MaxEntError` through `argmin::core::Error`.
    //
    // They intentionally DO NOT cover:
    // - The `From<MaxEntError> for PyErr` conversion, which needs the Python
    //   C API at link time.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The two fatal numerical failures keep distinct kinds.
    //
    // Given
    // -----
    // - A `NotPositiveDefinite` and an `AlphaChopNoConvergence` error.
    //
    // Expect
    // ------
    // - Kinds `Domain` and `Convergence` respectively.
    fn fatal_numerical_errors_have_distinct_kinds() {
        let domain = MaxEntError::NotPositiveDefinite { pivot: 0, value: -1.0 };
        let chop = MaxEntError::AlphaChopNoConvergence { loops: 5000, residual: 0.3 };

        assert_eq!(domain.kind(), ErrorKind::Domain);
        assert_eq!(chop.kind(), ErrorKind::Convergence);
        assert_eq!(MaxEntError::EmptyData.kind(), ErrorKind::Precondition);
    }

    #[test]
    // Purpose
    // -------
    // `Display` embeds the offending value.
    //
    // Given
    // -----
    // - `NonPositivePrior { index: 3, value: -2.5 }`.
    //
    // Expect
    // ------
    // - The message names index 3 and the value -2.5.
    fn display_embeds_index_and_value() {
        let msg = MaxEntError::NonPositivePrior { index: 3, value: -2.5 }.to_string();

        assert!(msg.contains("index 3"), "message was: {msg}");
        assert!(msg.contains("-2.5"), "message was: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // A crate error boxed into `argmin::core::Error` converts back into the
    // same variant.
    //
    // Given
    // -----
    // - `AlphaChopNoConvergence` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `MaxEntError::from` yields an identical value.
    fn crate_error_survives_argmin_round_trip() {
        let original = MaxEntError::AlphaChopNoConvergence { loops: 12, residual: 0.5 };
        let boxed: Error = original.clone().into();

        assert_eq!(MaxEntError::from(boxed), original);
    }

    #[test]
    // Purpose
    // -------
    // argmin's own errors map onto the wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::NotInitialized` boxed into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `MaxEntError::NotInitialized` carrying the same text.
    fn argmin_error_maps_to_wrapper_variant() {
        let boxed: Error = ArgminError::NotInitialized { text: "no param".to_string() }.into();

        assert_eq!(
            MaxEntError::from(boxed),
            MaxEntError::NotInitialized { text: "no param".to_string() }
        );
    }
}
