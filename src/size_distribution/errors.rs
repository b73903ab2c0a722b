//! Errors for the size-distribution workflow (bin layout, weighting, noise
//! replicas, background fits, and ensemble runs).
//!
//! This module defines [`SizeDistError`] and the [`SizeDistResult`] alias.
//! Failures of an individual MaxEnt solve are carried unchanged in
//! [`SizeDistError::MaxEnt`].
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Sizes are diameters at the API surface and radii inside
//!   [`SizeBins`](crate::size_distribution::bins::SizeBins).
use crate::optimization::errors::MaxEntError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for size-distribution operations.
pub type SizeDistResult<T> = Result<T, SizeDistError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SizeDistError {
    // ---- Bin layout ----
    /// At least one size bin is required.
    NoBins,

    /// Diameter bounds must be finite, positive and increasing.
    InvalidDiameterRange { diam_min: f64, diam_max: f64 },

    /// Cumulative statistics need at least `needed` bins.
    TooFewBins { needed: usize, found: usize },

    // ---- Data vectors ----
    /// Input vectors must be non-empty.
    EmptyInput { name: &'static str },

    /// Paired vectors must have the same length.
    LengthMismatch { name: &'static str, expected: usize, found: usize },

    /// Gaussian noise needs strictly positive standard deviations.
    NonPositiveUncertainty { index: usize, value: f64 },

    /// A value that enters a logarithm or a square root is out of domain.
    NonPositiveValue { name: &'static str, index: usize, value: f64 },

    // ---- Weighting ----
    /// Weight type string not recognized.
    UnknownWeightType { text: String },

    /// `dI` weighting selected but the data carry no uncertainties.
    MissingUncertainty,

    // ---- Background fit ----
    /// `qmin` must be strictly below `qmax`.
    InvalidQRange { qmin: f64, qmax: f64 },

    /// Fewer points in range than free parameters.
    TooFewPoints { needed: usize, found: usize },

    /// The weighted normal equations of the log–log line are singular.
    SingularFit,

    // ---- Options ----
    /// A scalar option is non-finite or out of range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// At least one replica is required.
    NoReplicas,

    // ---- Ensemble ----
    /// Every replica failed numerically.
    NoSuccessfulReplicas { attempted: usize },

    /// The recovered distribution has no positive volume.
    DegenerateDistribution { volume: f64 },

    /// A MaxEnt solve failed.
    MaxEnt(MaxEntError),
}

impl std::error::Error for SizeDistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SizeDistError::MaxEnt(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SizeDistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Bin layout ----
            SizeDistError::NoBins => write!(f, "Number of size bins must be at least 1"),
            SizeDistError::InvalidDiameterRange { diam_min, diam_max } => {
                write!(
                    f,
                    "Invalid diameter range [{diam_min}, {diam_max}]: bounds must be finite, positive and increasing"
                )
            }
            SizeDistError::TooFewBins { needed, found } => {
                write!(f, "Need at least {needed} size bins, found {found}")
            }

            // ---- Data vectors ----
            SizeDistError::EmptyInput { name } => write!(f, "Input {name} is empty"),
            SizeDistError::LengthMismatch { name, expected, found } => {
                write!(f, "Length mismatch for {name}: expected {expected}, found {found}")
            }
            SizeDistError::NonPositiveUncertainty { index, value } => {
                write!(f, "All sigma values must be positive: index {index} is {value}")
            }
            SizeDistError::NonPositiveValue { name, index, value } => {
                write!(f, "Invalid {name} at index {index}: {value}, must be > 0")
            }

            // ---- Weighting ----
            SizeDistError::UnknownWeightType { text } => {
                write!(
                    f,
                    "Unknown weight type '{text}': expected one of 'None', 'dI', 'sqrt(I Data)', 'percentI'"
                )
            }
            SizeDistError::MissingUncertainty => {
                write!(f, "Weight type 'dI' requires intensity uncertainties")
            }

            // ---- Background fit ----
            SizeDistError::InvalidQRange { qmin, qmax } => {
                write!(f, "Fit range Qmin ({qmin}) must be smaller than Qmax ({qmax})")
            }
            SizeDistError::TooFewPoints { needed, found } => {
                write!(f, "Need more data points than fitting parameters: {found} in range, {needed} needed")
            }
            SizeDistError::SingularFit => write!(f, "Background fit is singular"),

            // ---- Options ----
            SizeDistError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            SizeDistError::NoReplicas => write!(f, "Number of replicas must be at least 1"),

            // ---- Ensemble ----
            SizeDistError::NoSuccessfulReplicas { attempted } => {
                write!(
                    f,
                    "Maximum entropy fitting failed for all {attempted} replicas; try different input values"
                )
            }
            SizeDistError::DegenerateDistribution { volume } => {
                write!(f, "Recovered distribution has no positive volume ({volume})")
            }
            SizeDistError::MaxEnt(err) => write!(f, "{err}"),
        }
    }
}

impl From<MaxEntError> for SizeDistError {
    fn from(err: MaxEntError) -> Self {
        SizeDistError::MaxEnt(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<SizeDistError> for PyErr {
    fn from(err: SizeDistError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
