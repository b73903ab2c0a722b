//! maxent::types — shared numeric aliases for the MaxEnt core.
//!
//! Purpose
//! -------
//! Centralize the vector and matrix types used by the maximum-entropy
//! solver so the rest of the code stays agnostic to which of `ndarray` or
//! `nalgebra` backs a given quantity.
//!
//! Conventions
//! -----------
//! - Solution-space vectors (length `n_bins`) are [`Histogram`]; data-space
//!   vectors (length `npt`) are [`Curve`]. Both are `ndarray::Array1<f64>`.
//! - The kernel `G` is a dense `(n_bins, npt)` [`Kernel`]; row `i` is the
//!   scattering curve of a unit amount in size bin `i`.
//! - Everything living in the three-direction search subspace uses
//!   `nalgebra` fixed-size types ([`Subspace`], [`SubspaceMetric`]) so the
//!   dimension is checked at compile time.
use nalgebra::{Matrix3, Vector3};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Trial histogram `f` over the size bins.
pub type Histogram = Array1<f64>;

/// Data-space vector: intensities, residuals, or a direction's image.
pub type Curve = Array1<f64>;

/// Kernel matrix `G` with shape `(n_bins, npt)`.
pub type Kernel = Array2<f64>;

/// Coefficients over the three search directions (`c1`, `s1`, `beta`).
pub type Subspace = Vector3<f64>;

/// Symmetric 3×3 curvature matrix over the search directions (`c2`, `s2`).
pub type SubspaceMetric = Matrix3<f64>;

/// Function-evaluation counters as reported by the executor.
pub type FnEvalMap = HashMap<String, u64>;

/// Number of search directions spanned per iteration.
pub const SEARCH_DIRECTIONS: usize = 3;
