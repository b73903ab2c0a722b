//! maxent — Skilling–Bryan maximum-entropy inversion on an argmin executor.
//!
//! Purpose
//! -------
//! Recover a strictly positive histogram `f` over size bins whose model
//! curve `f·G` fits measured scattering data `I` to a reduced chi-squared
//! of one, while maximizing the entropy of `f` relative to an initial
//! histogram. Callers supply `I`, `sigma`, the kernel `G` and the initial
//! histogram, then invoke [`solve`].
//!
//! Key behaviors
//! -------------
//! - [`cholesky::solve3`] solves the 3×3 subspace systems in closed form.
//! - [`step::choose_step`] picks the step inside the three-direction
//!   subspace by bisection over the curvature blend, then caps its
//!   entropy-metric distance.
//! - [`solver::MaxEntSB`] implements one iteration as an
//!   `argmin::core::Solver`; [`run::run_maxent`] drives it with
//!   `argmin::core::Executor` and builds a [`MaxEntOutcome`].
//! - [`monitor`] exposes each iteration to a caller-supplied [`Monitor`],
//!   which may cancel the run.
//!
//! Invariants & assumptions
//! ------------------------
//! - `G` has shape `(n_bins, npt)`; `sigma` and `first_bins` are strictly
//!   positive; all inputs are finite. [`SasProblem::new`] enforces this
//!   before the first iteration.
//! - The working histogram stays strictly positive after every update.
//! - No process-wide state: tolerances travel in [`MaxEntOptions`].
//!
//! Conventions
//! -----------
//! - Indices are 0-based; reported iteration numbers are 1-based counts.
//! - Exhausting `iter_max` is not an error (`converged == false`).
//! - Errors surface as [`MaxEntError`](crate::optimization::errors::MaxEntError).
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each submodule; the end-to-end scenarios on a
//!   sphere kernel are in `tests/integration_maxent_pipeline.rs`.

pub mod api;
pub mod cholesky;
pub mod monitor;
pub mod options;
pub mod outcome;
pub mod problem;
pub mod run;
pub mod solver;
pub mod step;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::{solve, solve_monitored};
pub use self::monitor::{IterationReport, Monitor, NoMonitor};
pub use self::options::MaxEntOptions;
pub use self::outcome::MaxEntOutcome;
pub use self::problem::SasProblem;
pub use self::types::{Curve, FnEvalMap, Histogram, Kernel, SEARCH_DIRECTIONS};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sas_maxent::optimization::maxent::prelude::*;
//
// to import the main solver surface in a single line.

pub mod prelude {
    pub use super::api::{solve, solve_monitored};
    pub use super::monitor::{IterationReport, Monitor};
    pub use super::options::MaxEntOptions;
    pub use super::outcome::MaxEntOutcome;
    pub use super::types::{Curve, Histogram, Kernel};
}
