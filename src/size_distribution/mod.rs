//! size_distribution — workflow around the MaxEnt core for particle sizes.
//!
//! Purpose
//! -------
//! Prepare small-angle scattering data for a maximum-entropy inversion and
//! summarize the result: bin layout, residual weighting, power-law
//! background, noise replicas, quick/full fits and size statistics. The
//! kernel `G` for the chosen bins is still built by the caller.
//!
//! Key behaviors
//! -------------
//! - [`SizeBins`] lays out log- or linearly spaced bins from diameter
//!   bounds and stores them as radii.
//! - [`WeightType`] turns data and uncertainties into the MaxEnt `sigma`.
//! - [`fit_power_law`] estimates a background `A·q^m` to subtract and
//!   [`q_range_indices`] trims data to a Q window; [`prepare`] applies both
//!   to raw data in one step.
//! - [`quick_fit`] runs one solve; [`full_fit`] runs one solve per Gaussian
//!   noise replica on the rayon pool and reports spreads.
//! - [`SizeStatistics`] reduces the replica histograms to volume, mean,
//!   median and mode diameters and cumulative distributions.
//!
//! Invariants & assumptions
//! ------------------------
//! - Kernel rows follow the bin order of [`SizeBins`].
//! - All inputs are in-memory arrays; nothing here reads or writes files.
//!
//! Conventions
//! -----------
//! - Diameters at the API surface, radii inside [`SizeBins`].
//! - Errors surface as [`SizeDistError`]; MaxEnt failures are wrapped in
//!   [`SizeDistError::MaxEnt`].
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests on small hand-checkable inputs; the
//!   end-to-end pipeline on a sphere kernel is exercised in
//!   `tests/integration_maxent_pipeline.rs`.

pub mod background;
pub mod bins;
pub mod ensemble;
pub mod errors;
pub mod noise;
pub mod prepare;
pub mod statistics;
pub mod validation;
pub mod weights;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::background::{PowerLawFit, fit_power_law, q_range_indices};
pub use self::bins::SizeBins;
pub use self::ensemble::{
    EnsembleResult, ReplicaConvergence, SizeDistOptions, full_fit, quick_fit, run_ensemble,
};
pub use self::errors::{SizeDistError, SizeDistResult};
pub use self::noise::{add_gaussian_noise, noise_replicas};
pub use self::prepare::{PreparedData, prepare};
pub use self::statistics::{SizeStatistics, ellipsoid_volume};
pub use self::weights::WeightType;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::bins::SizeBins;
    pub use super::ensemble::{EnsembleResult, SizeDistOptions, full_fit, quick_fit};
    pub use super::errors::{SizeDistError, SizeDistResult};
    pub use super::prepare::{PreparedData, prepare};
    pub use super::statistics::SizeStatistics;
    pub use super::weights::WeightType;
}
