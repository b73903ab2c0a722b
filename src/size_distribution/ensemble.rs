//! Quick and full MaxEnt size-distribution fits.
//!
//! Purpose
//! -------
//! Turn background-subtracted data, a caller-built kernel and a bin layout
//! into a size distribution with uncertainties. A quick fit runs one MaxEnt
//! solve on the data; a full fit runs one solve per Gaussian noise replica
//! of the data, in parallel, and summarizes the spread.
//!
//! Key behaviors
//! -------------
//! - Every solve starts from a flat histogram
//!   `sky_background · scale / contrast` and uses
//!   `sigma = weight_factor · weights` computed once from the measured data.
//! - Replicas run on the rayon thread pool; each solve owns its working
//!   histogram, so the only shared state is the borrowed kernel.
//! - A replica failing with a numerical breakdown
//!   ([`ErrorKind::Numerical`]) is logged and dropped; any other error
//!   aborts the run. If every replica fails the run fails with
//!   [`SizeDistError::NoSuccessfulReplicas`].
//! - Replicas that exhaust their iteration budget still count; a warning is
//!   logged for each.
//!
//! Conventions
//! -----------
//! - `bin_magnitude = mean(f) / (2·width)`; its spread and the spread of the
//!   fit curve are population standard deviations and are only reported
//!   when more than one replica succeeded.
use crate::{
    optimization::{
        errors::ErrorKind,
        maxent::{MaxEntOptions, MaxEntOutcome, solve},
    },
    size_distribution::{
        bins::SizeBins,
        errors::{SizeDistError, SizeDistResult},
        noise::noise_replicas,
        statistics::{SizeStatistics, stack_rows},
        validation::{verify_positive, verify_same_length},
        weights::WeightType,
    },
};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

/// Configuration of a quick or full size-distribution fit.
///
/// Fields:
/// - `weight_type`, `weight_factor`: residual weighting, `sigma =
///   weight_factor · weights`.
/// - `sky_background`, `scale`, `contrast`: set the flat initial histogram
///   `sky_background · scale / contrast`.
/// - `aspect_ratio`: ellipsoid aspect ratio for the number distribution.
/// - `n_reps`: number of noise replicas of a full fit.
/// - `seed`: RNG seed of the replicas; `None` draws from OS entropy.
/// - `maxent`: options of every MaxEnt solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeDistOptions {
    pub weight_type: WeightType,
    pub weight_factor: f64,
    pub sky_background: f64,
    pub scale: f64,
    pub contrast: f64,
    pub aspect_ratio: f64,
    pub n_reps: usize,
    pub seed: Option<u64>,
    pub maxent: MaxEntOptions,
}

impl SizeDistOptions {
    /// Check every field, including the nested MaxEnt options.
    ///
    /// # Errors
    /// - [`SizeDistError::InvalidParameter`] for a non-finite or
    ///   non-positive scalar.
    /// - [`SizeDistError::NoReplicas`] if `n_reps == 0`.
    /// - [`SizeDistError::MaxEnt`] if the MaxEnt options are invalid.
    pub fn validate(&self) -> SizeDistResult<()> {
        verify_positive("weight_factor", self.weight_factor)?;
        verify_positive("sky_background", self.sky_background)?;
        verify_positive("scale", self.scale)?;
        verify_positive("contrast", self.contrast)?;
        verify_positive("aspect_ratio", self.aspect_ratio)?;
        if self.n_reps == 0 {
            return Err(SizeDistError::NoReplicas);
        }
        self.maxent.validate()?;
        Ok(())
    }

    /// Flat initial histogram over `n_bins` bins.
    pub fn initial_bins(&self, n_bins: usize) -> Array1<f64> {
        Array1::from_elem(n_bins, self.sky_background * self.scale / self.contrast)
    }
}

impl Default for SizeDistOptions {
    fn default() -> Self {
        Self {
            weight_type: WeightType::Dy,
            weight_factor: 1.0,
            sky_background: 1e-6,
            scale: 1.0,
            contrast: 1.0,
            aspect_ratio: 1.0,
            n_reps: 10,
            seed: None,
            maxent: MaxEntOptions::default(),
        }
    }
}

/// Convergence record of one replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaConvergence {
    pub replica: usize,
    pub converged: bool,
    pub iterations: usize,
}

/// Summary of a quick or full fit.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleResult {
    /// Mean reduced chi-squared over successful replicas.
    pub chisq: f64,
    pub bin_magnitude: Array1<f64>,
    pub bin_magnitude_err: Option<Array1<f64>>,
    /// Mean model curve `f·G`.
    pub fit: Array1<f64>,
    pub fit_err: Option<Array1<f64>>,
    pub convergence: Vec<ReplicaConvergence>,
    pub statistics: SizeStatistics,
}

impl EnsembleResult {
    /// Number of replicas that produced a histogram.
    pub fn n_successful(&self) -> usize {
        self.convergence.len()
    }

    pub fn all_converged(&self) -> bool {
        self.convergence.iter().all(|c| c.converged)
    }
}

/// One MaxEnt solve on the measured intensities.
///
/// Unlike [`run_ensemble`], a numerical breakdown is returned as is.
///
/// # Errors
/// - Option, weighting and shape errors before the solve.
/// - Any MaxEnt error of the solve, including numerical breakdowns.
pub fn quick_fit(
    intensity: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>, kernel: ArrayView2<'_, f64>,
    bins: &SizeBins, opts: &SizeDistOptions,
) -> SizeDistResult<EnsembleResult> {
    opts.validate()?;
    let sigma = opts.weight_type.sigma(intensity, dy, opts.weight_factor)?;
    let first = opts.initial_bins(bins.n_bins());
    let outcome = solve(intensity, sigma.view(), kernel, first.view(), &opts.maxent)?;
    summarize(&[(0, outcome)], bins, opts)
}

/// `n_reps` MaxEnt solves on Gaussian noise replicas of the data.
///
/// Noise is drawn with standard deviations `dy`, which are therefore
/// required even when the weighting does not use them.
///
/// # Errors
/// - [`SizeDistError::MissingUncertainty`] without `dy`.
/// - Noise, option, weighting and shape errors before any solve.
/// - See [`run_ensemble`] for failures during the solves.
pub fn full_fit(
    intensity: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>, kernel: ArrayView2<'_, f64>,
    bins: &SizeBins, opts: &SizeDistOptions,
) -> SizeDistResult<EnsembleResult> {
    opts.validate()?;
    let dy_values = dy.ok_or(SizeDistError::MissingUncertainty)?;
    let sigma = opts.weight_type.sigma(intensity, dy, opts.weight_factor)?;
    let replicas = noise_replicas(intensity, dy_values, opts.n_reps, opts.seed)?;
    run_ensemble(&replicas, sigma.view(), kernel, bins, opts)
}

/// Solve every replica in parallel and summarize the successful ones.
///
/// # Errors
/// - [`SizeDistError::NoReplicas`] for an empty replica list.
/// - [`SizeDistError::LengthMismatch`] if the kernel rows do not match the
///   bins.
/// - [`SizeDistError::MaxEnt`] for the first non-numerical solve failure.
/// - [`SizeDistError::NoSuccessfulReplicas`] if every solve broke down
///   numerically.
pub fn run_ensemble(
    replicas: &[Array1<f64>], sigma: ArrayView1<'_, f64>, kernel: ArrayView2<'_, f64>,
    bins: &SizeBins, opts: &SizeDistOptions,
) -> SizeDistResult<EnsembleResult> {
    if replicas.is_empty() {
        return Err(SizeDistError::NoReplicas);
    }
    verify_same_length("kernel rows", bins.n_bins(), kernel.nrows())?;
    let first = opts.initial_bins(bins.n_bins());

    let results: Vec<_> = replicas
        .par_iter()
        .enumerate()
        .map(|(replica, intensity)| {
            (replica, solve(intensity.view(), sigma, kernel, first.view(), &opts.maxent))
        })
        .collect();

    let mut outcomes: Vec<(usize, MaxEntOutcome)> = Vec::with_capacity(results.len());
    for (replica, result) in results {
        match result {
            Ok(outcome) => outcomes.push((replica, outcome)),
            Err(err) if err.kind() == ErrorKind::Numerical => {
                log::error!("Replica {replica}: maximum entropy fit failed: {err}");
            }
            Err(err) => return Err(err.into()),
        }
    }
    if outcomes.is_empty() {
        return Err(SizeDistError::NoSuccessfulReplicas { attempted: replicas.len() });
    }
    summarize(&outcomes, bins, opts)
}

// ---- Helper Methods ----

fn summarize(
    outcomes: &[(usize, MaxEntOutcome)], bins: &SizeBins, opts: &SizeDistOptions,
) -> SizeDistResult<EnsembleResult> {
    let convergence: Vec<ReplicaConvergence> = outcomes
        .iter()
        .map(|(replica, o)| ReplicaConvergence {
            replica: *replica,
            converged: o.converged,
            iterations: o.iterations,
        })
        .collect();
    for c in convergence.iter().filter(|c| !c.converged) {
        log::warn!(
            "Replica {}: maximum entropy fit did not converge after {} iterations",
            c.replica,
            c.iterations
        );
    }

    let distributions: Vec<Array1<f64>> =
        outcomes.iter().map(|(_, o)| o.distribution.clone()).collect();
    let fits: Vec<Array1<f64>> = outcomes.iter().map(|(_, o)| o.fit.clone()).collect();
    let npt = fits[0].len();
    let stacked = stack_rows(&distributions, bins.n_bins())?;
    let stacked_fits = stack_rows(&fits, npt)?;

    let density_scale = bins.widths().mapv(|w| 2.0 * w);
    let bin_magnitude = stacked.mean_axis(Axis(0)).ok_or(SizeDistError::NoReplicas)? / &density_scale;
    let fit = stacked_fits.mean_axis(Axis(0)).ok_or(SizeDistError::NoReplicas)?;
    let spread = outcomes.len() > 1;
    let bin_magnitude_err = spread.then(|| stacked.std_axis(Axis(0), 0.0) / &density_scale);
    let fit_err = spread.then(|| stacked_fits.std_axis(Axis(0), 0.0));

    let chisq = outcomes.iter().map(|(_, o)| o.reduced_chisq).sum::<f64>() / outcomes.len() as f64;
    let statistics = SizeStatistics::from_replicas(bins, &distributions, opts.aspect_ratio)?;

    Ok(EnsembleResult {
        chisq,
        bin_magnitude,
        bin_magnitude_err,
        fit,
        fit_err,
        convergence,
        statistics,
    })
}
