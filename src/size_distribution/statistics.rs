//! Summary statistics of a recovered size distribution.
//!
//! Purpose
//! -------
//! Reduce the MaxEnt histograms of an ensemble (one per replica) to the
//! quantities shown next to a size-distribution plot: total volume fraction
//! with its spread, mean / median / mode diameters, and the cumulative
//! volume and number distributions.
//!
//! Key behaviors
//! -------------
//! - Volume CDFs integrate `f / (2·width)` over the bin diameters
//!   `2·centers` with the cumulative trapezoid rule, one per replica.
//! - `volume` is the mean total of those CDFs, `volume_err` their population
//!   standard deviation; the volume-fraction CDF is the mean CDF divided by
//!   `volume`.
//! - The number distribution divides the bin magnitude by the ellipsoid
//!   volume `4π/3 · (aspect·r) · r²` of each bin.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two bins, so every CDF has at least one segment.
//! - Every histogram has one entry per bin.
//!
//! Conventions
//! -----------
//! - Reported sizes are diameters; CDFs have length `n_bins - 1` and entry
//!   `k` belongs to the segment ending at bin `k + 1`.
use crate::size_distribution::{
    bins::SizeBins,
    errors::{SizeDistError, SizeDistResult},
    validation::{verify_positive, verify_same_length},
};
use ndarray::{Array1, Array2, ArrayView1, Axis, s};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct SizeStatistics {
    /// Mean integrated volume fraction over replicas.
    pub volume: f64,
    /// Population standard deviation of the integrated volume fraction.
    pub volume_err: f64,
    /// Mean diameter of the volume-weighted histogram.
    pub mean: f64,
    /// First bin diameter where the volume-fraction CDF reaches one half.
    pub median: f64,
    /// Diameter of the largest number-distribution bin.
    pub mode: f64,
    pub volume_fraction_cdf: Array1<f64>,
    pub number_distribution: Array1<f64>,
    pub number_cdf: Array1<f64>,
}

impl SizeStatistics {
    /// Statistics of the replica histograms `distributions` on `bins`.
    ///
    /// `aspect_ratio` is the polar-to-equatorial ratio of the ellipsoid
    /// used for the number distribution (1 for spheres).
    ///
    /// # Errors
    /// - [`SizeDistError::NoReplicas`] for an empty ensemble.
    /// - [`SizeDistError::TooFewBins`] with fewer than two bins.
    /// - [`SizeDistError::LengthMismatch`] if a histogram does not match the
    ///   bin count.
    /// - [`SizeDistError::InvalidParameter`] for a non-positive aspect ratio.
    /// - [`SizeDistError::DegenerateDistribution`] if the mean volume is not
    ///   positive.
    pub fn from_replicas(
        bins: &SizeBins, distributions: &[Array1<f64>], aspect_ratio: f64,
    ) -> SizeDistResult<Self> {
        verify_positive("aspect_ratio", aspect_ratio)?;
        if bins.n_bins() < 2 {
            return Err(SizeDistError::TooFewBins { needed: 2, found: bins.n_bins() });
        }
        let stacked = stack_rows(distributions, bins.n_bins())?;
        let diameters = bins.diameters();
        let density_scale = bins.widths().mapv(|w| 2.0 * w);

        let mut cdfs = Array2::<f64>::zeros((stacked.nrows(), bins.n_bins() - 1));
        for (row, f) in stacked.rows().into_iter().enumerate() {
            let density = &f / &density_scale;
            cdfs.row_mut(row).assign(&cumulative_trapezoid(density.view(), diameters.view()));
        }
        let totals = cdfs.column(cdfs.ncols() - 1).to_owned();
        let volume = totals.mean().unwrap_or(f64::NAN);
        if !(volume.is_finite() && volume > 0.0) {
            return Err(SizeDistError::DegenerateDistribution { volume });
        }
        let volume_err = totals.std(0.0);

        let mean_cdf = cdfs.mean_axis(Axis(0)).ok_or(SizeDistError::NoReplicas)?;
        let volume_fraction_cdf = mean_cdf / volume;
        let median_index = volume_fraction_cdf
            .iter()
            .position(|&v| v >= 0.5)
            .ok_or(SizeDistError::DegenerateDistribution { volume })?;
        let median = diameters[median_index];

        let magnitude = stacked.mean_axis(Axis(0)).ok_or(SizeDistError::NoReplicas)?
            / &density_scale;
        let number_distribution = &magnitude
            / &bins.centers().mapv(|r| ellipsoid_volume(aspect_ratio * r, r));
        let mode = diameters[argmax(number_distribution.view())];
        let number_cdf = cumulative_trapezoid(number_distribution.view(), diameters.view());
        let number_total = number_cdf[number_cdf.len() - 1];
        let number_cdf = number_cdf / number_total;

        let mean = histogram_mean(magnitude.view(), bins.edges().mapv(|e| 2.0 * e).view());

        Ok(Self {
            volume,
            volume_err,
            mean,
            median,
            mode,
            volume_fraction_cdf,
            number_distribution,
            number_cdf,
        })
    }
}

/// Volume of an ellipsoid of revolution with polar radius `rp` and
/// equatorial radius `re`.
pub fn ellipsoid_volume(rp: f64, re: f64) -> f64 {
    4.0 * PI / 3.0 * rp * re * re
}

/// Cumulative trapezoid integral of `y` over `x`, without the leading zero.
pub fn cumulative_trapezoid(y: ArrayView1<'_, f64>, x: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut running = 0.0;
    (1..y.len().min(x.len()))
        .map(|k| {
            running += 0.5 * (y[k] + y[k - 1]) * (x[k] - x[k - 1]);
            running
        })
        .collect()
}

/// Stack equal-length histograms into an `(n_reps, n_bins)` matrix.
pub(crate) fn stack_rows(rows: &[Array1<f64>], n_bins: usize) -> SizeDistResult<Array2<f64>> {
    if rows.is_empty() {
        return Err(SizeDistError::NoReplicas);
    }
    let mut stacked = Array2::<f64>::zeros((rows.len(), n_bins));
    for (mut target, row) in stacked.rows_mut().into_iter().zip(rows) {
        verify_same_length("distribution", n_bins, row.len())?;
        target.assign(row);
    }
    Ok(stacked)
}

// ---- Helper Methods ----

fn argmax(values: ArrayView1<'_, f64>) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Mean of the piecewise-constant density with heights `h` on `edges`.
fn histogram_mean(h: ArrayView1<'_, f64>, edges: ArrayView1<'_, f64>) -> f64 {
    let lo = edges.slice(s![..-1]);
    let hi = edges.slice(s![1..]);
    let mass: f64 = h.iter().zip(lo.iter().zip(hi.iter())).map(|(h, (a, b))| h * (b - a)).sum();
    let moment: f64 =
        h.iter().zip(lo.iter().zip(hi.iter())).map(|(h, (a, b))| h * (b * b - a * a) / 2.0).sum();
    moment / mass
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The cumulative trapezoid rule.
    // - Hand-computed statistics of a two-bin distribution, single replica
    //   and a two-replica ensemble.
    // - Input validation.
    // -------------------------------------------------------------------------

    fn two_bins() -> SizeBins {
        // Radii edges (5, 50, 500), centers (27.5, 275), widths (45, 450).
        SizeBins::new(10.0, 1000.0, 2, true).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The cumulative trapezoid rule matches the running integral of a line.
    fn cumulative_trapezoid_integrates_linear_function() {
        let x = array![0.0, 1.0, 2.0, 4.0];
        let y = x.mapv(|v| 2.0 * v);

        let cdf = cumulative_trapezoid(y.view(), x.view());

        assert_eq!(cdf.len(), 3);
        assert_relative_eq!(cdf[0], 1.0);
        assert_relative_eq!(cdf[1], 4.0);
        assert_relative_eq!(cdf[2], 16.0);
    }

    #[test]
    // Purpose
    // -------
    // A flat density on two bins gives hand-computable statistics.
    //
    // Given
    // -----
    // - `f = (90, 900)`, so `f / (2·width) = (1, 1)` on diameters (55, 550).
    //
    // Expect
    // ------
    // - `volume = 495`, `volume_err = 0`, volume CDF `[1]`.
    // - `median = mode = 55` (the smaller bin carries more particles).
    // - `mean = Σ h(b² − a²)/2 / Σ h(b − a) = 499950 / 990` on diameter
    //   edges (10, 100, 1000).
    fn flat_density_statistics() {
        let bins = two_bins();

        let stats = SizeStatistics::from_replicas(&bins, &[array![90.0, 900.0]], 1.0).unwrap();

        assert_relative_eq!(stats.volume, 495.0, max_relative = 1e-12);
        assert_relative_eq!(stats.volume_err, 0.0);
        assert_relative_eq!(stats.volume_fraction_cdf[0], 1.0, max_relative = 1e-12);
        assert_relative_eq!(stats.median, 55.0, max_relative = 1e-12);
        assert_relative_eq!(stats.mode, 55.0, max_relative = 1e-12);
        assert_relative_eq!(stats.mean, 499_950.0 / 990.0, max_relative = 1e-12);
        assert_relative_eq!(
            stats.number_distribution[0],
            1.0 / ellipsoid_volume(27.5, 27.5),
            max_relative = 1e-12
        );
        assert_relative_eq!(stats.number_cdf[0], 1.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Replica spread enters `volume_err` as a population standard deviation.
    //
    // Given
    // -----
    // - Replicas with totals 495 and 990.
    //
    // Expect
    // ------
    // - `volume = 742.5`, `volume_err = 247.5`.
    fn ensemble_volume_uses_population_spread() {
        let bins = two_bins();
        let reps = [array![90.0, 900.0], array![180.0, 1800.0]];

        let stats = SizeStatistics::from_replicas(&bins, &reps, 1.0).unwrap();

        assert_relative_eq!(stats.volume, 742.5, max_relative = 1e-12);
        assert_relative_eq!(stats.volume_err, 247.5, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Empty ensembles, single bins, mismatched histograms and bad aspect
    // ratios are rejected.
    fn invalid_inputs_are_rejected() {
        let bins = two_bins();
        let one_bin = SizeBins::new(10.0, 100.0, 1, true).unwrap();

        assert_eq!(SizeStatistics::from_replicas(&bins, &[], 1.0), Err(SizeDistError::NoReplicas));
        assert_eq!(
            SizeStatistics::from_replicas(&one_bin, &[array![1.0]], 1.0),
            Err(SizeDistError::TooFewBins { needed: 2, found: 1 })
        );
        assert!(matches!(
            SizeStatistics::from_replicas(&bins, &[array![1.0, 2.0, 3.0]], 1.0),
            Err(SizeDistError::LengthMismatch { expected: 2, found: 3, .. })
        ));
        assert!(matches!(
            SizeStatistics::from_replicas(&bins, &[array![1.0, 2.0]], 0.0),
            Err(SizeDistError::InvalidParameter { name: "aspect_ratio", .. })
        ));
    }
}
