//! Size-bin layout for the MaxEnt histogram.
//!
//! Bins are specified by diameter bounds and stored as radii: `n + 1` edges
//! spaced logarithmically or linearly between `diam_min / 2` and
//! `diam_max / 2`, with bin centers at the edge midpoints.
use crate::size_distribution::errors::{SizeDistError, SizeDistResult};
use ndarray::{Array1, s};

#[derive(Debug, Clone, PartialEq)]
pub struct SizeBins {
    edges: Array1<f64>,
    centers: Array1<f64>,
    widths: Array1<f64>,
    log_spaced: bool,
}

impl SizeBins {
    /// Lay out `n_bins` bins between two diameters.
    ///
    /// # Errors
    /// - [`SizeDistError::NoBins`] if `n_bins == 0`.
    /// - [`SizeDistError::InvalidDiameterRange`] unless `0 < diam_min <
    ///   diam_max` and both are finite.
    pub fn new(
        diam_min: f64, diam_max: f64, n_bins: usize, log_spaced: bool,
    ) -> SizeDistResult<Self> {
        if n_bins == 0 {
            return Err(SizeDistError::NoBins);
        }
        if !(diam_min.is_finite() && diam_max.is_finite() && diam_min > 0.0 && diam_min < diam_max)
        {
            return Err(SizeDistError::InvalidDiameterRange { diam_min, diam_max });
        }

        let edges = if log_spaced {
            Array1::logspace(10.0, diam_min.log10(), diam_max.log10(), n_bins + 1)
        } else {
            Array1::linspace(diam_min, diam_max, n_bins + 1)
        }
        .mapv_into(|d| d / 2.0);
        let widths = &edges.slice(s![1..]) - &edges.slice(s![..-1]);
        let centers = &edges.slice(s![..-1]) + &(&widths / 2.0);
        Ok(Self { edges, centers, widths, log_spaced })
    }

    pub fn n_bins(&self) -> usize {
        self.centers.len()
    }

    /// Bin edges as radii, length `n_bins + 1`.
    pub fn edges(&self) -> &Array1<f64> {
        &self.edges
    }

    /// Bin centers as radii.
    pub fn centers(&self) -> &Array1<f64> {
        &self.centers
    }

    /// Bin widths as radii.
    pub fn widths(&self) -> &Array1<f64> {
        &self.widths
    }

    /// Bin centers as diameters.
    pub fn diameters(&self) -> Array1<f64> {
        self.centers.mapv(|r| 2.0 * r)
    }

    pub fn is_log_spaced(&self) -> bool {
        self.log_spaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Edge spacing, center/width consistency, and bound validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Log-spaced edges have a constant ratio and span the radii of the
    // diameter bounds.
    //
    // Given
    // -----
    // - Diameters 10 to 1000 over 2 bins.
    //
    // Expect
    // ------
    // - Edges (5, 50, 500); centers (27.5, 275); widths (45, 450).
    fn log_bins_span_radius_range() {
        let bins = SizeBins::new(10.0, 1000.0, 2, true).unwrap();

        assert_eq!(bins.n_bins(), 2);
        let expected_edges = [5.0, 50.0, 500.0];
        for (e, x) in bins.edges().iter().zip(expected_edges) {
            assert_relative_eq!(*e, x, max_relative = 1e-12);
        }
        assert_relative_eq!(bins.centers()[0], 27.5, max_relative = 1e-12);
        assert_relative_eq!(bins.centers()[1], 275.0, max_relative = 1e-12);
        assert_relative_eq!(bins.widths()[1], 450.0, max_relative = 1e-12);
        assert_relative_eq!(bins.diameters()[0], 55.0, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Linear bins have equal widths that add up to the radius span.
    fn linear_bins_have_equal_widths() {
        let bins = SizeBins::new(10.0, 110.0, 4, false).unwrap();

        for w in bins.widths() {
            assert_relative_eq!(*w, 12.5, epsilon = 1e-12);
        }
        assert_relative_eq!(bins.widths().sum(), 50.0, epsilon = 1e-12);
        assert_relative_eq!(bins.centers()[0], 11.25, epsilon = 1e-12);
        assert!(!bins.is_log_spaced());
    }

    #[test]
    // Purpose
    // -------
    // Zero bins and inverted or non-positive bounds are rejected.
    fn invalid_layouts_are_rejected() {
        assert_eq!(SizeBins::new(10.0, 100.0, 0, true), Err(SizeDistError::NoBins));
        assert!(matches!(
            SizeBins::new(100.0, 10.0, 5, true),
            Err(SizeDistError::InvalidDiameterRange { .. })
        ));
        assert!(matches!(
            SizeBins::new(0.0, 10.0, 5, false),
            Err(SizeDistError::InvalidDiameterRange { .. })
        ));
    }
}
