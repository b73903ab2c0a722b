//! maxent::options — validated run configuration for the MaxEnt solver.
//!
//! Purpose
//! -------
//! Bundle the tolerances and limits of the Skilling–Bryan iteration into one
//! immutable value passed into every solve, so each run's tolerances can be
//! set and tested independently and no process-wide state is involved.
//!
//! Key behaviors
//! -------------
//! - [`MaxEntOptions::default`] reproduces the classic constants
//!   (`TEST_LIMIT = 0.05`, `CHI_SQR_LIMIT = 0.01`, `RESET_STRAYS = 1`,
//!   `DISTANCE_LIMIT_FACTOR = 0.1`, `MAX_MOVE_LOOPS = 5000`,
//!   `MOVE_PASSES = 1e-3`, `IterMax = 5000`).
//! - [`MaxEntOptions::new`] validates every field; builder-style setters
//!   re-validate the field they touch.
//!
//! Invariants & assumptions
//! ------------------------
//! - All tolerances and factors are finite and strictly positive.
//! - `iter_max > 0` and `max_move_loops > 0`.
//! - `reset_strays > 0`, so a reset bin stays strictly positive.
//!
//! Conventions
//! -----------
//! - The number of search directions is not configurable; it is fixed at
//!   [`SEARCH_DIRECTIONS`](super::types::SEARCH_DIRECTIONS) by the types.
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::validation::verify_positive,
};

pub const DEFAULT_TEST_LIMIT: f64 = 0.05;
pub const DEFAULT_CHI_SQR_LIMIT: f64 = 0.01;
pub const DEFAULT_RESET_STRAYS: f64 = 1.0;
pub const DEFAULT_DISTANCE_LIMIT_FACTOR: f64 = 0.1;
pub const DEFAULT_MAX_MOVE_LOOPS: usize = 5000;
pub const DEFAULT_MOVE_PASSES: f64 = 1e-3;
pub const DEFAULT_ITER_MAX: usize = 5000;

/// Run configuration for [`solve`](super::api::solve).
///
/// Fields:
/// - `test_limit`: convergence threshold on the gradient-mismatch `test`.
/// - `chi_sqr_limit`: allowed `|chisq/chizer − 1|` at convergence.
/// - `reset_strays`: multiple of `first_bins[i]` written into a bin that
///   turned non-positive.
/// - `distance_limit_factor`: cap on a step's entropy-metric distance,
///   relative to `Σf / blank`.
/// - `max_move_loops`: bisection budget of the alpha chop.
/// - `move_passes`: alpha-chop tolerance on the predicted chi-squared ratio.
/// - `iter_max`: outer iteration budget.
/// - `report`: emit per-iteration progress through `log`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxEntOptions {
    pub test_limit: f64,
    pub chi_sqr_limit: f64,
    pub reset_strays: f64,
    pub distance_limit_factor: f64,
    pub max_move_loops: usize,
    pub move_passes: f64,
    pub iter_max: usize,
    pub report: bool,
}

impl MaxEntOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`MaxEntError::InvalidTolerance`] if any floating-point field is
    ///   non-finite or ≤ 0.
    /// - [`MaxEntError::InvalidMaxIter`] if `iter_max == 0`.
    /// - [`MaxEntError::InvalidMoveLoops`] if `max_move_loops == 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        test_limit: f64, chi_sqr_limit: f64, reset_strays: f64, distance_limit_factor: f64,
        max_move_loops: usize, move_passes: f64, iter_max: usize, report: bool,
    ) -> MaxEntResult<Self> {
        let opts = Self {
            test_limit,
            chi_sqr_limit,
            reset_strays,
            distance_limit_factor,
            max_move_loops,
            move_passes,
            iter_max,
            report,
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Re-check every field. Useful after mutating the public fields directly.
    pub fn validate(&self) -> MaxEntResult<()> {
        verify_positive("test_limit", self.test_limit)?;
        verify_positive("chi_sqr_limit", self.chi_sqr_limit)?;
        verify_positive("reset_strays", self.reset_strays)?;
        verify_positive("distance_limit_factor", self.distance_limit_factor)?;
        verify_positive("move_passes", self.move_passes)?;
        if self.iter_max == 0 {
            return Err(MaxEntError::InvalidMaxIter {
                max_iter: self.iter_max,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if self.max_move_loops == 0 {
            return Err(MaxEntError::InvalidMoveLoops {
                loops: self.max_move_loops,
                reason: "Alpha-chop loop limit must be greater than zero.",
            });
        }
        Ok(())
    }

    /// Copy of `self` with a different outer iteration budget.
    pub fn with_iter_max(self, iter_max: usize) -> MaxEntResult<Self> {
        let opts = Self { iter_max, ..self };
        opts.validate()?;
        Ok(opts)
    }

    /// Copy of `self` with progress reporting switched on or off.
    pub fn with_report(self, report: bool) -> Self {
        Self { report, ..self }
    }
}

impl Default for MaxEntOptions {
    fn default() -> Self {
        Self {
            test_limit: DEFAULT_TEST_LIMIT,
            chi_sqr_limit: DEFAULT_CHI_SQR_LIMIT,
            reset_strays: DEFAULT_RESET_STRAYS,
            distance_limit_factor: DEFAULT_DISTANCE_LIMIT_FACTOR,
            max_move_loops: DEFAULT_MAX_MOVE_LOOPS,
            move_passes: DEFAULT_MOVE_PASSES,
            iter_max: DEFAULT_ITER_MAX,
            report: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The documented defaults.
    // - Rejection of zero budgets and non-positive tolerances by `new` and the
    //   builder-style setters.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Defaults match the classic Skilling–Bryan constants and validate.
    fn default_matches_documented_constants() {
        let opts = MaxEntOptions::default();

        assert_eq!(opts.test_limit, 0.05);
        assert_eq!(opts.chi_sqr_limit, 0.01);
        assert_eq!(opts.reset_strays, 1.0);
        assert_eq!(opts.distance_limit_factor, 0.1);
        assert_eq!(opts.max_move_loops, 5000);
        assert_eq!(opts.move_passes, 1e-3);
        assert_eq!(opts.iter_max, 5000);
        assert!(opts.report);
        assert!(opts.validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Zero budgets and non-positive tolerances are rejected with the field
    // named in the error.
    fn new_rejects_invalid_fields() {
        assert!(matches!(
            MaxEntOptions::new(0.05, 0.01, 1.0, 0.1, 5000, 1e-3, 0, false),
            Err(MaxEntError::InvalidMaxIter { max_iter: 0, .. })
        ));
        assert!(matches!(
            MaxEntOptions::new(0.05, 0.01, 1.0, 0.1, 0, 1e-3, 10, false),
            Err(MaxEntError::InvalidMoveLoops { loops: 0, .. })
        ));
        assert!(matches!(
            MaxEntOptions::new(0.05, 0.01, 0.0, 0.1, 5000, 1e-3, 10, false),
            Err(MaxEntError::InvalidTolerance { name: "reset_strays", .. })
        ));
        assert!(matches!(
            MaxEntOptions::new(f64::NAN, 0.01, 1.0, 0.1, 5000, 1e-3, 10, false),
            Err(MaxEntError::InvalidTolerance { name: "test_limit", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Setters keep the other fields and re-validate the touched one.
    fn setters_preserve_other_fields() {
        let opts = MaxEntOptions::default().with_report(false).with_iter_max(42).unwrap();

        assert_eq!(opts.iter_max, 42);
        assert!(!opts.report);
        assert_eq!(opts.test_limit, DEFAULT_TEST_LIMIT);
        assert!(MaxEntOptions::default().with_iter_max(0).is_err());
    }
}
