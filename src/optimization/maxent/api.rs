//! High-level entry points for one maximum-entropy inversion.
//!
//! Both functions validate the inputs into a [`SasProblem`] before the first
//! iteration and delegate the run, including the option checks, to
//! [`run_maxent`].
use crate::optimization::{
    errors::MaxEntResult,
    maxent::{
        monitor::Monitor, options::MaxEntOptions, outcome::MaxEntOutcome, problem::SasProblem,
        run::run_maxent,
    },
};
use ndarray::{ArrayView1, ArrayView2};

/// Recover a size distribution from scattering data by Skilling–Bryan
/// maximum entropy.
///
/// Parameters
/// ----------
/// - `intensity`: `ArrayView1<f64>`
///   Background-subtracted `I(Q)`, length `npt`.
/// - `sigma`: `ArrayView1<f64>`
///   Per-point normalization, length `npt`, strictly positive.
/// - `kernel`: `ArrayView2<f64>`
///   `G` with shape `(n_bins, npt)`; the model curve of histogram `f` is
///   `f·G`.
/// - `first_bins`: `ArrayView1<f64>`
///   Initial histogram and entropy prior, length `n_bins`, strictly positive.
/// - `opts`: `&MaxEntOptions`
///   Tolerances, iteration budget and `report` switch.
///
/// Returns
/// -------
/// `MaxEntResult<MaxEntOutcome>`
///   Final `chisq/npt`, histogram, fit curve, convergence flag and iteration
///   count. Running out of iterations is a normal outcome with
///   `converged == false`.
///
/// Errors
/// ------
/// - Precondition errors for empty, mismatched, non-finite or non-positive
///   inputs, raised before any iteration.
/// - `NotPositiveDefinite`, `AlphaChopNoConvergence`, `DegenerateStep` or
///   `NonFiniteHistogram` if an iteration breaks down.
///
/// Notes
/// -----
/// - None of the inputs is modified; the solver works on its own copy of
///   `first_bins`.
/// - Independent calls share no state and can run on separate threads.
pub fn solve(
    intensity: ArrayView1<'_, f64>, sigma: ArrayView1<'_, f64>, kernel: ArrayView2<'_, f64>,
    first_bins: ArrayView1<'_, f64>, opts: &MaxEntOptions,
) -> MaxEntResult<MaxEntOutcome> {
    let problem =
        SasProblem::new(intensity.view(), sigma.view(), kernel.view(), first_bins.view())?;
    run_maxent(problem, opts, None)
}

/// [`solve`] with a [`Monitor`] called after every iteration.
///
/// A monitor returning `ControlFlow::Break(())` stops the run after the
/// current iteration; the outcome then has `converged == false` and status
/// `"cancelled"`.
///
/// # Errors
/// Same as [`solve`].
pub fn solve_monitored(
    intensity: ArrayView1<'_, f64>, sigma: ArrayView1<'_, f64>, kernel: ArrayView2<'_, f64>,
    first_bins: ArrayView1<'_, f64>, opts: &MaxEntOptions, monitor: &mut dyn Monitor,
) -> MaxEntResult<MaxEntOutcome> {
    let problem =
        SasProblem::new(intensity.view(), sigma.view(), kernel.view(), first_bins.view())?;
    run_maxent(problem, opts, Some(monitor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::maxent::monitor::IterationReport;
    use ndarray::{Array1, array};
    use std::ops::ControlFlow;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Entry points called with views borrowed from unrelated owners, as
    // callers holding data, kernel and prior in separate places do.
    // -------------------------------------------------------------------------

    struct Measurement {
        intensity: Array1<f64>,
        sigma: Array1<f64>,
    }

    fn fit_prior<'k>(
        data: &Measurement, kernel: ArrayView2<'k, f64>, prior: ArrayView1<'_, f64>,
    ) -> MaxEntResult<MaxEntOutcome> {
        let opts = MaxEntOptions::default().with_report(false);
        solve(data.intensity.view(), data.sigma.view(), kernel, prior, &opts)
    }

    #[test]
    // Purpose
    // -------
    // `solve` accepts views whose lifetimes are unrelated to each other.
    //
    // Given
    // -----
    // - Toy 3×4 kernel, `I = (1, 3, 1)·G`, `sigma = 0.05·I`, flat prior.
    //
    // Expect
    // ------
    // - The run converges and the fit is `f·G`.
    fn solve_borrows_independent_views() {
        let g = array![[1.0, 0.8, 0.5, 0.2], [0.5, 1.0, 0.8, 0.5], [0.2, 0.5, 0.8, 1.0]];
        let intensity = array![1.0, 3.0, 1.0].dot(&g);
        let data = Measurement { sigma: intensity.mapv(|v| 0.05 * v), intensity };
        let outcome = {
            let prior = Array1::<f64>::ones(3);
            fit_prior(&data, g.view(), prior.view()).unwrap()
        };

        assert!(outcome.converged);
        assert_eq!(outcome.fit, outcome.distribution.dot(&g));
    }

    #[test]
    // Purpose
    // -------
    // `solve_monitored` reaches the monitor once per executed iteration.
    fn solve_monitored_sees_every_iteration() {
        let g = array![[1.0, 0.8, 0.5, 0.2], [0.5, 1.0, 0.8, 0.5], [0.2, 0.5, 0.8, 1.0]];
        let intensity = array![1.0, 3.0, 1.0].dot(&g);
        let sigma = intensity.mapv(|v| 0.05 * v);
        let prior = Array1::<f64>::ones(3);
        let opts = MaxEntOptions::default().with_report(false);
        let mut calls = 0usize;
        let mut count = |_: &IterationReport| {
            calls += 1;
            ControlFlow::Continue(())
        };

        let outcome = solve_monitored(
            intensity.view(),
            sigma.view(),
            g.view(),
            prior.view(),
            &opts,
            &mut count,
        )
        .unwrap();

        assert_eq!(calls, outcome.iterations);
    }
}
