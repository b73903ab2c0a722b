//! Execution helper that runs [`MaxEntSB`] on an `argmin` executor and
//! returns a [`MaxEntOutcome`].
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::{
        monitor::{Monitor, log_summary},
        options::MaxEntOptions,
        outcome::MaxEntOutcome,
        problem::SasProblem,
        solver::MaxEntSB,
    },
};
use argmin::core::{Executor, State};

/// Run the MaxEnt iteration for `problem` starting from its `first_bins`.
///
/// Wires up:
/// - the problem and a fresh [`MaxEntSB`] solver,
/// - the initial histogram, an owned copy of `first_bins`,
/// - `max_iters = opts.iter_max`,
/// - with the `obs_slog` feature and `opts.report`, argmin's terminal slog
///   observer in `ObserverMode::Always`.
///
/// # Returns
/// A [`MaxEntOutcome`] built from the last iteration: final histogram, its
/// model curve, `chisq/npt`, termination status and iteration count.
///
/// # Errors
/// - Any error of [`MaxEntOptions::validate`], before the executor starts.
/// - Any [`MaxEntError`] raised inside an iteration (linear solver, alpha
///   chop, degenerate normalizers), recovered from the executor's error.
/// - [`MaxEntError::NotInitialized`] if the executor returned no state.
pub fn run_maxent(
    problem: SasProblem<'_>, opts: &MaxEntOptions, monitor: Option<&mut dyn Monitor>,
) -> MaxEntResult<MaxEntOutcome> {
    opts.validate()?;
    let f0 = problem.first_bins.to_owned();
    let solver = MaxEntSB::new(&problem, *opts, monitor);

    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.param(f0).max_iters(opts.iter_max as u64));
    #[cfg(feature = "obs_slog")]
    if opts.report {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let result = executor.run()?;
    let report = result.solver().last_report().copied().ok_or_else(|| {
        MaxEntError::NotInitialized { text: "no MaxEnt iteration was executed".to_string() }
    })?;
    let mut state = result.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let distribution = state.take_param();
    let fit = distribution.as_ref().map(|f| problem.model_curve(f.view())).unwrap_or_default();

    let outcome = MaxEntOutcome::new(
        distribution,
        fit,
        report.reduced_chisq,
        &termination,
        iterations,
        report.test,
        report.entropy,
        fn_evals,
    )?;
    if opts.report {
        log_summary(outcome.converged, outcome.iterations, outcome.reduced_chisq);
    }
    Ok(outcome)
}
