//! Per-iteration progress reporting and cancellation.
//!
//! After every iteration the solver builds an [`IterationReport`] and hands
//! it to a [`Monitor`]. Returning [`ControlFlow::Break`] stops the run at
//! that checkpoint; the solve then returns normally with `converged =
//! false` and status `"cancelled"`.
//!
//! Closures `FnMut(&IterationReport) -> ControlFlow<()>` are monitors, so
//! callers can pass an atomic-flag check or a progress bar update inline.
use std::ops::ControlFlow;

/// Snapshot of the solver after one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: usize,
    pub iter_max: usize,
    /// Gradient-mismatch metric (0 on the first iteration).
    pub test: f64,
    /// Normalized entropy `Σ p ln p` with `p = f / Σf` (never positive).
    pub entropy: f64,
    pub f_sum: f64,
    /// `Σ(f_new − f_old)`.
    pub f_change: f64,
    pub chisq: f64,
    /// `chisq / npt`.
    pub reduced_chisq: f64,
    /// Alpha-chop loop count, when the step chooser ran.
    pub move_loops: Option<usize>,
    /// Final blend parameter, when the step chooser ran.
    pub blend: Option<f64>,
}

impl IterationReport {
    /// Percent change of `Σf` over the iteration.
    pub fn percent_change(&self) -> f64 {
        100.0 * self.f_change / self.f_sum
    }
}

pub trait Monitor {
    fn observe(&mut self, report: &IterationReport) -> ControlFlow<()>;
}

impl<F> Monitor for F
where
    F: FnMut(&IterationReport) -> ControlFlow<()>,
{
    fn observe(&mut self, report: &IterationReport) -> ControlFlow<()> {
        self(report)
    }
}

/// Monitor that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMonitor;

impl Monitor for NoMonitor {
    fn observe(&mut self, _report: &IterationReport) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Emit one progress line through `log`.
pub fn log_progress(report: &IterationReport) {
    log::info!(
        "{:>4}/{}: test {:.4}%  S {:.6}  sum(f) {:.6e}  change {:+.4}%  chisq/chizer {:.6}",
        report.iteration,
        report.iter_max,
        100.0 * report.test,
        report.entropy,
        report.f_sum,
        report.percent_change(),
        report.reduced_chisq,
    );
}

/// Emit the closing line of a reported run.
pub fn log_summary(converged: bool, iterations: usize, reduced_chisq: f64) {
    if converged {
        log::info!(
            "convergence achieved after {iterations} iterations, chisq/chizer = {reduced_chisq:.6}"
        );
    } else {
        log::warn!(
            "no convergence after {iterations} iterations (chisq/chizer = {reduced_chisq:.6}); \
             try increasing the error multiplier"
        );
    }
}
