//! Result of one MaxEnt solve.
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::types::{Curve, FnEvalMap, Histogram},
};
use argmin::core::{TerminationReason, TerminationStatus};

/// Status string used when a monitor stopped the run.
pub const CANCELLED: &str = "cancelled";

/// Final state of a solve, converged or not.
///
/// Fields
/// ------
/// - `reduced_chisq`: `chisq / npt` at the last iteration.
/// - `distribution`: final histogram `f`, strictly positive.
/// - `fit`: model curve `f·G`.
/// - `converged`: both chi-squared and gradient-mismatch criteria held.
/// - `iterations`: iterations actually executed (1-based count).
/// - `status`: `"converged"`, `"exhausted"`, `"cancelled"`, or argmin's
///   description of any other termination.
/// - `test`, `entropy`: convergence metric and entropy at the last iteration.
/// - `fn_evals`: executor counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxEntOutcome {
    pub reduced_chisq: f64,
    pub distribution: Histogram,
    pub fit: Curve,
    pub converged: bool,
    pub iterations: usize,
    pub status: String,
    pub test: f64,
    pub entropy: f64,
    pub fn_evals: FnEvalMap,
}

impl MaxEntOutcome {
    /// Assemble an outcome from the executor's final state.
    ///
    /// # Errors
    /// - [`MaxEntError::NotInitialized`] if the executor returned no
    ///   histogram.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        distribution: Option<Histogram>, fit: Curve, reduced_chisq: f64,
        termination: &TerminationStatus, iterations: u64, test: f64, entropy: f64,
        fn_evals: FnEvalMap,
    ) -> MaxEntResult<Self> {
        let distribution = distribution.ok_or_else(|| MaxEntError::NotInitialized {
            text: "executor returned no histogram".to_string(),
        })?;
        let (converged, status) = classify(termination);
        Ok(Self {
            reduced_chisq,
            distribution,
            fit,
            converged,
            iterations: iterations as usize,
            status,
            test,
            entropy,
            fn_evals,
        })
    }

    /// The classic five-value result: `(chisq/chizer, f, f·G, converged,
    /// iterations)`.
    pub fn into_tuple(self) -> (f64, Histogram, Curve, bool, usize) {
        (self.reduced_chisq, self.distribution, self.fit, self.converged, self.iterations)
    }
}

fn classify(termination: &TerminationStatus) -> (bool, String) {
    match termination {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
            (true, "converged".to_string())
        }
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            (false, "exhausted".to_string())
        }
        TerminationStatus::Terminated(TerminationReason::SolverExit(reason)) => {
            (false, reason.clone())
        }
        TerminationStatus::Terminated(other) => (false, format!("{other:?}")),
        TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Only `SolverConverged` counts as converged; exhaustion and
    // cancellation are normal non-converged outcomes.
    fn termination_reasons_map_to_converged_flag() {
        let converged = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let exhausted = TerminationStatus::Terminated(TerminationReason::MaxItersReached);
        let cancelled =
            TerminationStatus::Terminated(TerminationReason::SolverExit(CANCELLED.to_string()));

        assert_eq!(classify(&converged), (true, "converged".to_string()));
        assert_eq!(classify(&exhausted), (false, "exhausted".to_string()));
        assert_eq!(classify(&cancelled), (false, "cancelled".to_string()));
    }

    #[test]
    // Purpose
    // -------
    // A missing histogram is reported instead of panicking, and the tuple
    // form keeps the field order.
    fn new_requires_histogram() {
        let status = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let missing = MaxEntOutcome::new(
            None,
            array![1.0],
            1.0,
            &status,
            3,
            0.0,
            0.0,
            FnEvalMap::new(),
        );
        assert!(matches!(missing, Err(MaxEntError::NotInitialized { .. })));

        let out = MaxEntOutcome::new(
            Some(array![2.0, 3.0]),
            array![1.0],
            1.004,
            &status,
            3,
            0.01,
            -0.2,
            FnEvalMap::new(),
        )
        .unwrap();
        let (chi, f, fit, converged, iterations) = out.into_tuple();
        assert_eq!(chi, 1.004);
        assert_eq!(f, array![2.0, 3.0]);
        assert_eq!(fit, array![1.0]);
        assert!(converged);
        assert_eq!(iterations, 3);
    }
}
