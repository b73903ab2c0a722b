//! maxent::solver — one Skilling–Bryan iteration as an `argmin` solver.
//!
//! Purpose
//! -------
//! Implement the outer MaxEnt loop body (Skilling & Bryan 1984) so that
//! `argmin`'s `Executor` can drive it: iteration budget, counters, observers
//! and termination bookkeeping come from the executor, while [`MaxEntSB`]
//! owns the numerics of a single step.
//!
//! Key behaviors
//! -------------
//! Each call of `next_iter`:
//! 1. Computes standardized residuals `z`, chi-squared, the chi-squared
//!    gradient `cgrad = G·(−2z/σ)` and the entropy gradient
//!    `sgrad = −ln(f/first_bins) / (blank·e)`.
//! 2. Measures the mismatch `test` between the two gradients (0 on the first
//!    iteration) and builds three search directions `xi` with data-space
//!    images `eta = xi·G`.
//! 3. Projects both functionals onto the directions (`c1`, `s1`, `c2`, `s2`)
//!    and takes the first-order step along `xi[0]` on the first iteration, or
//!    the step chosen by [`choose_step`] afterwards.
//! 4. Updates `f`, resets non-positive bins to `reset_strays · first_bins[i]`,
//!    recomputes `Σf`, entropy and chi-squared, reports progress, and marks
//!    convergence when `|chisq/chizer − 1| < chi_sqr_limit` and
//!    `test < test_limit`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The histogram held in the executor state is strictly positive and
//!   finite after every iteration.
//! - The caller's `I`, `sigma`, `G` and `first_bins` are only read.
//! - An initial histogram that already meets the chi-squared criterion is a
//!   fixed point: the first iteration leaves it unchanged and converges.
//! - After the first iteration, if the entropy gradient vanishes or is
//!   exactly parallel to the chi-squared gradient, the iteration falls back
//!   to the first-order step instead of dividing by zero.
//!
//! Conventions
//! -----------
//! - Failures inside an iteration are [`MaxEntError`] values carried through
//!   `argmin::core::Error` and recovered by the runner.
//! - Progress lines go through `log` only when `report` is set; the monitor
//!   sees every iteration regardless.
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::{
        monitor::{IterationReport, Monitor, log_progress},
        options::MaxEntOptions,
        outcome::CANCELLED,
        problem::SasProblem,
        step::{StepInputs, choose_step},
        types::{Curve, Histogram, SEARCH_DIRECTIONS, Subspace, SubspaceMetric},
    },
};
use argmin::core::{
    ArgminError, Error, IterState, KV, Problem, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin_math::ArgminL2Norm;
use std::{f64::consts::E, ops::ControlFlow};

/// Executor state used by the MaxEnt solver: the histogram is the
/// parameter and chi-squared the cost.
pub type MaxEntState = IterState<Histogram, (), (), (), (), f64>;

/// Skilling–Bryan maximum-entropy solver.
pub struct MaxEntSB<'m> {
    opts: MaxEntOptions,
    blank: f64,
    chizer: f64,
    monitor: Option<&'m mut dyn Monitor>,
    last: Option<IterationReport>,
    converged: bool,
    cancelled: bool,
}

impl<'m> MaxEntSB<'m> {
    /// Solver for `problem` with the given options and optional monitor.
    pub fn new(
        problem: &SasProblem<'_>, opts: MaxEntOptions, monitor: Option<&'m mut dyn Monitor>,
    ) -> Self {
        Self {
            opts,
            blank: problem.blank(),
            chizer: problem.chizer(),
            monitor,
            last: None,
            converged: false,
            cancelled: false,
        }
    }

    /// Report of the most recent iteration, if any ran.
    pub fn last_report(&self) -> Option<&IterationReport> {
        self.last.as_ref()
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    fn iterate(
        &mut self, sas: &SasProblem<'_>, mut f: Histogram, iteration: u64,
    ) -> MaxEntResult<(Histogram, IterationReport)> {
        let opts = self.opts;
        let (blank, chizer) = (self.blank, self.chizer);

        let z = sas.residuals(f.view());
        let chisq = z.mapv(|v| v * v).sum();

        if iteration == 0 && (chisq / chizer - 1.0).abs() < opts.chi_sqr_limit {
            self.converged = true;
            let report = self.report(iteration, &f, 0.0, 0.0, chisq, None);
            return Ok((f, report));
        }
        require_positive("chisq", chisq)?;

        let cgrad = sas.chi_squared_gradient(z.view());
        let sgrad = (&f / &sas.first_bins).mapv(|r| -r.ln() / (blank * E));
        let sqrt_f = f.mapv(f64::sqrt);
        let snorm = (&sqrt_f * &sgrad).l2_norm();
        let cnorm = (&sqrt_f * &cgrad).l2_norm();
        let tnorm = (&f * &sgrad).dot(&cgrad);
        require_positive("cnorm", cnorm)?;

        let (mut a, mut b) = (1.0, 1.0 / cnorm);
        let mut test = 0.0;
        let mut subspace_step = false;
        if iteration > 0 && snorm > 0.0 {
            test = (0.5 * (1.0 - tnorm / (snorm * cnorm))).max(0.0).sqrt();
            if test > 0.0 {
                a = 0.5 / (snorm * test);
                b = 0.5 / (cnorm * test);
                subspace_step = true;
            }
        }

        // search directions and their images
        let sigma_sq = sas.sigma.mapv(|s| s * s);
        let xi0 = &f * &cgrad / cnorm;
        let xi1 = &f * &(&sgrad * a - &cgrad * b);
        let eta0 = sas.opus(xi0.view());
        let eta1 = sas.opus(xi1.view());
        let x2 = sas.tropus((&eta1 / &sigma_sq).view());
        let x2_norm = (&sqrt_f * &x2).l2_norm();
        require_positive("xi[2] norm", x2_norm)?;
        let xi2 = &f * &x2 / x2_norm;
        let eta2 = sas.opus(xi2.view());
        let xi = [xi0, xi1, xi2];
        let eta = [eta0, eta1, eta2];

        let mut c1 = Subspace::zeros();
        let mut s1 = Subspace::zeros();
        let mut c2 = SubspaceMetric::zeros();
        let mut s2 = SubspaceMetric::zeros();
        let inv_f = f.mapv(|v| 1.0 / v);
        let weighted: Vec<Curve> = eta.iter().map(|e| e / &sigma_sq).collect();
        for k in 0..SEARCH_DIRECTIONS {
            c1[k] = xi[k].dot(&cgrad) / chisq;
            s1[k] = xi[k].dot(&sgrad);
            for l in 0..=k {
                let c = 2.0 * eta[k].dot(&weighted[l]) / chisq;
                let s = -(&xi[k] * &xi[l]).dot(&inv_f) / blank;
                c2[(k, l)] = c;
                c2[(l, k)] = c;
                s2[(k, l)] = s;
                s2[(l, k)] = s;
            }
        }
        require_positive("c2[0][0]", c2[(0, 0)])?;

        let f_sum_old = f.sum();
        let (beta, move_step) = if subspace_step {
            let inputs = StepInputs { c1, s1, c2, s2, f_sum: f_sum_old, blank, chisq, chizer };
            let step = choose_step(&inputs, &opts)?;
            (step.beta, Some(step))
        } else {
            (Subspace::new(-0.5 * c1[0] / c2[(0, 0)], 0.0, 0.0), None)
        };

        for k in 0..SEARCH_DIRECTIONS {
            f.scaled_add(beta[k], &xi[k]);
        }
        for (index, (fi, &f0)) in f.iter_mut().zip(sas.first_bins.iter()).enumerate() {
            if !fi.is_finite() {
                return Err(MaxEntError::NonFiniteHistogram { index, value: *fi });
            }
            if *fi <= 0.0 {
                *fi = opts.reset_strays * f0;
            }
        }

        let f_change = f.sum() - f_sum_old;
        let chisq = sas.chi_squared(f.view());
        if (chisq / chizer - 1.0).abs() < opts.chi_sqr_limit && test < opts.test_limit {
            self.converged = true;
        }
        let report = self.report(
            iteration,
            &f,
            test,
            f_change,
            chisq,
            move_step.map(|s| (s.loops, s.blend)),
        );
        Ok((f, report))
    }

    fn report(
        &self, iteration: u64, f: &Histogram, test: f64, f_change: f64, chisq: f64,
        chop: Option<(usize, f64)>,
    ) -> IterationReport {
        let f_sum = f.sum();
        let entropy = f.iter().map(|&v| v / f_sum).map(|p| p * p.ln()).sum();
        IterationReport {
            iteration: iteration as usize + 1,
            iter_max: self.opts.iter_max,
            test,
            entropy,
            f_sum,
            f_change,
            chisq,
            reduced_chisq: chisq / self.chizer,
            move_loops: chop.map(|(loops, _)| loops),
            blend: chop.map(|(_, blend)| blend),
        }
    }

    fn publish(&mut self, report: IterationReport) {
        if self.opts.report {
            log_progress(&report);
        }
        if let Some(monitor) = self.monitor.as_mut() {
            if let ControlFlow::Break(()) = monitor.observe(&report) {
                self.cancelled = true;
            }
        }
        self.last = Some(report);
    }
}

impl<'a, 'm> Solver<SasProblem<'a>, MaxEntState> for MaxEntSB<'m> {
    const NAME: &'static str = "MaxEnt Skilling-Bryan";

    fn init(
        &mut self, problem: &mut Problem<SasProblem<'a>>, state: MaxEntState,
    ) -> Result<(MaxEntState, Option<KV>), Error> {
        let f = state.get_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "MaxEnt solver requires an initial histogram".to_string(),
        })?;
        let chisq = problem.cost(f)?;
        self.converged = false;
        self.cancelled = false;
        self.last = None;
        Ok((state.cost(chisq), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<SasProblem<'a>>, mut state: MaxEntState,
    ) -> Result<(MaxEntState, Option<KV>), Error> {
        let iteration = state.get_iter();
        let f = state.take_param().ok_or_else(|| ArgminError::NotInitialized {
            text: "MaxEnt solver lost its histogram".to_string(),
        })?;
        let (f, report) = problem
            .problem("iteration_count", |sas| self.iterate(sas, f, iteration).map_err(Error::from))?;
        let chisq = report.chisq;
        self.publish(report);
        Ok((state.param(f).cost(chisq), None))
    }

    fn terminate(&mut self, _state: &MaxEntState) -> TerminationStatus {
        if self.converged {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else if self.cancelled {
            TerminationStatus::Terminated(TerminationReason::SolverExit(CANCELLED.to_string()))
        } else {
            TerminationStatus::NotTerminated
        }
    }
}

// ---- Helper Methods ----

/// Guard a normalizing quantity before dividing by it.
fn require_positive(quantity: &'static str, value: f64) -> MaxEntResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(MaxEntError::DegenerateStep { quantity, value })
    }
}
