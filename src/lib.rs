//! sas_maxent — maximum-entropy size distributions from small-angle
//! scattering data, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the MaxEnt solver to Python via the `_sas_maxent` extension
//! module. The heavy lifting is the Skilling–Bryan inversion in
//! [`optimization::maxent`]; [`size_distribution`] wraps it into the
//! workflow of a size-distribution analysis.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`optimization`, `size_distribution`)
//!   as the public crate surface.
//! - Define the `#[pymodule]` initializer for `_sas_maxent` and register its
//!   `maxent` and `size_distribution` submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner Rust modules; this file only
//!   converts arrays, dispatches, and maps errors.
//! - Python inputs are borrowed read-only; no solver mutates caller arrays.
//!
//! Conventions
//! -----------
//! - The kernel `G` has shape `(n_bins, npt)`; the model curve of `f` is
//!   `f·G`.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.
//!
//! Downstream usage
//! ----------------
//! - Rust code calls [`optimization::maxent::solve`] or the
//!   [`size_distribution`] fits directly and can ignore the PyO3 items
//!   guarded by the `python-bindings` feature.
//! - Python code imports `_sas_maxent.maxent.maxent_sb`, which mirrors the
//!   classic `(chisq, f, fit, converged, iterations)` return tuple.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/integration_maxent_pipeline.rs`
//!   runs the solver and the size-distribution pipeline end to end.

pub mod optimization;
pub mod size_distribution;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::maxent::{MaxEntOptions, solve},
    size_distribution::bins::SizeBins,
    utils::{extract_f64_array, extract_f64_array2},
};

/// Python-facing tuple of one MaxEnt solve:
/// `(reduced_chisq, f, fit, converged, iterations)`.
#[cfg(feature = "python-bindings")]
type PyMaxEntTuple<'py> = (f64, Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, bool, usize);

/// maxent_sb — one Skilling–Bryan MaxEnt inversion.
///
/// Parameters
/// ----------
/// - `iq`: 1-D array-like, background-subtracted intensity, length `npt`.
/// - `sigma`: 1-D array-like, per-point normalization, length `npt`.
/// - `g`: 2-D array-like, kernel of shape `(n_bins, npt)`.
/// - `first_bins`: 1-D array-like, initial histogram and entropy prior.
/// - `iter_max`: outer iteration budget (default 5000).
/// - `report`: log per-iteration progress (default `True`).
///
/// Returns
/// -------
/// `(reduced_chisq, f, fit, converged, iterations)`; running out of
/// iterations returns `converged = False` rather than raising.
///
/// Errors
/// ------
/// - `ValueError` for invalid inputs or a numerical breakdown of the solve.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (iq, sigma, g, first_bins, iter_max = 5000, report = true))]
fn maxent_sb<'py>(
    py: Python<'py>, iq: &Bound<'py, PyAny>, sigma: &Bound<'py, PyAny>, g: &Bound<'py, PyAny>,
    first_bins: &Bound<'py, PyAny>, iter_max: usize, report: bool,
) -> PyResult<PyMaxEntTuple<'py>> {
    let iq = extract_f64_array(py, iq)?;
    let sigma = extract_f64_array(py, sigma)?;
    let g = extract_f64_array2(py, g)?;
    let first_bins = extract_f64_array(py, first_bins)?;
    let opts = MaxEntOptions::default().with_iter_max(iter_max)?.with_report(report);

    let outcome =
        solve(iq.as_array(), sigma.as_array(), g.as_array(), first_bins.as_array(), &opts)?;
    let (chisq, f, fit, converged, iterations) = outcome.into_tuple();
    Ok((chisq, f.into_pyarray(py), fit.into_pyarray(py), converged, iterations))
}

/// size_bins — radius edges, centers and widths for `n_bins` size bins.
///
/// Diameters `diam_min`/`diam_max` are halved into radii; `log_spaced`
/// selects logarithmic (default) or linear edge spacing.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (diam_min, diam_max, n_bins, log_spaced = true))]
fn size_bins<'py>(
    py: Python<'py>, diam_min: f64, diam_max: f64, n_bins: usize, log_spaced: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)>
{
    let bins = SizeBins::new(diam_min, diam_max, n_bins, log_spaced)?;
    Ok((
        bins.edges().clone().into_pyarray(py),
        bins.centers().clone().into_pyarray(py),
        bins.widths().clone().into_pyarray(py),
    ))
}

/// _sas_maxent — PyO3 module initializer for the Python extension.
///
/// Creates the `maxent` and `size_distribution` submodules, attaches them to
/// `_sas_maxent` and registers them in `sys.modules` so dotted imports work.
///
/// Errors
/// ------
/// - `PyErr` if creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _sas_maxent<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let maxent_mod = PyModule::new(_py, "maxent")?;
    let size_distribution_mod = PyModule::new(_py, "size_distribution")?;
    maxent_module(_py, m, &maxent_mod)?;
    size_distribution_module(_py, m, &size_distribution_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("sas_maxent.maxent", maxent_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("sas_maxent.size_distribution", size_distribution_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn maxent_module<'py>(
    _py: Python, sas_maxent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(maxent_sb, m)?)?;
    sas_maxent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn size_distribution_module<'py>(
    _py: Python, sas_maxent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(size_bins, m)?)?;
    sas_maxent.add_submodule(m)?;
    Ok(())
}
