//! PyO3 helpers that turn Python array-likes into borrowed numpy arrays.
//!
//! Contiguous float64 numpy arrays are borrowed without copying; pandas
//! objects go through `to_numpy(copy=False)`; anything else is extracted as
//! a (nested) sequence of floats and copied once.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec / Array2 → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

/// Borrow a 1-D float64 array-like.
///
/// # Errors
/// `TypeError` if the object is not a 1-D numpy array, pandas Series or
/// float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Borrow a 2-D float64 array-like such as the kernel `G`.
///
/// Non-contiguous arrays are accepted as is; `as_array` handles strides.
///
/// # Errors
/// - `TypeError` if the object is neither a 2-D numpy array, a DataFrame nor
///   a sequence of float sequences.
/// - `ValueError` if the rows of a nested sequence differ in length.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array2<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr_ro);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame_ro);
        }
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 2-D numpy.ndarray, pandas.DataFrame, or nested sequence of float64",
        )
    })?;
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(PyValueError::new_err("all kernel rows must have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let array = Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(array.into_pyarray(py).readonly())
}
