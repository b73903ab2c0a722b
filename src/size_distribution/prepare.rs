//! Background subtraction and Q-range trimming ahead of a fit.
//!
//! [`prepare`] turns raw `(q, I, dy)` data into the intensities handed to
//! [`quick_fit`](crate::size_distribution::quick_fit) or
//! [`full_fit`](crate::size_distribution::full_fit):
//!
//! 1. subtract the background curve from `I`,
//! 2. add the background's uncertainties to `dy`,
//! 3. keep the points of the Q window `[qmin, qmax)`.
//!
//! The background is any curve on `q`, typically
//! [`PowerLawFit::evaluate`](crate::size_distribution::PowerLawFit::evaluate)
//! plus a flat level. The kernel must be built on the trimmed `q`.
use crate::size_distribution::{
    background::q_range_indices,
    errors::{SizeDistError, SizeDistResult},
    validation::{verify_non_empty, verify_same_length},
};
use ndarray::{Array1, ArrayView1, s};
use std::ops::Range;

/// Data ready for a MaxEnt fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub q: Array1<f64>,
    pub intensity: Array1<f64>,
    /// `None` when the raw data carried no uncertainties.
    pub dy: Option<Array1<f64>>,
    /// Indices of the kept points in the raw data.
    pub range: Range<usize>,
}

/// Subtract `background` from the data and trim it to `[qmin, qmax)`.
///
/// Parameters
/// ----------
/// - `q`: ascending scattering vectors.
/// - `intensity`, `dy`: measured intensity and optional uncertainties.
/// - `background`, `background_dy`: optional curve to subtract and its
///   uncertainties, which add to `dy` when both are present.
/// - `qmin`, `qmax`: fit window.
///
/// Errors
/// ------
/// - `EmptyInput` for empty `q`.
/// - `LengthMismatch` if any vector differs in length from `q`.
/// - `InvalidQRange` unless `qmin < qmax`.
/// - `TooFewPoints` if no point falls inside the window.
pub fn prepare(
    q: ArrayView1<'_, f64>, intensity: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>,
    background: Option<ArrayView1<'_, f64>>, background_dy: Option<ArrayView1<'_, f64>>,
    qmin: f64, qmax: f64,
) -> SizeDistResult<PreparedData> {
    verify_non_empty("q", q.len())?;
    verify_same_length("intensity", q.len(), intensity.len())?;
    for (name, len) in [
        ("dy", dy.map(|v| v.len())),
        ("background", background.map(|v| v.len())),
        ("background_dy", background_dy.map(|v| v.len())),
    ] {
        if let Some(len) = len {
            verify_same_length(name, q.len(), len)?;
        }
    }
    if !(qmin < qmax) {
        return Err(SizeDistError::InvalidQRange { qmin, qmax });
    }
    let range = q_range_indices(q, qmin, qmax);
    if range.is_empty() {
        return Err(SizeDistError::TooFewPoints { needed: 1, found: 0 });
    }

    let (lo, hi) = (range.start, range.end);
    let mut subtracted = intensity.slice(s![lo..hi]).to_owned();
    if let Some(background) = background {
        subtracted -= &background.slice(s![lo..hi]);
    }
    let dy = dy.map(|dy| {
        let mut total = dy.slice(s![lo..hi]).to_owned();
        if let Some(extra) = background_dy {
            total += &extra.slice(s![lo..hi]);
        }
        total
    });

    Ok(PreparedData { q: q.slice(s![lo..hi]).to_owned(), intensity: subtracted, dy, range })
}
