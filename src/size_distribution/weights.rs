//! Per-point weighting of the MaxEnt residuals.
//!
//! The MaxEnt `sigma` vector is `weight_factor · weights`, where the weights
//! come from one of four schemes selected by [`WeightType`].
use crate::size_distribution::{
    errors::{SizeDistError, SizeDistResult},
    validation::{verify_positive, verify_same_length},
};
use ndarray::{Array1, ArrayView1};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightType {
    /// Unit weights.
    None,
    /// The measured uncertainties `dI`.
    #[default]
    Dy,
    /// `sqrt(I)`, counting statistics.
    SqrtI,
    /// A percentage of the intensity, `|percent / 100 · I|`.
    PercentI { percent: f64 },
}

impl WeightType {
    /// Weights for intensities `y` with optional uncertainties `dy`.
    ///
    /// # Errors
    /// - [`SizeDistError::MissingUncertainty`] for [`WeightType::Dy`] without
    ///   `dy`.
    /// - [`SizeDistError::LengthMismatch`] if `dy.len() != y.len()`.
    /// - [`SizeDistError::NonPositiveValue`] for [`WeightType::SqrtI`] on a
    ///   negative intensity.
    /// - [`SizeDistError::InvalidParameter`] for a non-finite percent.
    pub fn weights(
        &self, y: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>,
    ) -> SizeDistResult<Array1<f64>> {
        match *self {
            WeightType::None => Ok(Array1::ones(y.len())),
            WeightType::Dy => {
                let dy = dy.ok_or(SizeDistError::MissingUncertainty)?;
                verify_same_length("dy", y.len(), dy.len())?;
                Ok(dy.to_owned())
            }
            WeightType::SqrtI => {
                if let Some((index, &value)) = y.iter().enumerate().find(|(_, v)| **v < 0.0) {
                    return Err(SizeDistError::NonPositiveValue { name: "intensity", index, value });
                }
                Ok(y.mapv(f64::sqrt))
            }
            WeightType::PercentI { percent } => {
                if !percent.is_finite() {
                    return Err(SizeDistError::InvalidParameter {
                        name: "weight_percent",
                        value: percent,
                        reason: "Value must be finite.",
                    });
                }
                let fraction = percent / 100.0;
                Ok(y.mapv(|v| (fraction * v).abs()))
            }
        }
    }

    /// MaxEnt normalization `weight_factor · weights`.
    ///
    /// # Errors
    /// As [`WeightType::weights`], plus [`SizeDistError::InvalidParameter`]
    /// if `weight_factor` is not finite and positive.
    pub fn sigma(
        &self, y: ArrayView1<'_, f64>, dy: Option<ArrayView1<'_, f64>>, weight_factor: f64,
    ) -> SizeDistResult<Array1<f64>> {
        verify_positive("weight_factor", weight_factor)?;
        Ok(self.weights(y, dy)? * weight_factor)
    }
}

/// Parses the labels used by the size-distribution panel: `"None"`, `"dI"`,
/// `"sqrt(I Data)"`, `"percentI"` (case-insensitive). `"percentI"` parses
/// to a 1 % weight.
impl FromStr for WeightType {
    type Err = SizeDistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(WeightType::None),
            "di" | "dy" => Ok(WeightType::Dy),
            "sqrt(i data)" | "sqrti" => Ok(WeightType::SqrtI),
            "percenti" => Ok(WeightType::PercentI { percent: 1.0 }),
            _ => Err(SizeDistError::UnknownWeightType { text: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Each scheme produces its documented weights, scaled by the factor.
    fn each_scheme_produces_expected_sigma() {
        let y = array![4.0, -9.0];
        let dy = array![0.5, 0.25];

        assert_eq!(WeightType::None.sigma(y.view(), None, 2.0).unwrap(), array![2.0, 2.0]);
        assert_eq!(
            WeightType::Dy.sigma(y.view(), Some(dy.view()), 2.0).unwrap(),
            array![1.0, 0.5]
        );
        assert_eq!(
            WeightType::PercentI { percent: 50.0 }.sigma(y.view(), None, 1.0).unwrap(),
            array![2.0, 4.5]
        );
        assert_eq!(
            WeightType::SqrtI.sigma(array![4.0, 9.0].view(), None, 1.0).unwrap(),
            array![2.0, 3.0]
        );
    }

    #[test]
    // Purpose
    // -------
    // Invalid combinations are reported rather than producing NaN sigma.
    fn invalid_inputs_are_rejected() {
        let y = array![4.0, -9.0];

        assert_eq!(WeightType::Dy.weights(y.view(), None), Err(SizeDistError::MissingUncertainty));
        assert!(matches!(
            WeightType::SqrtI.weights(y.view(), None),
            Err(SizeDistError::NonPositiveValue { index: 1, .. })
        ));
        assert!(matches!(
            WeightType::None.sigma(y.view(), None, 0.0),
            Err(SizeDistError::InvalidParameter { name: "weight_factor", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Panel labels parse case-insensitively; unknown labels fail.
    fn labels_parse() {
        assert_eq!("dI".parse::<WeightType>().unwrap(), WeightType::Dy);
        assert_eq!("None".parse::<WeightType>().unwrap(), WeightType::None);
        assert_eq!("sqrt(I Data)".parse::<WeightType>().unwrap(), WeightType::SqrtI);
        assert_eq!(
            "percentI".parse::<WeightType>().unwrap(),
            WeightType::PercentI { percent: 1.0 }
        );
        assert!(matches!(
            "bogus".parse::<WeightType>(),
            Err(SizeDistError::UnknownWeightType { .. })
        ));
    }
}
