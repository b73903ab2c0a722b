//! Borrowed view of one inversion problem, exposed to `argmin`.
//!
//! [`SasProblem`] holds read-only views of the measured intensity `I`, its
//! normalization `sigma`, the kernel `G` (shape `(n_bins, npt)`) and the
//! initial histogram `first_bins`. The solver owns its working histogram;
//! nothing here is ever written to.
//!
//! The two kernel products used throughout the iteration are
//! - [`SasProblem::opus`]: solution space → data space, `f ↦ f·G` (length `npt`),
//! - [`SasProblem::tropus`]: data space → solution space, `x ↦ G·x` (length
//!   `n_bins`).
//!
//! For `argmin`, chi-squared is the cost, its gradient with respect to `f`
//! is the gradient, and `opus` is the operator.
use crate::optimization::{
    errors::MaxEntResult,
    maxent::{
        types::{Curve, Histogram},
        validation::{
            validate_finite, validate_kernel, validate_prior, validate_shapes, validate_sigma,
        },
    },
};
use argmin::core::{CostFunction, Error, Gradient, Operator};
use ndarray::{ArrayView1, ArrayView2};

/// Validated, borrowed inputs of one MaxEnt solve.
///
/// Only [`SasProblem::new`] builds one, so every instance satisfies the
/// shape, finiteness and positivity preconditions.
#[derive(Debug, Clone, Copy)]
pub struct SasProblem<'a> {
    pub(crate) intensity: ArrayView1<'a, f64>,
    pub(crate) sigma: ArrayView1<'a, f64>,
    pub(crate) kernel: ArrayView2<'a, f64>,
    pub(crate) first_bins: ArrayView1<'a, f64>,
}

impl<'a> SasProblem<'a> {
    /// Validate and wrap the four solver inputs.
    ///
    /// # Errors
    /// Any precondition error from [`validate_shapes`], [`validate_finite`],
    /// [`validate_sigma`], [`validate_kernel`] or [`validate_prior`]; no
    /// iteration is attempted on invalid input.
    pub fn new(
        intensity: ArrayView1<'a, f64>, sigma: ArrayView1<'a, f64>, kernel: ArrayView2<'a, f64>,
        first_bins: ArrayView1<'a, f64>,
    ) -> MaxEntResult<Self> {
        validate_shapes(intensity, sigma, kernel, first_bins)?;
        validate_finite("intensity", intensity)?;
        validate_sigma(sigma)?;
        validate_kernel(kernel)?;
        validate_prior(first_bins)?;
        Ok(Self { intensity, sigma, kernel, first_bins })
    }

    pub fn intensity(&self) -> ArrayView1<'a, f64> {
        self.intensity
    }

    pub fn sigma(&self) -> ArrayView1<'a, f64> {
        self.sigma
    }

    pub fn kernel(&self) -> ArrayView2<'a, f64> {
        self.kernel
    }

    pub fn first_bins(&self) -> ArrayView1<'a, f64> {
        self.first_bins
    }

    pub fn npt(&self) -> usize {
        self.intensity.len()
    }

    pub fn n_bins(&self) -> usize {
        self.first_bins.len()
    }

    /// Chi-squared target: one per data point.
    pub fn chizer(&self) -> f64 {
        self.npt() as f64
    }

    /// Mean of the initial histogram, the entropy's default level.
    pub fn blank(&self) -> f64 {
        self.first_bins.sum() / self.n_bins() as f64
    }

    /// Solution space to data space: `f·G`.
    pub fn opus(&self, f: ArrayView1<'_, f64>) -> Curve {
        f.dot(&self.kernel)
    }

    /// Data space to solution space: `G·x`.
    pub fn tropus(&self, x: ArrayView1<'_, f64>) -> Histogram {
        self.kernel.dot(&x)
    }

    /// Model curve `f·G`, i.e. the fit returned to the caller.
    pub fn model_curve(&self, f: ArrayView1<'_, f64>) -> Curve {
        self.opus(f)
    }

    /// Standardized residuals `z = (I − f·G) / sigma`.
    pub fn residuals(&self, f: ArrayView1<'_, f64>) -> Curve {
        (&self.intensity - &self.opus(f)) / &self.sigma
    }

    /// `Σ z²`.
    pub fn chi_squared(&self, f: ArrayView1<'_, f64>) -> f64 {
        self.residuals(f).mapv(|z| z * z).sum()
    }

    /// Gradient of chi-squared with respect to `f`, from precomputed
    /// residuals: `G · (−2 z / sigma)`.
    pub fn chi_squared_gradient(&self, z: ArrayView1<'_, f64>) -> Histogram {
        let ox = z.mapv(|v| -2.0 * v) / &self.sigma;
        self.tropus(ox.view())
    }
}

impl<'a> CostFunction for SasProblem<'a> {
    type Param = Histogram;
    type Output = f64;

    fn cost(&self, f: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.chi_squared(f.view()))
    }
}

impl<'a> Gradient for SasProblem<'a> {
    type Param = Histogram;
    type Gradient = Histogram;

    fn gradient(&self, f: &Self::Param) -> Result<Self::Gradient, Error> {
        let z = self.residuals(f.view());
        Ok(self.chi_squared_gradient(z.view()))
    }
}

impl<'a> Operator for SasProblem<'a> {
    type Param = Histogram;
    type Output = Curve;

    fn apply(&self, f: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.opus(f.view()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::MaxEntError;
    use approx::assert_relative_eq;
    use finitediff::FiniteDiff;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Orientation of the two kernel products for a non-square kernel.
    // - Chi-squared as the argmin cost, and its analytic gradient against a
    //   central finite difference.
    // - Rejection of invalid inputs at construction.
    // -------------------------------------------------------------------------

    fn small_kernel() -> Array2<f64> {
        // n_bins = 2, npt = 3
        array![[1.0, 2.0, 3.0], [0.5, 0.0, 1.0]]
    }

    #[test]
    // Purpose
    // -------
    // `opus` maps a histogram to `npt` values and `tropus` maps a data
    // vector to `n_bins` values.
    //
    // Given
    // -----
    // - `G` of shape (2, 3), `f = (1, 2)`, `x = (1, 1, 1)`.
    //
    // Expect
    // ------
    // - `opus(f) = (2, 2, 5)`, `tropus(x) = (6, 1.5)`.
    fn kernel_products_have_expected_orientation() {
        let g = small_kernel();
        let i = array![1.0, 1.0, 1.0];
        let sigma = array![1.0, 1.0, 1.0];
        let first = array![1.0, 1.0];
        let p = SasProblem::new(i.view(), sigma.view(), g.view(), first.view()).unwrap();

        let curve = p.opus(array![1.0, 2.0].view());
        let back = p.tropus(array![1.0, 1.0, 1.0].view());

        assert_eq!(curve, array![2.0, 2.0, 5.0]);
        assert_eq!(back, array![6.0, 1.5]);
        assert_eq!(p.chizer(), 3.0);
        assert_eq!(p.blank(), 1.0);
        assert_eq!(p.first_bins(), first.view());
        assert_eq!(p.kernel().dim(), (2, 3));
    }

    #[test]
    // Purpose
    // -------
    // The analytic chi-squared gradient agrees with a central finite
    // difference of the argmin cost.
    //
    // Given
    // -----
    // - Non-uniform sigma and an `f` away from the data.
    //
    // Expect
    // ------
    // - Component-wise agreement to 1e-5 relative.
    fn chi_squared_gradient_matches_finite_difference() {
        let g = small_kernel();
        let i = array![3.0, 1.0, 4.0];
        let sigma = array![0.5, 1.0, 2.0];
        let first = array![1.0, 1.0];
        let p = SasProblem::new(i.view(), sigma.view(), g.view(), first.view()).unwrap();
        let f: Array1<f64> = array![0.7, 1.3];

        let analytic = p.gradient(&f).unwrap();
        let numeric = f.central_diff(&|x: &Array1<f64>| p.cost(x).unwrap());

        for k in 0..2 {
            assert_relative_eq!(analytic[k], numeric[k], max_relative = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // An exact model has zero chi-squared, and the cost equals `Σ z²`.
    fn cost_is_sum_of_squared_standardized_residuals() {
        let g = small_kernel();
        let f = array![1.0, 2.0];
        let i = f.dot(&g);
        let sigma = array![0.1, 0.2, 0.5];
        let first = array![1.0, 1.0];
        let p = SasProblem::new(i.view(), sigma.view(), g.view(), first.view()).unwrap();

        assert_eq!(p.cost(&f).unwrap(), 0.0);
        let shifted = array![1.0, 2.2];
        // model moves by 0.2·(0.5, 0, 1)
        let expected = (0.1_f64 / 0.1).powi(2) + 0.0 + (0.2_f64 / 0.5).powi(2);
        assert_relative_eq!(p.cost(&shifted).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Construction fails fast on non-positive priors and sigma.
    fn new_rejects_invalid_inputs() {
        let g = small_kernel();
        let i = array![1.0, 1.0, 1.0];
        let sigma = array![1.0, 1.0, 1.0];

        let zero_prior = array![1.0, 0.0];
        assert!(matches!(
            SasProblem::new(i.view(), sigma.view(), g.view(), zero_prior.view()),
            Err(MaxEntError::NonPositivePrior { index: 1, .. })
        ));

        let bad_sigma = array![1.0, 0.0, 1.0];
        let first = array![1.0, 1.0];
        assert!(matches!(
            SasProblem::new(i.view(), bad_sigma.view(), g.view(), first.view()),
            Err(MaxEntError::NonPositiveSigma { index: 1, .. })
        ));
    }
}
