//! Gaussian noise replicas for the full-fit ensemble.
//!
//! Each replica perturbs every intensity by an independent `N(0, dx_i)` draw
//! from statrs' `Normal`, sampled with a seeded `StdRng`. Replica `j` of a
//! seeded ensemble uses `seed + j`, so replicas differ but the ensemble is
//! reproducible.
use crate::size_distribution::{
    errors::{SizeDistError, SizeDistResult},
    validation::verify_same_length,
};
use ndarray::{Array1, ArrayView1};
use rand::{SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

/// Add independent Gaussian noise with standard deviations `dx` to `x`.
///
/// `seed = None` draws from OS entropy.
///
/// # Errors
/// - [`SizeDistError::LengthMismatch`] if `x` and `dx` differ in length.
/// - [`SizeDistError::NonPositiveUncertainty`] if any `dx_i` is not a
///   positive finite number.
pub fn add_gaussian_noise(
    x: ArrayView1<'_, f64>, dx: ArrayView1<'_, f64>, seed: Option<u64>,
) -> SizeDistResult<Array1<f64>> {
    verify_same_length("dx", x.len(), dx.len())?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut noisy = x.to_owned();
    for (index, (xi, &sd)) in noisy.iter_mut().zip(dx.iter()).enumerate() {
        if !(sd.is_finite() && sd > 0.0) {
            return Err(SizeDistError::NonPositiveUncertainty { index, value: sd });
        }
        let normal = Normal::new(0.0, sd)
            .map_err(|_| SizeDistError::NonPositiveUncertainty { index, value: sd })?;
        *xi += normal.sample(&mut rng);
    }
    Ok(noisy)
}

/// `n_reps` noisy copies of `x`; replica `j` uses `seed + j` when seeded.
///
/// # Errors
/// As [`add_gaussian_noise`].
pub fn noise_replicas(
    x: ArrayView1<'_, f64>, dx: ArrayView1<'_, f64>, n_reps: usize, seed: Option<u64>,
) -> SizeDistResult<Vec<Array1<f64>>> {
    (0..n_reps)
        .map(|j| add_gaussian_noise(x, dx, seed.map(|s| s.wrapping_add(j as u64))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Reproducibility under a seed, distinct replicas, rough noise scale, and
    // input validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The same seed gives the same draws; consecutive replicas differ.
    fn seeded_noise_is_reproducible_and_replicas_differ() {
        let x = Array1::<f64>::from_elem(8, 10.0);
        let dx = Array1::<f64>::from_elem(8, 0.5);

        let a = add_gaussian_noise(x.view(), dx.view(), Some(3)).unwrap();
        let b = add_gaussian_noise(x.view(), dx.view(), Some(3)).unwrap();
        let reps = noise_replicas(x.view(), dx.view(), 2, Some(3)).unwrap();

        assert_eq!(a, b);
        assert_eq!(reps[0], a);
        assert_ne!(reps[0], reps[1]);
    }

    #[test]
    // Purpose
    // -------
    // The sample standard deviation of many draws is close to `dx`.
    //
    // Given
    // -----
    // - 20 000 draws with `dx = 2`.
    //
    // Expect
    // ------
    // - Mean within 0.1 of the input, standard deviation within 0.1 of 2.
    fn noise_has_requested_scale() {
        let n = 20_000;
        let x = Array1::<f64>::zeros(n);
        let dx = Array1::<f64>::from_elem(n, 2.0);

        let noisy = add_gaussian_noise(x.view(), dx.view(), Some(11)).unwrap();
        let mean = noisy.mean().unwrap();
        let sd = noisy.std(0.0);

        assert!(mean.abs() < 0.1, "mean was {mean}");
        assert!((sd - 2.0).abs() < 0.1, "sd was {sd}");
    }

    #[test]
    // Purpose
    // -------
    // Length mismatches and non-positive sigmas are rejected.
    fn invalid_uncertainties_are_rejected() {
        let x = Array1::<f64>::ones(3);

        assert!(matches!(
            add_gaussian_noise(x.view(), Array1::<f64>::ones(2).view(), Some(0)),
            Err(SizeDistError::LengthMismatch { .. })
        ));
        let dx = ndarray::array![1.0, 0.0, 1.0];
        assert_eq!(
            add_gaussian_noise(x.view(), dx.view(), Some(0)),
            Err(SizeDistError::NonPositiveUncertainty { index: 1, value: 0.0 })
        );
    }
}
