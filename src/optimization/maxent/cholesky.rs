//! Closed-form Cholesky solve for the 3×3 search-subspace systems.
//!
//! The step chooser only ever needs `a · beta = b` with `a` a symmetric
//! 3×3 blend of the chi-squared and entropy curvature matrices, so the
//! factorization `a = L·Lᵗ` is unrolled for that size: no pivoting, no
//! allocation. Diagonal terms that dip below zero through rounding are
//! clamped to zero before the square root.
use crate::optimization::{
    errors::{MaxEntError, MaxEntResult},
    maxent::types::{Subspace, SubspaceMetric},
};
use nalgebra::Matrix3;

/// Solve `a · beta = b` for symmetric positive-definite `a`.
///
/// Only the lower triangle of `a` is read.
///
/// # Errors
/// - [`MaxEntError::NotPositiveDefinite`] with `pivot = 0` if
///   `a[(0, 0)] <= 0`.
/// - [`MaxEntError::NotPositiveDefinite`] with the pivot index if a later
///   diagonal term of `L` is zero after clamping, which would otherwise
///   divide by zero.
pub fn solve3(a: &SubspaceMetric, b: &Subspace) -> MaxEntResult<Subspace> {
    if !(a[(0, 0)] > 0.0) {
        return Err(MaxEntError::NotPositiveDefinite { pivot: 0, value: a[(0, 0)] });
    }

    // L, lower triangular
    let mut l = Matrix3::<f64>::zeros();
    l[(0, 0)] = a[(0, 0)].sqrt();
    for i in 1..3 {
        l[(i, 0)] = a[(i, 0)] / l[(0, 0)];
        for j in 1..=i {
            let mut z = a[(i, j)];
            for k in 0..j {
                z -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = if j == i { z.max(0.0).sqrt() } else { z / l[(j, j)] };
        }
        if !(l[(i, i)] > 0.0) {
            return Err(MaxEntError::NotPositiveDefinite { pivot: i, value: l[(i, i)] });
        }
    }

    // L · y = b
    let mut y = Subspace::zeros();
    for i in 0..3 {
        let mut z = b[i];
        for k in 0..i {
            z -= l[(i, k)] * y[k];
        }
        y[i] = z / l[(i, i)];
    }

    // Lᵗ · beta = y
    let mut beta = Subspace::zeros();
    for i in (0..3).rev() {
        let mut z = y[i];
        for k in (i + 1)..3 {
            z -= l[(k, i)] * beta[k];
        }
        beta[i] = z / l[(i, i)];
    }
    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Residual accuracy on random well-conditioned SPD systems.
    // - Agreement with nalgebra's general Cholesky on a hand-written system.
    // - The non-positive-definite guard for the first and later pivots.
    // -------------------------------------------------------------------------

    fn random_spd(rng: &mut StdRng) -> SubspaceMetric {
        let m = Matrix3::<f64>::from_fn(|_, _| rng.gen_range(-1.0..1.0));
        m.transpose() * m + Matrix3::identity()
    }

    #[test]
    // Purpose
    // -------
    // For random SPD `a = MᵗM + I` (condition number well below 1e6), the
    // solution satisfies `‖a·beta − b‖ < 1e-9`.
    //
    // Given
    // -----
    // - 200 seeded random systems with entries of `M` and `b` in [-1, 1).
    //
    // Expect
    // ------
    // - Residual norm below 1e-9 for every system.
    fn random_spd_systems_are_solved_to_tight_residual() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let a = random_spd(&mut rng);
            let b = Vector3::from_fn(|_, _| rng.gen_range(-1.0..1.0));

            let beta = solve3(&a, &b).unwrap();

            assert!((a * beta - b).norm() < 1e-9, "residual too large for a = {a}");
        }
    }

    #[test]
    // Purpose
    // -------
    // The unrolled factorization agrees with nalgebra's Cholesky solver.
    fn matches_nalgebra_cholesky() {
        let a = Matrix3::new(4.0, 2.0, 0.6, 2.0, 5.0, 1.0, 0.6, 1.0, 3.0);
        let b = Vector3::new(1.0, -2.0, 0.5);

        let beta = solve3(&a, &b).unwrap();
        let reference = a.cholesky().unwrap().solve(&b);

        for k in 0..3 {
            assert_relative_eq!(beta[k], reference[k], epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // `a[0][0] <= 0` fails with a domain error and no result.
    fn non_positive_leading_entry_is_a_domain_error() {
        let b = Vector3::new(1.0, 1.0, 1.0);
        let mut a = Matrix3::identity();
        a[(0, 0)] = 0.0;
        assert_eq!(solve3(&a, &b), Err(MaxEntError::NotPositiveDefinite { pivot: 0, value: 0.0 }));

        a[(0, 0)] = -3.0;
        assert!(matches!(
            solve3(&a, &b),
            Err(MaxEntError::NotPositiveDefinite { pivot: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A rank-deficient matrix with a positive leading entry is reported at
    // the pivot where the clamp produces zero.
    //
    // Given
    // -----
    // - `a` with identical first and second rows/columns.
    //
    // Expect
    // ------
    // - `NotPositiveDefinite { pivot: 1, value: 0.0 }`.
    fn singular_trailing_block_reports_pivot() {
        let a = Matrix3::new(1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let b = Vector3::new(1.0, 1.0, 1.0);

        assert_eq!(solve3(&a, &b), Err(MaxEntError::NotPositiveDefinite { pivot: 1, value: 0.0 }));
    }
}
