//! Sparse Cholesky factorization.

use crate::error::{PlaceError, PlaceResult};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::CscMatrix;

/// Factorizes a symmetric positive definite matrix.
///
/// The factor is computed once and reused for both axes.
pub fn factor(matrix: &CscMatrix<f64>) -> PlaceResult<CscCholesky<f64>> {
    CscCholesky::factor(matrix).map_err(|e| PlaceError::NumericFailure {
        reason: format!("Cholesky factorization failed: {e:?}"),
    })
}

/// Solves `L·Lᵀ·x = b` with a precomputed factor.
pub fn solve(factor: &CscCholesky<f64>, b: &DVector<f64>) -> DVector<f64> {
    let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
    factor.solve(&rhs).column(0).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_sparse::CooMatrix;

    fn csc(n: usize, entries: &[(usize, usize, f64)]) -> CscMatrix<f64> {
        let mut coo = CooMatrix::new(n, n);
        for &(i, j, v) in entries {
            coo.push(i, j, v);
        }
        CscMatrix::from(&coo)
    }

    #[test]
    fn solves_anchored_pair() {
        let a = csc(
            2,
            &[(0, 0, 2.0), (0, 1, -1.0), (1, 0, -1.0), (1, 1, 2.0)],
        );
        let l = factor(&a).unwrap();
        let x = solve(&l, &DVector::from_vec(vec![0.0, 20.0]));
        assert!((x[0] - 20.0 / 3.0).abs() < 1e-12);
        assert!((x[1] - 40.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn factor_is_reusable() {
        let a = csc(2, &[(0, 0, 4.0), (1, 1, 2.0)]);
        let l = factor(&a).unwrap();
        for (b, expected) in [([8.0, 2.0], [2.0, 1.0]), ([4.0, 6.0], [1.0, 3.0])] {
            let x = solve(&l, &DVector::from_row_slice(&b));
            for (got, want) in x.iter().zip(expected) {
                assert!((got - want).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn indefinite_matrix_is_numeric_failure() {
        let a = csc(2, &[(0, 0, 1.0), (0, 1, 2.0), (1, 0, 2.0), (1, 1, 1.0)]);
        assert!(matches!(
            factor(&a),
            Err(PlaceError::NumericFailure { .. })
        ));
    }
}
