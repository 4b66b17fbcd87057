//! Matrix-free view of the system matrix.
//!
//! The iterative solver only needs `y = A·x`, so it is written against
//! [`LinearOperator`] rather than a concrete sparse format.

use nalgebra_sparse::CsrMatrix;

/// A square linear operator computing `y = A·x`.
pub trait LinearOperator: Send + Sync {
    /// Dimension of the operator (N×N).
    fn dim(&self) -> usize;

    /// Applies the operator: `y = A·x`.
    ///
    /// `x` and `y` have length `dim()`; `y` is overwritten.
    fn apply(&self, x: &[f64], y: &mut [f64]);
}

impl LinearOperator for CsrMatrix<f64> {
    fn dim(&self) -> usize {
        self.nrows()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        for (yi, row) in y.iter_mut().zip(self.row_iter()) {
            *yi = row
                .col_indices()
                .iter()
                .zip(row.values())
                .map(|(&j, &v)| v * x[j])
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_sparse::CooMatrix;

    struct Diagonal(Vec<f64>);

    impl LinearOperator for Diagonal {
        fn dim(&self) -> usize {
            self.0.len()
        }

        fn apply(&self, x: &[f64], y: &mut [f64]) {
            for ((yi, d), xi) in y.iter_mut().zip(&self.0).zip(x) {
                *yi = d * xi;
            }
        }
    }

    #[test]
    fn diagonal_operator() {
        let op = Diagonal(vec![2.0, 3.0]);
        let mut y = vec![0.0; 2];
        op.apply(&[1.0, 2.0], &mut y);
        assert_eq!(y, [2.0, 6.0]);
    }

    #[test]
    fn csr_matvec() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 0, 2.0);
        coo.push(0, 1, -1.0);
        coo.push(1, 0, -1.0);
        coo.push(1, 1, 2.0);
        let a = CsrMatrix::from(&coo);
        assert_eq!(LinearOperator::dim(&a), 2);
        let mut y = vec![7.0; 2];
        LinearOperator::apply(&a, &[1.0, 3.0], &mut y);
        assert_eq!(y, [-1.0, 5.0]);
    }

    #[test]
    fn operators_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CsrMatrix<f64>>();
        assert_send_sync::<Diagonal>();
    }
}
