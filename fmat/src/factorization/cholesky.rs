//! Cholesky factorization `A = L L^T`

use super::{rhs_work, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{validate_square, FmatError, Matrix, Result};

/// Lower-triangular Cholesky factor of a symmetric positive definite matrix
///
/// Only the lower triangle of the input is read.
#[derive(Debug, Clone)]
pub struct Cholesky {
    factor: Work,
}

impl Cholesky {
    /// Factor `matrix` row by row (Cholesky-Banachiewicz)
    pub fn factor(matrix: &DenseMatrix) -> Result<Self> {
        let n = validate_square(matrix.dimensions())?;
        let a = Work::of(matrix);
        let mut l = Work::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let sum: f64 = (0..j).map(|k| l[(i, k)] * l[(j, k)]).sum();
                if i == j {
                    let pivot = a[(i, i)] - sum;
                    if pivot <= 0.0 || !pivot.is_finite() {
                        return Err(FmatError::NotPositiveDefinite);
                    }
                    l[(i, i)] = pivot.sqrt();
                } else {
                    l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
                }
            }
        }
        Ok(Self { factor: l })
    }

    /// The lower-triangular factor `L`
    pub fn factor_matrix(&self) -> DenseMatrix {
        self.factor.to_matrix()
    }

    /// `det(A) = prod(L[i, i])^2`
    pub fn determinant(&self) -> f64 {
        let n = self.factor.rows();
        (0..n).map(|i| self.factor[(i, i)]).product::<f64>().powi(2)
    }

    /// Natural log of the determinant
    pub fn determinant_ln(&self) -> f64 {
        let n = self.factor.rows();
        2.0 * (0..n).map(|i| self.factor[(i, i)].ln()).sum::<f64>()
    }
}

impl Solver for Cholesky {
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        let l = &self.factor;
        let n = l.rows();
        let mut x = rhs_work(rhs, n)?;
        for col in 0..x.columns() {
            let b = x.column_mut(col);
            // L y = b
            for i in 0..n {
                let sum: f64 = (0..i).map(|k| l[(i, k)] * b[k]).sum();
                b[i] = (b[i] - sum) / l[(i, i)];
            }
            // L^T x = y
            for i in (0..n).rev() {
                let sum: f64 = (i + 1..n).map(|k| l[(k, i)] * b[k]).sum();
                b[i] = (b[i] - sum) / l[(i, i)];
            }
        }
        Ok(x.to_matrix())
    }
}
