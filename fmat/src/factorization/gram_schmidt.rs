//! Modified Gram-Schmidt orthogonalization

use super::{solve_orthogonal, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{FmatError, Matrix, Result};

/// A residual this small relative to the original column means the column
/// is dependent on the ones before it
const RANK_TOLERANCE: f64 = 1e-10;

/// `A = Q R` with orthonormal columns in `Q` (`m x n`) and upper `R` (`n x n`)
#[derive(Debug, Clone)]
pub struct GramSchmidt {
    q: Work,
    r: Work,
}

impl GramSchmidt {
    /// Requires `rows >= columns` and linearly independent columns
    pub fn factor(matrix: &DenseMatrix) -> Result<Self> {
        let (m, n) = matrix.dimensions();
        if m < n {
            return Err(FmatError::DimensionMismatch);
        }
        let mut q = Work::of(matrix);
        let mut r = Work::zeros(n, n);
        let original: Vec<f64> = (0..n).map(|k| column_norm(q.column(k))).collect();

        for k in 0..n {
            let norm = column_norm(q.column(k));
            if norm <= original[k] * RANK_TOLERANCE {
                return Err(FmatError::Singular);
            }
            r[(k, k)] = norm;
            q.column_mut(k).iter_mut().for_each(|x| *x /= norm);

            for j in k + 1..n {
                let dot: f64 = q.column(k).iter().zip(q.column(j)).map(|(a, b)| a * b).sum();
                r[(k, j)] = dot;
                for row in 0..m {
                    let update = dot * q[(row, k)];
                    q[(row, j)] -= update;
                }
            }
        }
        Ok(Self { q, r })
    }

    pub fn q(&self) -> DenseMatrix {
        self.q.to_matrix()
    }

    pub fn r(&self) -> DenseMatrix {
        self.r.to_matrix()
    }
}

fn column_norm(column: &[f64]) -> f64 {
    column.iter().map(|x| x * x).sum::<f64>().sqrt()
}

impl Solver for GramSchmidt {
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        solve_orthogonal(&self.q, &self.r, rhs)
    }
}
