//! LU factorization with partial pivoting, `P A = L U`

use super::{rhs_work, Solver, Work};
use crate::dense::DenseMatrix;
use fmat_core::{validate_square, FmatError, Matrix, Result};

/// Packed LU factors: unit-lower `L` below the diagonal, `U` on and above it
///
/// Factoring a singular matrix succeeds; solving with it fails with
/// [`FmatError::Singular`].
#[derive(Debug, Clone)]
pub struct Lu {
    factors: Work,
    /// Row `i` of `P A` is row `permutation[i]` of `A`
    permutation: Vec<usize>,
    sign: f64,
}

impl Lu {
    pub fn factor(matrix: &DenseMatrix) -> Result<Self> {
        let n = validate_square(matrix.dimensions())?;
        let mut lu = Work::of(matrix);
        let mut permutation: Vec<usize> = (0..n).collect();
        let mut sign = 1.0;

        for k in 0..n {
            let pivot_row = (k..n)
                .max_by(|&i, &j| lu[(i, k)].abs().total_cmp(&lu[(j, k)].abs()))
                .unwrap_or(k);
            if pivot_row != k {
                for col in 0..n {
                    let upper = lu[(k, col)];
                    lu[(k, col)] = lu[(pivot_row, col)];
                    lu[(pivot_row, col)] = upper;
                }
                permutation.swap(k, pivot_row);
                sign = -sign;
            }

            let pivot = lu[(k, k)];
            if pivot == 0.0 {
                continue;
            }
            for i in k + 1..n {
                lu[(i, k)] /= pivot;
                let factor = lu[(i, k)];
                for col in k + 1..n {
                    let update = factor * lu[(k, col)];
                    lu[(i, col)] -= update;
                }
            }
        }

        Ok(Self {
            factors: lu,
            permutation,
            sign,
        })
    }

    fn order(&self) -> usize {
        self.factors.rows()
    }

    /// Unit lower-triangular factor
    pub fn l(&self) -> DenseMatrix {
        let n = self.order();
        let mut l = Work::identity(n);
        for col in 0..n {
            for row in col + 1..n {
                l[(row, col)] = self.factors[(row, col)];
            }
        }
        l.to_matrix()
    }

    /// Upper-triangular factor
    pub fn u(&self) -> DenseMatrix {
        let n = self.order();
        let mut u = Work::zeros(n, n);
        for col in 0..n {
            for row in 0..=col {
                u[(row, col)] = self.factors[(row, col)];
            }
        }
        u.to_matrix()
    }

    /// Row permutation: row `i` of `P A` is row `permutation()[i]` of `A`
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    pub fn is_singular(&self) -> bool {
        (0..self.order()).any(|i| self.factors[(i, i)] == 0.0)
    }

    pub fn determinant(&self) -> f64 {
        self.sign * (0..self.order()).map(|i| self.factors[(i, i)]).product::<f64>()
    }

    /// `A^-1`, or [`FmatError::Singular`]
    pub fn inverse(&self) -> Result<DenseMatrix> {
        let n = self.order();
        self.solve(&DenseMatrix::identity(n)?)
    }
}

impl Solver for Lu {
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        let n = self.order();
        if self.is_singular() {
            return Err(FmatError::Singular);
        }
        let b = rhs_work(rhs, n)?;
        let lu = &self.factors;
        let mut x = Work::zeros(n, b.columns());
        for col in 0..b.columns() {
            let source = b.column(col);
            let y = x.column_mut(col);
            for (i, value) in y.iter_mut().enumerate() {
                *value = source[self.permutation[i]];
            }
            for i in 0..n {
                let sum: f64 = (0..i).map(|k| lu[(i, k)] * y[k]).sum();
                y[i] -= sum;
            }
            for i in (0..n).rev() {
                let sum: f64 = (i + 1..n).map(|k| lu[(i, k)] * y[k]).sum();
                y[i] = (y[i] - sum) / lu[(i, i)];
            }
        }
        Ok(x.to_matrix())
    }
}
