//! Reference factorizations of dense matrices
//!
//! Each factorization copies its input into an `f64` workspace, so the
//! source matrix is never modified. All of them implement [`Solver`].

mod cholesky;
mod evd;
mod gram_schmidt;
mod jacobi;
mod lu;
mod qr;
mod svd;

pub use cholesky::Cholesky;
pub use evd::Evd;
pub use gram_schmidt::GramSchmidt;
pub use lu::Lu;
pub use qr::Qr;
pub use svd::Svd;

use crate::dense::DenseMatrix;
use crate::vector::DenseVector;
use fmat_core::{FmatError, Matrix, Result};
use std::ops::{Index, IndexMut};

/// Solve `A x = b` using a factorization of `A`
pub trait Solver {
    /// Solve for every column of `rhs`
    fn solve(&self, rhs: &DenseMatrix) -> Result<DenseMatrix>;

    /// Solve for a single right-hand side
    fn solve_vector(&self, rhs: &DenseVector) -> Result<DenseVector> {
        let rhs = DenseMatrix::from_vec(rhs.len(), 1, rhs.to_vec())?;
        DenseVector::from_vec(self.solve(&rhs)?.storage().to_vec())
    }
}

/// Column-major `f64` workspace
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Work {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl Work {
    pub fn of(matrix: &DenseMatrix) -> Self {
        Self {
            rows: matrix.rows(),
            columns: matrix.columns(),
            data: matrix.buffer().read().iter().map(|&v| f64::from(v)).collect(),
        }
    }

    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![0.0; rows * columns],
        }
    }

    pub fn identity(order: usize) -> Self {
        let mut work = Self::zeros(order, order);
        for i in 0..order {
            work[(i, i)] = 1.0;
        }
        work
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn column(&self, col: usize) -> &[f64] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut [f64] {
        &mut self.data[col * self.rows..(col + 1) * self.rows]
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Leading `rows x columns` block
    pub fn block(&self, rows: usize, columns: usize) -> Self {
        let mut block = Self::zeros(rows, columns);
        for col in 0..columns {
            block.column_mut(col).copy_from_slice(&self.column(col)[..rows]);
        }
        block
    }

    pub fn transpose(&self) -> Self {
        let mut transposed = Self::zeros(self.columns, self.rows);
        for col in 0..self.columns {
            for row in 0..self.rows {
                transposed[(col, row)] = self[(row, col)];
            }
        }
        transposed
    }

    /// Reorder columns so that column `j` of the result is column `order[j]`
    pub fn permute_columns(&self, order: &[usize]) -> Self {
        let mut permuted = Self::zeros(self.rows, order.len());
        for (j, &source) in order.iter().enumerate() {
            permuted.column_mut(j).copy_from_slice(self.column(source));
        }
        permuted
    }

    pub fn to_matrix(&self) -> DenseMatrix {
        DenseMatrix::from_parts(
            self.rows,
            self.columns,
            self.data.iter().map(|&v| v as f32).collect(),
        )
    }
}

impl Index<(usize, usize)> for Work {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[col * self.rows + row]
    }
}

impl IndexMut<(usize, usize)> for Work {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[col * self.rows + row]
    }
}

/// Validate that `rhs` has `rows` rows and widen it
fn rhs_work(rhs: &DenseMatrix, rows: usize) -> Result<Work> {
    if rhs.row_count() != rows {
        return Err(FmatError::DimensionMismatch);
    }
    Ok(Work::of(rhs))
}

/// Solve `R x = b` in place for upper-triangular `R` (leading `n x n` block)
fn back_substitute(r: &Work, n: usize, b: &mut [f64]) -> Result<()> {
    for i in (0..n).rev() {
        let pivot = r[(i, i)];
        if pivot == 0.0 {
            return Err(FmatError::Singular);
        }
        let sum: f64 = (i + 1..n).map(|k| r[(i, k)] * b[k]).sum();
        b[i] = (b[i] - sum) / pivot;
    }
    Ok(())
}

/// Least-squares solve through an orthonormal-column `Q` and upper `R`
fn solve_orthogonal(q: &Work, r: &Work, rhs: &DenseMatrix) -> Result<DenseMatrix> {
    let (m, n) = (q.rows(), r.columns());
    if m < n {
        return Err(FmatError::DimensionMismatch);
    }
    let b = rhs_work(rhs, m)?;
    let mut x = Work::zeros(n, b.columns());
    for col in 0..b.columns() {
        let rhs_col = b.column(col);
        let solution = x.column_mut(col);
        for (j, value) in solution.iter_mut().enumerate() {
            *value = q.column(j).iter().zip(rhs_col).map(|(a, b)| a * b).sum();
        }
        back_substitute(r, n, solution)?;
    }
    Ok(x.to_matrix())
}

impl DenseMatrix {
    /// Cholesky factorization `A = L L^T`
    pub fn cholesky(&self) -> Result<Cholesky> {
        Cholesky::factor(self)
    }

    /// LU factorization with partial pivoting
    pub fn lu(&self) -> Result<Lu> {
        Lu::factor(self)
    }

    /// Householder QR factorization
    pub fn qr(&self, method: fmat_core::QrMethod) -> Result<Qr> {
        Qr::factor(self, method)
    }

    /// Modified Gram-Schmidt QR factorization
    pub fn gram_schmidt(&self) -> Result<GramSchmidt> {
        GramSchmidt::factor(self)
    }

    /// Singular value decomposition
    pub fn svd(&self, compute_vectors: bool) -> Result<Svd> {
        Svd::factor(self, compute_vectors)
    }

    /// Eigenvalue decomposition of a symmetric matrix
    pub fn evd(&self) -> Result<Evd> {
        Evd::factor(self)
    }
}
