//! Matrix and matrix-vector products
//!
//! Dense operands go to the provider's `matrix_multiply_with_update` with
//! `alpha = 1` and `beta = 0`. A diagonal right operand uses the closed form
//! `result[:, j] = op(self)[:, j] * d[j]`, with the columns past the end of
//! the diagonal zeroed.

use super::DenseMatrix;
use crate::buffer;
use crate::control;
use crate::generic;
use crate::storage::{DiagonalMatrix, Layout, LayoutMut, MatrixStorage};
use crate::vector::DenseVector;
use fmat_core::{column_major_index, validate_product, FmatError, Matrix, Result, Transpose};

impl DenseMatrix {
    fn product<M>(&self, transpose_this: Transpose, other: &M, transpose_other: Transpose) -> Result<DenseMatrix>
    where
        M: MatrixStorage + ?Sized,
    {
        let (rows, columns) = validate_product(
            transpose_this,
            self.dimensions(),
            transpose_other,
            other.dimensions(),
        )?;
        let mut result = DenseMatrix::zeros(rows, columns)?;
        self.product_into(transpose_this, other, transpose_other, &mut result)?;
        Ok(result)
    }

    fn product_into<M, R>(
        &self,
        transpose_this: Transpose,
        other: &M,
        transpose_other: Transpose,
        result: &mut R,
    ) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        let shape = validate_product(
            transpose_this,
            self.dimensions(),
            transpose_other,
            other.dimensions(),
        )?;
        if result.dimensions() != shape {
            return Err(FmatError::DimensionMismatch);
        }

        let operand = other.layout();
        if let LayoutMut::Dense(target) = result.layout_mut() {
            match operand {
                Layout::Dense(right) => {
                    return self.gemm_into(transpose_this, right, transpose_other, target);
                }
                Layout::Diagonal(diagonal) => {
                    log::debug!("multiply: diagonal operand");
                    self.diagonal_product_into(transpose_this, diagonal, target);
                    return Ok(());
                }
                Layout::Sparse(_) => {}
            }
        }
        log::debug!(
            "multiply: generic path for {} operand, {} result",
            operand.name(),
            result.layout().name()
        );
        generic::product(transpose_this, self, transpose_other, other, result)
    }

    fn gemm_into(
        &self,
        transpose_this: Transpose,
        right: &DenseMatrix,
        transpose_right: Transpose,
        target: &DenseMatrix,
    ) -> Result<()> {
        let (a_rows, a_columns) = self.dimensions();
        let (b_rows, b_columns) = right.dimensions();
        let provider = control::provider();
        log::trace!(
            "{}: gemm {:?} {a_rows}x{a_columns} * {:?} {b_rows}x{b_columns}",
            provider.name(),
            transpose_this,
            transpose_right
        );
        buffer::zip_into(self.buffer(), right.buffer(), target.buffer(), |a, b, c| {
            provider.matrix_multiply_with_update(
                transpose_this,
                transpose_right,
                1.0,
                a,
                a_rows,
                a_columns,
                b,
                b_rows,
                b_columns,
                0.0,
                c,
            )
        })
    }

    fn diagonal_product_into(
        &self,
        transpose_this: Transpose,
        diagonal: &DiagonalMatrix,
        target: &DenseMatrix,
    ) {
        let rows = self.rows();
        let result_rows = target.rows();
        let scales = diagonal.diagonal();
        buffer::map_into(self.buffer(), target.buffer(), |src, dst| {
            for (j, column) in dst.chunks_exact_mut(result_rows).enumerate() {
                let Some(&scale) = scales.get(j) else {
                    column.fill(0.0);
                    continue;
                };
                match transpose_this {
                    Transpose::NoTrans => {
                        let source = &src[j * rows..(j + 1) * rows];
                        for (out, &value) in column.iter_mut().zip(source) {
                            *out = value * scale;
                        }
                    }
                    Transpose::Trans => {
                        for (i, out) in column.iter_mut().enumerate() {
                            *out = src[column_major_index(j, i, rows)] * scale;
                        }
                    }
                }
            }
        });
    }

    fn vector_product_into(
        &self,
        transpose_this: Transpose,
        vector: &DenseVector,
        result: &DenseVector,
    ) -> Result<()> {
        let (rows, columns) = self.dimensions();
        let (m, k) = transpose_this.apply(rows, columns);
        if vector.len() != k || result.len() != m {
            return Err(FmatError::DimensionMismatch);
        }
        let provider = control::provider();
        buffer::zip_into(self.buffer(), vector.buffer(), result.buffer(), |a, x, y| {
            provider.matrix_multiply_with_update(
                transpose_this,
                Transpose::NoTrans,
                1.0,
                a,
                rows,
                columns,
                x,
                k,
                1,
                0.0,
                y,
            )
        })
    }

    fn vector_product(&self, transpose_this: Transpose, vector: &DenseVector) -> Result<DenseVector> {
        let (m, _) = transpose_this.apply(self.rows(), self.columns());
        let result = DenseVector::zeros(m)?;
        self.vector_product_into(transpose_this, vector, &result)?;
        Ok(result)
    }

    /// `self * other`
    pub fn multiply<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.product(Transpose::NoTrans, other, Transpose::NoTrans)
    }

    pub fn multiply_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.product_into(Transpose::NoTrans, other, Transpose::NoTrans, result)
    }

    /// `self * other^T`
    pub fn transpose_and_multiply<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.product(Transpose::NoTrans, other, Transpose::Trans)
    }

    pub fn transpose_and_multiply_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.product_into(Transpose::NoTrans, other, Transpose::Trans, result)
    }

    /// `self^T * other`
    pub fn transpose_this_and_multiply<M: MatrixStorage + ?Sized>(
        &self,
        other: &M,
    ) -> Result<DenseMatrix> {
        self.product(Transpose::Trans, other, Transpose::NoTrans)
    }

    pub fn transpose_this_and_multiply_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.product_into(Transpose::Trans, other, Transpose::NoTrans, result)
    }

    /// `self * vector`
    pub fn multiply_vector(&self, vector: &DenseVector) -> Result<DenseVector> {
        self.vector_product(Transpose::NoTrans, vector)
    }

    pub fn multiply_vector_into(&self, vector: &DenseVector, result: &DenseVector) -> Result<()> {
        self.vector_product_into(Transpose::NoTrans, vector, result)
    }

    /// `self^T * vector`
    pub fn transpose_this_and_multiply_vector(&self, vector: &DenseVector) -> Result<DenseVector> {
        self.vector_product(Transpose::Trans, vector)
    }

    pub fn transpose_this_and_multiply_vector_into(
        &self,
        vector: &DenseVector,
        result: &DenseVector,
    ) -> Result<()> {
        self.vector_product_into(Transpose::Trans, vector, result)
    }

    /// `vector^T * self`, returned as a vector of length `columns`
    pub fn left_multiply_vector(&self, vector: &DenseVector) -> Result<DenseVector> {
        self.transpose_this_and_multiply_vector(vector)
    }

    pub fn left_multiply_vector_into(&self, vector: &DenseVector, result: &DenseVector) -> Result<()> {
        self.transpose_this_and_multiply_vector_into(vector, result)
    }
}
