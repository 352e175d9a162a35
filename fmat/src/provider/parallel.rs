//! Rayon-backed provider
//!
//! Element-wise kernels split the arrays into contiguous chunks; the matrix
//! multiply splits the result into blocks of whole columns, so every task
//! writes a disjoint range of `c`.

use super::kernels::{self, Gemm};
use crate::parallel;
use fmat_core::{
    LinearAlgebraProvider, Norm, Result, Transpose, MULTIPLY_COLUMN_BLOCK, PARALLEL_CHUNK_SIZE,
};
use rayon::prelude::*;

/// Data-parallel provider running on the configured rayon pool
#[derive(Debug, Clone, Copy)]
pub struct ParallelProvider {
    chunk_size: usize,
    column_block: usize,
}

impl ParallelProvider {
    /// Create a provider with the default chunking
    pub const fn new() -> Self {
        Self {
            chunk_size: PARALLEL_CHUNK_SIZE,
            column_block: MULTIPLY_COLUMN_BLOCK,
        }
    }

    /// Set the number of elements per element-wise task
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the number of result columns per matrix multiply task
    pub fn with_column_block(mut self, column_block: usize) -> Self {
        self.column_block = column_block.max(1);
        self
    }

    fn zip_with<F>(&self, x: &[f32], y: &[f32], result: &mut [f32], op: F) -> Result<()>
    where
        F: Fn(f32, f32) -> f32 + Sync + Send,
    {
        kernels::validate_zip(x, y, result)?;
        if !parallel::should_split(result.len()) {
            kernels::zip_with(x, y, result, op);
            return Ok(());
        }
        let chunk_size = self.chunk_size;
        parallel::install(|| {
            result
                .par_chunks_mut(chunk_size)
                .zip(x.par_chunks(chunk_size).zip(y.par_chunks(chunk_size)))
                .for_each(|(out, (left, right))| kernels::zip_with(left, right, out, &op));
        });
        Ok(())
    }
}

impl Default for ParallelProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearAlgebraProvider for ParallelProvider {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn scale_array(&self, alpha: f32, x: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_scale(x, result)?;
        if !parallel::should_split(result.len()) {
            kernels::scale(alpha, x, result);
            return Ok(());
        }
        let chunk_size = self.chunk_size;
        parallel::install(|| {
            result
                .par_chunks_mut(chunk_size)
                .zip(x.par_chunks(chunk_size))
                .for_each(|(out, input)| kernels::scale(alpha, input, out));
        });
        Ok(())
    }

    fn add_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        self.zip_with(x, y, result, |a, b| a + b)
    }

    fn subtract_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        self.zip_with(x, y, result, |a, b| a - b)
    }

    fn pointwise_multiply_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        self.zip_with(x, y, result, |a, b| a * b)
    }

    fn pointwise_divide_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        self.zip_with(x, y, result, |a, b| a / b)
    }

    fn matrix_norm(&self, norm: Norm, rows: usize, columns: usize, matrix: &[f32]) -> Result<f64> {
        kernels::validate_norm(rows, columns, matrix)?;
        if !parallel::should_split(matrix.len()) {
            return Ok(kernels::norm(norm, rows, matrix));
        }

        let value = parallel::install(|| match norm {
            Norm::OneNorm => matrix
                .par_chunks(rows)
                .map(kernels::column_abs_sum)
                .reduce(|| 0.0, f64::max),
            Norm::InfinityNorm => matrix
                .par_chunks(rows)
                .fold(
                    || vec![0.0f64; rows],
                    |mut sums, column| {
                        kernels::accumulate_row_abs(column, &mut sums);
                        sums
                    },
                )
                .reduce(
                    || vec![0.0f64; rows],
                    |mut left, right| {
                        left.iter_mut().zip(&right).for_each(|(l, r)| *l += r);
                        left
                    },
                )
                .into_iter()
                .fold(0.0, f64::max),
            Norm::FrobeniusNorm => matrix
                .par_chunks(self.chunk_size)
                .map(kernels::sum_of_squares)
                .sum::<f64>()
                .sqrt(),
        });
        Ok(value)
    }

    fn matrix_multiply_with_update(
        &self,
        transpose_a: Transpose,
        transpose_b: Transpose,
        alpha: f32,
        a: &[f32],
        a_rows: usize,
        a_columns: usize,
        b: &[f32],
        b_rows: usize,
        b_columns: usize,
        beta: f32,
        c: &mut [f32],
    ) -> Result<()> {
        let gemm = Gemm::validate(
            transpose_a, transpose_b, a, a_rows, a_columns, b, b_rows, b_columns, c,
        )?;

        let work = gemm.m.saturating_mul(gemm.n).saturating_mul(gemm.k);
        if gemm.n < 2 || !parallel::should_split(work) {
            gemm.columns(alpha, a, b, beta, 0, c);
            return Ok(());
        }

        let block = self.column_block;
        let block_len = gemm.m * block;
        parallel::install(|| {
            c.par_chunks_mut(block_len)
                .enumerate()
                .for_each(|(index, c_block)| gemm.columns(alpha, a, b, beta, index * block, c_block));
        });
        Ok(())
    }
}
