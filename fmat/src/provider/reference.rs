//! Sequential reference provider

use super::kernels::{self, Gemm};
use fmat_core::{LinearAlgebraProvider, Norm, Result, Transpose};

/// Straight-line implementation of every kernel on the calling thread
///
/// Useful as a correctness baseline and for callers that must not touch the
/// rayon pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceProvider;

impl ReferenceProvider {
    /// Create a reference provider
    pub const fn new() -> Self {
        Self
    }
}

impl LinearAlgebraProvider for ReferenceProvider {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn scale_array(&self, alpha: f32, x: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_scale(x, result)?;
        kernels::scale(alpha, x, result);
        Ok(())
    }

    fn add_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_zip(x, y, result)?;
        kernels::zip_with(x, y, result, |a, b| a + b);
        Ok(())
    }

    fn subtract_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_zip(x, y, result)?;
        kernels::zip_with(x, y, result, |a, b| a - b);
        Ok(())
    }

    fn pointwise_multiply_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_zip(x, y, result)?;
        kernels::zip_with(x, y, result, |a, b| a * b);
        Ok(())
    }

    fn pointwise_divide_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()> {
        kernels::validate_zip(x, y, result)?;
        kernels::zip_with(x, y, result, |a, b| a / b);
        Ok(())
    }

    fn matrix_norm(&self, norm: Norm, rows: usize, columns: usize, matrix: &[f32]) -> Result<f64> {
        kernels::validate_norm(rows, columns, matrix)?;
        Ok(kernels::norm(norm, rows, matrix))
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
        gemm.columns(alpha, a, b, beta, 0, c);
        Ok(())
    }
}
