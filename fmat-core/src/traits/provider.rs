//! Numerical provider contract
//!
//! This module defines the batch kernels that dense matrix arithmetic hands
//! off to. It is a pure interface; concrete providers live in the `fmat`
//! crate and can be swapped at runtime without touching callers.

use crate::{Norm, Result, Transpose};

/// Batch array and matrix kernels over column-major `f32` buffers
///
/// Implementations must be reentrant: a single provider is shared by every
/// matrix in the process and may be called concurrently from parallel
/// partitions. Every method validates slice lengths and fails with
/// [`crate::FmatError::DimensionMismatch`] before writing anything.
pub trait LinearAlgebraProvider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// `result[i] = alpha * x[i]`
    fn scale_array(&self, alpha: f32, x: &[f32], result: &mut [f32]) -> Result<()>;

    /// `result[i] = x[i] + y[i]`
    fn add_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()>;

    /// `result[i] = x[i] - y[i]`
    fn subtract_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()>;

    /// `result[i] = x[i] * y[i]`
    fn pointwise_multiply_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()>;

    /// `result[i] = x[i] / y[i]`
    fn pointwise_divide_arrays(&self, x: &[f32], y: &[f32], result: &mut [f32]) -> Result<()>;

    /// Compute a norm of a `rows x columns` column-major matrix
    ///
    /// Accumulation happens in `f64` regardless of the element precision.
    fn matrix_norm(&self, norm: Norm, rows: usize, columns: usize, matrix: &[f32]) -> Result<f64>;

    /// `c = alpha * op(a) * op(b) + beta * c`
    ///
    /// `a` is stored `a_rows x a_columns` and `b` is stored
    /// `b_rows x b_columns`, both column-major; `op` transposes when the
    /// matching flag is [`Transpose::Trans`]. `c` must hold exactly
    /// `rows(op(a)) * columns(op(b))` values. With `beta == 0` the prior
    /// contents of `c` are ignored, even if they are NaN.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<()>;
}
