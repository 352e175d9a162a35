//! Sequential kernels shared by both providers
//!
//! The parallel provider splits its work into contiguous ranges and runs
//! these same kernels on each range, so both providers agree bit for bit on
//! element-wise operations.

use fmat_core::{validate_array_lengths, validate_buffer_length, FmatError, Norm, Result, Transpose};

/// Validated geometry of one `c = alpha * op(a) * op(b) + beta * c` call
#[derive(Debug, Clone, Copy)]
pub(crate) struct Gemm {
    pub transpose_a: Transpose,
    pub transpose_b: Transpose,
    pub a_rows: usize,
    pub b_rows: usize,
    /// Rows of `op(a)` and of `c`
    pub m: usize,
    /// Columns of `op(b)` and of `c`
    pub n: usize,
    /// Shared inner dimension
    pub k: usize,
}

impl Gemm {
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        transpose_a: Transpose,
        transpose_b: Transpose,
        a: &[f32],
        a_rows: usize,
        a_columns: usize,
        b: &[f32],
        b_rows: usize,
        b_columns: usize,
        c: &[f32],
    ) -> Result<Self> {
        validate_buffer_length(a_rows, a_columns, a.len()).map_err(|_| FmatError::DimensionMismatch)?;
        validate_buffer_length(b_rows, b_columns, b.len()).map_err(|_| FmatError::DimensionMismatch)?;

        let (m, k) = transpose_a.apply(a_rows, a_columns);
        let (inner, n) = transpose_b.apply(b_rows, b_columns);
        if k != inner || c.len() != m * n {
            return Err(FmatError::DimensionMismatch);
        }

        Ok(Self {
            transpose_a,
            transpose_b,
            a_rows,
            b_rows,
            m,
            n,
            k,
        })
    }

    /// Element `(l, j)` of `op(b)`
    #[inline]
    fn b_at(&self, b: &[f32], l: usize, j: usize) -> f32 {
        match self.transpose_b {
            Transpose::NoTrans => b[j * self.b_rows + l],
            Transpose::Trans => b[l * self.b_rows + j],
        }
    }

    /// Compute column `j` of the result into `c_col` (length `m`)
    pub fn column(&self, alpha: f32, a: &[f32], b: &[f32], beta: f32, j: usize, c_col: &mut [f32]) {
        if beta == 0.0 {
            c_col.fill(0.0);
        } else if beta != 1.0 {
            c_col.iter_mut().for_each(|value| *value *= beta);
        }
        if alpha == 0.0 {
            return;
        }

        match self.transpose_a {
            Transpose::NoTrans => {
                // axpy over the stored columns of a
                for l in 0..self.k {
                    let scale = alpha * self.b_at(b, l, j);
                    let a_col = &a[l * self.a_rows..l * self.a_rows + self.m];
                    for (out, &value) in c_col.iter_mut().zip(a_col) {
                        *out += scale * value;
                    }
                }
            }
            Transpose::Trans => {
                // row i of op(a) is stored column i of a
                for (i, out) in c_col.iter_mut().enumerate() {
                    let a_col = &a[i * self.a_rows..i * self.a_rows + self.k];
                    let dot: f32 = a_col
                        .iter()
                        .enumerate()
                        .map(|(l, &value)| value * self.b_at(b, l, j))
                        .sum();
                    *out += alpha * dot;
                }
            }
        }
    }

    /// Compute a run of whole result columns starting at `first_column`
    pub fn columns(&self, alpha: f32, a: &[f32], b: &[f32], beta: f32, first_column: usize, c: &mut [f32]) {
        if self.m == 0 {
            return;
        }
        for (offset, c_col) in c.chunks_mut(self.m).enumerate() {
            self.column(alpha, a, b, beta, first_column + offset, c_col);
        }
    }
}

pub(crate) fn scale(alpha: f32, x: &[f32], result: &mut [f32]) {
    for (out, &value) in result.iter_mut().zip(x) {
        *out = alpha * value;
    }
}

pub(crate) fn zip_with(x: &[f32], y: &[f32], result: &mut [f32], op: impl Fn(f32, f32) -> f32) {
    for ((out, &left), &right) in result.iter_mut().zip(x).zip(y) {
        *out = op(left, right);
    }
}

pub(crate) fn validate_zip(x: &[f32], y: &[f32], result: &[f32]) -> Result<()> {
    validate_array_lengths(x.len(), y.len(), result.len())
}

pub(crate) fn validate_scale(x: &[f32], result: &[f32]) -> Result<()> {
    validate_array_lengths(x.len(), x.len(), result.len())
}

/// Sum of absolute values of one column
pub(crate) fn column_abs_sum(column: &[f32]) -> f64 {
    column.iter().map(|&value| (value as f64).abs()).sum()
}

/// Sum of squares of a contiguous range
pub(crate) fn sum_of_squares(values: &[f32]) -> f64 {
    values
        .iter()
        .map(|&value| {
            let value = value as f64;
            value * value
        })
        .sum()
}

/// Add the absolute values of one column into per-row accumulators
pub(crate) fn accumulate_row_abs(column: &[f32], row_sums: &mut [f64]) {
    for (sum, &value) in row_sums.iter_mut().zip(column) {
        *sum += (value as f64).abs();
    }
}

/// Sequential matrix norm over a validated column-major buffer
pub(crate) fn norm(norm: Norm, rows: usize, matrix: &[f32]) -> f64 {
    match norm {
        Norm::OneNorm => matrix
            .chunks(rows)
            .map(column_abs_sum)
            .fold(0.0, f64::max),
        Norm::InfinityNorm => {
            let mut row_sums = vec![0.0f64; rows];
            for column in matrix.chunks(rows) {
                accumulate_row_abs(column, &mut row_sums);
            }
            row_sums.into_iter().fold(0.0, f64::max)
        }
        Norm::FrobeniusNorm => sum_of_squares(matrix).sqrt(),
    }
}

pub(crate) fn validate_norm(rows: usize, columns: usize, matrix: &[f32]) -> Result<()> {
    validate_buffer_length(rows, columns, matrix.len()).map_err(|_| FmatError::DimensionMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norms() {
        // [[1, -2], [3, 4]] column-major
        let m = [1.0, 3.0, -2.0, 4.0];
        assert_eq!(norm(Norm::OneNorm, 2, &m), 6.0);
        assert_eq!(norm(Norm::InfinityNorm, 2, &m), 7.0);
        assert!((norm(Norm::FrobeniusNorm, 2, &m) - 30f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_gemm_transposes() {
        // a = [[1, 2], [3, 4]], b = [[5, 6], [7, 8]] column-major
        let a = [1.0, 3.0, 2.0, 4.0];
        let b = [5.0, 7.0, 6.0, 8.0];
        let mut c = [f32::NAN; 4];

        let run = |ta, tb, c: &mut [f32]| {
            let gemm = Gemm::validate(ta, tb, &a, 2, 2, &b, 2, 2, c).unwrap();
            gemm.columns(1.0, &a, &b, 0.0, 0, c);
        };

        run(Transpose::NoTrans, Transpose::NoTrans, &mut c);
        // a*b = [[19, 22], [43, 50]]
        assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);

        run(Transpose::Trans, Transpose::NoTrans, &mut c);
        // a^T*b = [[26, 30], [38, 44]]
        assert_eq!(c, [26.0, 38.0, 30.0, 44.0]);

        run(Transpose::NoTrans, Transpose::Trans, &mut c);
        // a*b^T = [[17, 23], [39, 53]]
        assert_eq!(c, [17.0, 39.0, 23.0, 53.0]);
    }

    #[test]
    fn test_gemm_rejects_bad_shapes() {
        let a = [0.0; 6];
        let b = [0.0; 8];
        let c = [0.0; 8];
        assert_eq!(
            Gemm::validate(Transpose::NoTrans, Transpose::NoTrans, &a, 2, 3, &b, 4, 2, &c).err(),
            Some(FmatError::DimensionMismatch)
        );
    }
}
