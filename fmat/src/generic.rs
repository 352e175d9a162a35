//! Layout-agnostic fallback operations
//!
//! These read operands through [`Matrix::at`] and commit a complete
//! column-major result with [`MatrixStorage::assign_column_major`], so they
//! work for every combination of storage layouts. Dense operations route here
//! when neither operand layout has a dedicated kernel.

use crate::storage::MatrixStorage;
use fmat_core::{validate_product, validate_same_shape, FmatError, Matrix, Result, Transpose};

/// `result[i, j] = op(source[i, j])`
pub fn map<M, R, F>(source: &M, result: &mut R, op: F) -> Result<()>
where
    M: Matrix + ?Sized,
    R: MatrixStorage + ?Sized,
    F: Fn(f32) -> f32,
{
    validate_same_shape(source.dimensions(), result.dimensions())?;
    let values = collect_column_major(source.dimensions(), |row, col| op(source.at(row, col)));
    result.assign_column_major(&values)
}

/// `result[i, j] = op(left[i, j], right[i, j])`
pub fn zip<L, M, R, F>(left: &L, right: &M, result: &mut R, op: F) -> Result<()>
where
    L: Matrix + ?Sized,
    M: Matrix + ?Sized,
    R: MatrixStorage + ?Sized,
    F: Fn(f32, f32) -> f32,
{
    validate_same_shape(left.dimensions(), right.dimensions())?;
    validate_same_shape(left.dimensions(), result.dimensions())?;
    let values = collect_column_major(left.dimensions(), |row, col| {
        op(left.at(row, col), right.at(row, col))
    });
    result.assign_column_major(&values)
}

/// `result = op(left) * op(right)`, accumulated in `f64`
pub fn product<L, M, R>(
    transpose_left: Transpose,
    left: &L,
    transpose_right: Transpose,
    right: &M,
    result: &mut R,
) -> Result<()>
where
    L: Matrix + ?Sized,
    M: Matrix + ?Sized,
    R: MatrixStorage + ?Sized,
{
    let shape = validate_product(
        transpose_left,
        left.dimensions(),
        transpose_right,
        right.dimensions(),
    )?;
    if result.dimensions() != shape {
        return Err(FmatError::DimensionMismatch);
    }

    let inner = transpose_left.apply(left.row_count(), left.column_count()).1;
    let left_at = |row: usize, k: usize| match transpose_left {
        Transpose::NoTrans => left.at(row, k),
        Transpose::Trans => left.at(k, row),
    };
    let right_at = |k: usize, col: usize| match transpose_right {
        Transpose::NoTrans => right.at(k, col),
        Transpose::Trans => right.at(col, k),
    };

    let values = collect_column_major(shape, |row, col| {
        (0..inner)
            .map(|k| f64::from(left_at(row, k)) * f64::from(right_at(k, col)))
            .sum::<f64>() as f32
    });
    result.assign_column_major(&values)
}

fn collect_column_major<F>((rows, columns): (usize, usize), mut value: F) -> Vec<f32>
where
    F: FnMut(usize, usize) -> f32,
{
    let mut values = Vec::with_capacity(rows * columns);
    for col in 0..columns {
        for row in 0..rows {
            values.push(value(row, col));
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DiagonalMatrix, SparseMatrix};
    use fmat_core::MatrixOperations;

    #[test]
    fn test_zip_into_sparse() {
        let left = SparseMatrix::of_indexed(2, 2, vec![(0, 1, 2.0)]).unwrap();
        let right = DiagonalMatrix::of_square_diagonal(&[1.0, 3.0]).unwrap();
        let mut result = SparseMatrix::zeros(2, 2).unwrap();
        zip(&left, &right, &mut result, |a, b| a + b).unwrap();
        assert_eq!(result.to_row_major_vec(), vec![1.0, 2.0, 0.0, 3.0]);
        assert_eq!(result.nnz(), 3);
    }

    #[test]
    fn test_structure_checked_before_write() {
        let source = SparseMatrix::of_indexed(2, 2, vec![(1, 0, 4.0)]).unwrap();
        let mut result = DiagonalMatrix::identity(2).unwrap();
        assert_eq!(
            map(&source, &mut result, |v| v),
            Err(FmatError::StructureViolation)
        );
        assert_eq!(result.diagonal(), &[1.0, 1.0]);
    }

    #[test]
    fn test_product_shapes() {
        let left = SparseMatrix::of_indexed(2, 3, vec![(0, 0, 1.0), (1, 2, 2.0)]).unwrap();
        let right = DiagonalMatrix::of_diagonal(3, 2, &[5.0, 7.0]).unwrap();
        let mut result = SparseMatrix::zeros(2, 2).unwrap();
        product(Transpose::NoTrans, &left, Transpose::NoTrans, &right, &mut result).unwrap();
        assert_eq!(result.to_row_major_vec(), vec![5.0, 0.0, 0.0, 0.0]);

        let mut wrong = SparseMatrix::zeros(3, 3).unwrap();
        assert_eq!(
            product(Transpose::NoTrans, &left, Transpose::NoTrans, &right, &mut wrong),
            Err(FmatError::DimensionMismatch)
        );

        let mut transposed = SparseMatrix::zeros(3, 3).unwrap();
        product(Transpose::Trans, &left, Transpose::NoTrans, &left, &mut transposed).unwrap();
        assert_eq!(transposed.at(2, 2), 4.0);
        assert_eq!(transposed.at(0, 0), 1.0);
    }
}
