//! Dense column-major `f32` matrix
//!
//! [`DenseMatrix`] owns a [`ColumnMajorStorage`] and dispatches its arithmetic
//! per operand layout:
//!
//! - **dense operands, dense result**: backend kernel or flat loop over the
//!   raw buffers
//! - **diagonal operand, dense result**: copy and touch only the diagonal
//! - **anything else**: [`crate::generic`] element-wise fallback
//!
//! Every operation validates shapes before it writes to the result.

mod arithmetic;
mod multiply;
mod numerics;
mod operators;

use crate::buffer::SharedBuffer;
use crate::storage::{ColumnMajorStorage, Layout, LayoutMut, MatrixStorage};
use crate::vector::DenseVector;
use fmat_core::{
    column_major_index, validate_index, validate_square, ContinuousDistribution, FmatError,
    Matrix, MatrixOperations, Result,
};
use std::fmt;

/// Dense matrix stored in column-major order
///
/// `Clone` is a deep copy. Only [`DenseMatrix::bind`] and
/// [`DenseMatrix::share`] produce matrices that alias another buffer.
#[derive(Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "DenseMatrixData", into = "DenseMatrixData")
)]
pub struct DenseMatrix {
    storage: ColumnMajorStorage,
}

impl DenseMatrix {
    fn wrap(storage: Result<ColumnMajorStorage>) -> Result<Self> {
        storage.map(|storage| Self { storage })
    }

    /// Zero matrix
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::zeros(rows, columns))
    }

    /// Bind to `buffer` without copying
    ///
    /// The matrix shares `buffer` with the caller: writes through either
    /// handle are visible through both. `buffer.len()` must equal
    /// `rows * columns`.
    pub fn bind(rows: usize, columns: usize, buffer: SharedBuffer) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::bind(rows, columns, buffer))
    }

    /// Take ownership of a vector already in column-major order
    pub fn from_vec(rows: usize, columns: usize, values: Vec<f32>) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::from_vec(rows, columns, values))
    }

    /// Deep copy of a matrix in any storage layout
    pub fn of_matrix<M: MatrixStorage + ?Sized>(matrix: &M) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_matrix(matrix))
    }

    /// Copy a rectangular array indexed `[row][column]`
    pub fn of_array<const R: usize, const C: usize>(array: &[[f32; C]; R]) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_array(array))
    }

    /// Build from `(row, column, value)` triples; omitted positions are zero
    ///
    /// A repeated position fails with [`FmatError::DuplicateEntry`].
    pub fn of_indexed<I>(rows: usize, columns: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f32)>,
    {
        Self::wrap(ColumnMajorStorage::of_indexed(rows, columns, entries))
    }

    /// Copy a sequence already in column-major order
    pub fn of_column_major<I>(rows: usize, columns: usize, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        Self::wrap(ColumnMajorStorage::of_column_major(rows, columns, values))
    }

    /// Each inner sequence becomes one column
    pub fn of_columns<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = f32>,
    {
        Self::wrap(ColumnMajorStorage::of_columns(columns))
    }

    /// Each inner sequence becomes one row
    pub fn of_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = f32>,
    {
        Self::wrap(ColumnMajorStorage::of_rows(rows))
    }

    pub fn of_column_arrays(columns: &[&[f32]]) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_column_arrays(columns))
    }

    pub fn of_row_arrays(rows: &[&[f32]]) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_row_arrays(rows))
    }

    pub fn of_column_vectors(columns: &[DenseVector]) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_column_vectors(columns))
    }

    pub fn of_row_vectors(rows: &[DenseVector]) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_row_vectors(rows))
    }

    /// Square matrix with `diagonal` on the main diagonal
    pub fn of_diagonal_array(diagonal: &[f32]) -> Result<Self> {
        Self::of_diagonal_array_with_shape(diagonal.len(), diagonal.len(), diagonal)
    }

    /// `rows x columns` matrix with `diagonal` written from `(0, 0)`
    ///
    /// `diagonal` must hold `min(rows, columns)` values.
    pub fn of_diagonal_array_with_shape(
        rows: usize,
        columns: usize,
        diagonal: &[f32],
    ) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::of_diagonal(rows, columns, diagonal))
    }

    /// Square matrix with the vector's values on the main diagonal
    pub fn of_diagonal_vector(diagonal: &DenseVector) -> Result<Self> {
        Self::of_diagonal_array(&diagonal.values())
    }

    pub fn of_diagonal_vector_with_shape(
        rows: usize,
        columns: usize,
        diagonal: &DenseVector,
    ) -> Result<Self> {
        Self::of_diagonal_array_with_shape(rows, columns, &diagonal.values())
    }

    /// Every element set to `value`
    pub fn filled(rows: usize, columns: usize, value: f32) -> Result<Self> {
        Self::wrap(ColumnMajorStorage::filled(rows, columns, value))
    }

    /// Every element set by `init(row, column)`
    pub fn from_fn<F>(rows: usize, columns: usize, init: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        Self::wrap(ColumnMajorStorage::from_fn(rows, columns, init))
    }

    /// Diagonal set to `value`, zero elsewhere
    pub fn diagonal_filled(rows: usize, columns: usize, value: f32) -> Result<Self> {
        Self::diagonal_from_fn(rows, columns, |_| value)
    }

    /// Diagonal element `i` set by `init(i)`, zero elsewhere
    pub fn diagonal_from_fn<F>(rows: usize, columns: usize, init: F) -> Result<Self>
    where
        F: FnMut(usize) -> f32,
    {
        Self::wrap(ColumnMajorStorage::diagonal_from_fn(rows, columns, init))
    }

    /// Square identity matrix
    pub fn identity(order: usize) -> Result<Self> {
        Self::diagonal_filled(order, order, 1.0)
    }

    /// Every element drawn independently from `distribution`
    ///
    /// Samples are rounded to the nearest `f32`, so a sample just inside an
    /// open bound can land on the bound itself.
    pub fn random<D>(rows: usize, columns: usize, distribution: &mut D) -> Result<Self>
    where
        D: ContinuousDistribution + ?Sized,
    {
        Self::from_fn(rows, columns, |_, _| distribution.sample() as f32)
    }

    /// Assemble from column-major values whose shape is already validated
    pub(crate) fn from_parts(rows: usize, columns: usize, values: Vec<f32>) -> Self {
        Self {
            storage: ColumnMajorStorage::from_parts(rows, columns, SharedBuffer::new(values)),
        }
    }

    /// Zero matrix with the same shape as `self`
    pub(crate) fn zeros_like(&self) -> Self {
        Self {
            storage: self.storage.zeroed_like(),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.storage.rows()
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.storage.columns()
    }

    /// The column-major storage
    pub fn storage(&self) -> &ColumnMajorStorage {
        &self.storage
    }

    /// The element buffer handle
    pub fn buffer(&self) -> &SharedBuffer {
        self.storage.buffer()
    }

    /// A second matrix over the same buffer
    ///
    /// Passing the share as the result of an `*_into` operation updates
    /// `self` in place.
    pub fn share(&self) -> Self {
        Self {
            storage: self.storage.share(),
        }
    }

    /// Bounds-checked read
    pub fn get(&self, row: usize, col: usize) -> Result<f32> {
        let index = validate_index(row, col, self.dimensions())?;
        Ok(self.buffer().read()[index])
    }

    /// Bounds-checked write
    pub fn set(&self, row: usize, col: usize, value: f32) -> Result<()> {
        self.storage.set(row, col, value)
    }

    /// Overwrite row `row` with `values`
    pub fn set_row(&self, row: usize, values: &[f32]) -> Result<()> {
        if row >= self.rows() {
            return Err(FmatError::IndexOutOfBounds);
        }
        if values.len() != self.columns() {
            return Err(FmatError::DimensionMismatch);
        }
        let rows = self.rows();
        let mut data = self.buffer().write();
        for (col, &value) in values.iter().enumerate() {
            data[column_major_index(row, col, rows)] = value;
        }
        Ok(())
    }

    /// Overwrite column `col` with `values`
    pub fn set_column(&self, col: usize, values: &[f32]) -> Result<()> {
        if col >= self.columns() {
            return Err(FmatError::IndexOutOfBounds);
        }
        if values.len() != self.rows() {
            return Err(FmatError::DimensionMismatch);
        }
        let start = col * self.rows();
        self.buffer().write()[start..start + values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Main diagonal, `min(rows, columns)` values
    pub fn diagonal(&self) -> Vec<f32> {
        let rows = self.rows();
        let data = self.buffer().read();
        (0..rows.min(self.columns()))
            .map(|i| data[column_major_index(i, i, rows)])
            .collect()
    }

    /// Copy into a fixed-size array indexed `[row][column]`
    pub fn to_array<const R: usize, const C: usize>(&self) -> Result<[[f32; C]; R]> {
        if self.dimensions() != (R, C) {
            return Err(FmatError::DimensionMismatch);
        }
        let data = self.buffer().read();
        let mut array = [[0.0; C]; R];
        for (col, column) in data.chunks_exact(R).enumerate() {
            for (row, &value) in column.iter().enumerate() {
                array[row][col] = value;
            }
        }
        Ok(array)
    }

    /// New matrix with rows and columns swapped
    pub fn transpose(&self) -> DenseMatrix {
        let (rows, columns) = self.dimensions();
        let data = self.buffer().read();
        let mut values = vec![0.0; data.len()];
        for (col, column) in data.chunks_exact(rows).enumerate() {
            for (row, &value) in column.iter().enumerate() {
                values[column_major_index(col, row, columns)] = value;
            }
        }
        Self::from_parts(columns, rows, values)
    }

    /// Whether the matrix is square and equal to its transpose
    pub fn is_symmetric(&self) -> bool {
        let (rows, columns) = self.dimensions();
        if rows != columns {
            return false;
        }
        let data = self.buffer().read();
        (0..columns).all(|col| {
            (col + 1..rows).all(|row| {
                data[column_major_index(row, col, rows)] == data[column_major_index(col, row, rows)]
            })
        })
    }

    /// New matrix with `op` applied to every element
    pub fn map<F>(&self, op: F) -> DenseMatrix
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        let result = self.zeros_like();
        crate::buffer::map_into(self.buffer(), result.buffer(), |src, dst| {
            crate::parallel::map_elements(src, dst, op)
        });
        result
    }

    /// Apply `op` to every element in place
    pub fn map_inplace<F>(&self, op: F)
    where
        F: Fn(f32) -> f32,
    {
        self.buffer().write().iter_mut().for_each(|value| *value = op(*value));
    }

    /// Set every element to zero
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Sum of the main diagonal
    pub fn trace(&self) -> Result<f32> {
        let order = validate_square(self.dimensions())?;
        let data = self.buffer().read();
        Ok((0..order).map(|i| data[column_major_index(i, i, order)]).sum::<f32>())
    }
}

impl Matrix for DenseMatrix {
    fn dimensions(&self) -> (usize, usize) {
        (self.storage.rows(), self.storage.columns())
    }

    fn at(&self, row: usize, col: usize) -> f32 {
        self.storage.at(row, col)
    }

    fn nnz(&self) -> usize {
        self.buffer().len()
    }
}

impl MatrixOperations for DenseMatrix {
    fn column(&self, col_index: usize) -> Vec<f32> {
        let rows = self.rows();
        let start = col_index * rows;
        self.buffer().read()[start..start + rows].to_vec()
    }

    fn to_column_major_vec(&self) -> Vec<f32> {
        self.storage.to_vec()
    }

    fn to_row_major_vec(&self) -> Vec<f32> {
        self.transpose().storage.to_vec()
    }
}

impl MatrixStorage for DenseMatrix {
    fn layout(&self) -> Layout<'_> {
        Layout::Dense(self)
    }

    fn layout_mut(&mut self) -> LayoutMut<'_> {
        LayoutMut::Dense(self)
    }

    fn assign_column_major(&mut self, values: &[f32]) -> Result<()> {
        self.storage.copy_from_slice(values)
    }
}

impl Clone for DenseMatrix {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.deep_clone(),
        }
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        if self.dimensions() != other.dimensions() {
            return false;
        }
        if self.buffer().ptr_eq(other.buffer()) {
            return true;
        }
        *self.buffer().read() == *other.buffer().read()
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, columns) = self.dimensions();
        writeln!(f, "DenseMatrix {rows}x{columns}")?;
        let data = self.buffer().read();
        for row in 0..rows {
            for col in 0..columns {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>10.4}", data[column_major_index(row, col, rows)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serialized form of a [`DenseMatrix`]: shape plus column-major values
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct DenseMatrixData {
    rows: usize,
    columns: usize,
    data: Vec<f32>,
}

#[cfg(feature = "serde")]
impl From<DenseMatrix> for DenseMatrixData {
    fn from(matrix: DenseMatrix) -> Self {
        Self {
            rows: matrix.rows(),
            columns: matrix.columns(),
            data: matrix.to_column_major_vec(),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<DenseMatrixData> for DenseMatrix {
    type Error = FmatError;

    fn try_from(data: DenseMatrixData) -> Result<Self> {
        DenseMatrix::from_vec(data.rows, data.columns, data.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_trace() {
        let matrix = DenseMatrix::zeros(2, 3).unwrap();
        assert!(matrix.to_column_major_vec().iter().all(|&v| v == 0.0));
        assert_eq!(matrix.trace(), Err(FmatError::NotSquare));
        assert_eq!(DenseMatrix::identity(4).unwrap().trace(), Ok(4.0));
        assert_eq!(DenseMatrix::zeros(0, 1).err(), Some(FmatError::InvalidDimension));
    }

    #[test]
    fn test_transpose_and_array() {
        let matrix = DenseMatrix::of_array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let transposed = matrix.transpose();
        assert_eq!(transposed.dimensions(), (3, 2));
        assert_eq!(transposed.to_array::<3, 2>(), Ok([[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]));
        assert_eq!(transposed.transpose(), matrix);
        assert_eq!(matrix.to_row_major_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(matrix.to_array::<3, 2>().err(), Some(FmatError::DimensionMismatch));
    }

    #[test]
    fn test_rows_and_columns() {
        let matrix = DenseMatrix::zeros(2, 2).unwrap();
        matrix.set_row(0, &[1.0, 2.0]).unwrap();
        matrix.set_column(1, &[7.0, 8.0]).unwrap();
        assert_eq!(matrix.row(0), vec![1.0, 7.0]);
        assert_eq!(matrix.column(1), vec![7.0, 8.0]);
        assert_eq!(matrix.set_row(2, &[0.0, 0.0]), Err(FmatError::IndexOutOfBounds));
        assert_eq!(matrix.set_column(0, &[0.0]), Err(FmatError::DimensionMismatch));
        assert_eq!(matrix.get(1, 1), Ok(8.0));
        assert_eq!(matrix.get(1, 2), Err(FmatError::IndexOutOfBounds));
    }

    #[test]
    fn test_symmetry_and_diagonal() {
        let matrix = DenseMatrix::of_array(&[[1.0, 2.0], [2.0, 3.0]]).unwrap();
        assert!(matrix.is_symmetric());
        assert_eq!(matrix.diagonal(), vec![1.0, 3.0]);
        matrix.set(0, 1, 5.0).unwrap();
        assert!(!matrix.is_symmetric());
        assert!(!DenseMatrix::zeros(2, 3).unwrap().is_symmetric());
    }

    #[test]
    fn test_clone_is_deep_and_share_aliases() {
        let matrix = DenseMatrix::filled(2, 2, 1.0).unwrap();
        let copy = matrix.clone();
        let alias = matrix.share();
        alias.set(0, 0, 9.0).unwrap();
        assert_eq!(matrix.at(0, 0), 9.0);
        assert_eq!(copy.at(0, 0), 1.0);
    }

    #[test]
    fn test_map() {
        let matrix = DenseMatrix::of_column_major(1, 3, [1.0, -2.0, 3.0]).unwrap();
        assert_eq!(matrix.map(f32::abs).to_column_major_vec(), vec![1.0, 2.0, 3.0]);
        matrix.map_inplace(|v| v * 10.0);
        assert_eq!(matrix.to_column_major_vec(), vec![10.0, -20.0, 30.0]);
        matrix.clear();
        assert_eq!(matrix.to_column_major_vec(), vec![0.0; 3]);
    }

    #[test]
    fn test_display() {
        let matrix = DenseMatrix::of_array(&[[1.0, 2.0]]).unwrap();
        let text = matrix.to_string();
        assert!(text.starts_with("DenseMatrix 1x2"));
        assert!(text.contains("1.0000"));
    }
}
