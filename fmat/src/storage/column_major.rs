//! Dense column-major storage and its factory functions
//!
//! Element `(i, j)` of an `R x C` matrix lives at offset `j * R + i`. Every
//! factory except [`ColumnMajorStorage::bind`] copies its input into a new
//! buffer owned exclusively by the storage.

use super::{Layout, MatrixStorage};
use crate::buffer::SharedBuffer;
use crate::vector::DenseVector;
use fmat_core::{
    column_major_index, diagonal_length, validate_buffer_length, validate_dimensions,
    validate_index, FmatError, Result,
};
use hashbrown::HashSet;

/// Flat column-major buffer with a fixed shape
#[derive(Debug)]
pub struct ColumnMajorStorage {
    rows: usize,
    columns: usize,
    data: SharedBuffer,
}

impl ColumnMajorStorage {
    /// Zero-filled storage
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        let len = validate_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            data: SharedBuffer::zeroed(len),
        })
    }

    /// Bind to `buffer` without copying
    ///
    /// The storage shares the allocation with every other handle to
    /// `buffer`; writes through any of them are visible to all.
    pub fn bind(rows: usize, columns: usize, buffer: SharedBuffer) -> Result<Self> {
        validate_buffer_length(rows, columns, buffer.len())?;
        Ok(Self {
            rows,
            columns,
            data: buffer,
        })
    }

    /// Assemble from a buffer whose length is already known to match
    pub(crate) fn from_parts(rows: usize, columns: usize, data: SharedBuffer) -> Self {
        debug_assert_eq!(data.len(), rows * columns);
        Self {
            rows,
            columns,
            data,
        }
    }

    /// Take ownership of an already column-major vector
    pub fn from_vec(rows: usize, columns: usize, values: Vec<f32>) -> Result<Self> {
        validate_buffer_length(rows, columns, values.len())?;
        Ok(Self {
            rows,
            columns,
            data: SharedBuffer::new(values),
        })
    }

    /// Deep copy of any storage layout
    pub fn of_matrix<M: MatrixStorage + ?Sized>(matrix: &M) -> Result<Self> {
        let (rows, columns) = matrix.dimensions();
        match matrix.layout() {
            Layout::Dense(dense) => Self::from_vec(rows, columns, dense.storage().to_vec()),
            Layout::Diagonal(diagonal) => Self::of_diagonal(rows, columns, diagonal.diagonal()),
            Layout::Sparse(sparse) => {
                let mut values = vec![0.0; validate_dimensions(rows, columns)?];
                for (row, col, value) in sparse.entries() {
                    values[column_major_index(row, col, rows)] = value;
                }
                Self::from_vec(rows, columns, values)
            }
        }
    }

    /// Copy a rectangular array indexed `[row][column]`
    pub fn of_array<const R: usize, const C: usize>(array: &[[f32; C]; R]) -> Result<Self> {
        Self::from_fn(R, C, |row, col| array[row][col])
    }

    /// Build from `(row, column, value)` triples; positions not mentioned are zero
    ///
    /// A position that appears twice fails with [`FmatError::DuplicateEntry`]
    /// rather than silently keeping one of the values.
    pub fn of_indexed<I>(rows: usize, columns: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f32)>,
    {
        let len = validate_dimensions(rows, columns)?;
        let mut values = vec![0.0; len];
        let mut seen = HashSet::new();
        for (row, col, value) in entries {
            let index = validate_index(row, col, (rows, columns))?;
            if !seen.insert(index) {
                return Err(FmatError::DuplicateEntry);
            }
            values[index] = value;
        }
        Self::from_vec(rows, columns, values)
    }

    /// Copy a sequence that is already in column-major order
    pub fn of_column_major<I>(rows: usize, columns: usize, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        validate_dimensions(rows, columns)?;
        Self::from_vec(rows, columns, values.into_iter().collect())
    }

    /// Each inner sequence is one column
    pub fn of_columns<I, C>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = f32>,
    {
        let (major, minor, values) = collect_lines(columns)?;
        // major = column count, minor = row count
        Self::from_vec(minor, major, values)
    }

    /// Each inner sequence is one row
    pub fn of_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = f32>,
    {
        let (row_count, column_count, row_major) = collect_lines(rows)?;
        Self::from_fn(row_count, column_count, |row, col| {
            row_major[row * column_count + col]
        })
    }

    /// Each slice is one column
    pub fn of_column_arrays(columns: &[&[f32]]) -> Result<Self> {
        Self::of_columns(columns.iter().map(|column| column.iter().copied()))
    }

    /// Each slice is one row
    pub fn of_row_arrays(rows: &[&[f32]]) -> Result<Self> {
        Self::of_rows(rows.iter().map(|row| row.iter().copied()))
    }

    /// Each vector becomes one column
    pub fn of_column_vectors(columns: &[DenseVector]) -> Result<Self> {
        Self::of_columns(columns.iter().map(|column| column.to_vec()))
    }

    /// Each vector becomes one row
    pub fn of_row_vectors(rows: &[DenseVector]) -> Result<Self> {
        Self::of_rows(rows.iter().map(|row| row.to_vec()))
    }

    /// Zero storage with `diagonal` written from `(0, 0)`
    ///
    /// `diagonal` must hold exactly `min(rows, columns)` values.
    pub fn of_diagonal(rows: usize, columns: usize, diagonal: &[f32]) -> Result<Self> {
        validate_dimensions(rows, columns)?;
        if diagonal.len() != diagonal_length(rows, columns) {
            return Err(FmatError::DimensionMismatch);
        }
        Self::diagonal_from_fn(rows, columns, |i| diagonal[i])
    }

    /// Every element set to `value`
    pub fn filled(rows: usize, columns: usize, value: f32) -> Result<Self> {
        if value == 0.0 {
            return Self::zeros(rows, columns);
        }
        let len = validate_dimensions(rows, columns)?;
        Self::from_vec(rows, columns, vec![value; len])
    }

    /// Every element set by `init(row, column)`
    pub fn from_fn<F>(rows: usize, columns: usize, mut init: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let len = validate_dimensions(rows, columns)?;
        let mut values = Vec::with_capacity(len);
        for col in 0..columns {
            for row in 0..rows {
                values.push(init(row, col));
            }
        }
        Self::from_vec(rows, columns, values)
    }

    /// Diagonal element `i` set by `init(i)`, everything else zero
    pub fn diagonal_from_fn<F>(rows: usize, columns: usize, mut init: F) -> Result<Self>
    where
        F: FnMut(usize) -> f32,
    {
        let storage = Self::zeros(rows, columns)?;
        {
            let mut values = storage.data.write();
            for i in 0..diagonal_length(rows, columns) {
                values[column_major_index(i, i, rows)] = init(i);
            }
        }
        Ok(storage)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The underlying buffer handle
    pub fn buffer(&self) -> &SharedBuffer {
        &self.data
    }

    /// Copy the values out in column-major order
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.to_vec()
    }

    /// Element at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.rows && col < self.columns,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        self.data.read()[column_major_index(row, col, self.rows)]
    }

    /// Overwrite the element at `(row, col)`
    pub fn set(&self, row: usize, col: usize, value: f32) -> Result<()> {
        let index = validate_index(row, col, (self.rows, self.columns))?;
        self.data.write()[index] = value;
        Ok(())
    }

    /// Overwrite every element from a column-major slice of the same length
    pub fn copy_from_slice(&self, values: &[f32]) -> Result<()> {
        if values.len() != self.data.len() {
            return Err(FmatError::DimensionMismatch);
        }
        self.data.write().copy_from_slice(values);
        Ok(())
    }

    /// Set every element to zero
    pub fn clear(&self) {
        self.data.write().fill(0.0);
    }

    /// Zero storage with the same shape
    pub fn zeroed_like(&self) -> Self {
        Self::from_parts(self.rows, self.columns, SharedBuffer::zeroed(self.data.len()))
    }

    /// Second handle over the same buffer
    pub fn share(&self) -> Self {
        Self::from_parts(self.rows, self.columns, self.data.clone())
    }

    /// Copy into a new, unshared buffer with the same shape
    pub fn deep_clone(&self) -> Self {
        Self {
            rows: self.rows,
            columns: self.columns,
            data: self.data.deep_clone(),
        }
    }
}

/// Collect a sequence of equal-length lines into one flat vector
///
/// Returns `(line count, line length, values)`.
fn collect_lines<I, L>(lines: I) -> Result<(usize, usize, Vec<f32>)>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = f32>,
{
    let mut values = Vec::new();
    let mut line_count = 0;
    let mut line_length = None;
    for line in lines {
        let start = values.len();
        values.extend(line);
        let len = values.len() - start;
        match line_length {
            None => line_length = Some(len),
            Some(expected) if expected != len => return Err(FmatError::DimensionMismatch),
            Some(_) => {}
        }
        line_count += 1;
    }
    let line_length = line_length.unwrap_or(0);
    validate_dimensions(line_count, line_length)?;
    Ok((line_count, line_length, values))
}
