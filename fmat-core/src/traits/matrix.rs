//! Format-agnostic matrix access traits
//!
//! Every storage layout (dense column-major, diagonal, compressed sparse row)
//! implements [`Matrix`], which is all the generic fallback arithmetic needs
//! to read an operand regardless of how it is laid out.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Core matrix trait for layout-agnostic element access
pub trait Matrix {
    /// Get matrix dimensions as (rows, columns)
    fn dimensions(&self) -> (usize, usize);

    /// Get the element at `(row, col)`
    ///
    /// Positions that the storage does not hold explicitly read as zero.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    fn at(&self, row: usize, col: usize) -> f32;

    /// Number of explicitly stored values
    fn nnz(&self) -> usize;

    /// Number of rows
    fn row_count(&self) -> usize {
        self.dimensions().0
    }

    /// Number of columns
    fn column_count(&self) -> usize {
        self.dimensions().1
    }

    /// Whether the row and column counts are equal
    fn is_square(&self) -> bool {
        let (rows, columns) = self.dimensions();
        rows == columns
    }

    /// Bounds-checked element access
    ///
    /// Returns `None` if the position is out of range.
    fn get_element(&self, row: usize, col: usize) -> Option<f32> {
        let (rows, columns) = self.dimensions();
        if row < rows && col < columns {
            Some(self.at(row, col))
        } else {
            None
        }
    }
}

/// Extension trait for whole-row and whole-column reads (requires alloc feature)
#[cfg(feature = "alloc")]
pub trait MatrixOperations: Matrix {
    /// Get all elements of a row, in column order
    fn row(&self, row_index: usize) -> Vec<f32> {
        (0..self.column_count())
            .map(|col| self.at(row_index, col))
            .collect()
    }

    /// Get all elements of a column, in row order
    fn column(&self, col_index: usize) -> Vec<f32> {
        (0..self.row_count())
            .map(|row| self.at(row, col_index))
            .collect()
    }

    /// Copy every element out in column-major order
    fn to_column_major_vec(&self) -> Vec<f32> {
        let (rows, columns) = self.dimensions();
        let mut values = Vec::with_capacity(rows * columns);
        for col in 0..columns {
            for row in 0..rows {
                values.push(self.at(row, col));
            }
        }
        values
    }

    /// Copy every element out in row-major order
    fn to_row_major_vec(&self) -> Vec<f32> {
        let (rows, columns) = self.dimensions();
        let mut values = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                values.push(self.at(row, col));
            }
        }
        values
    }
}
