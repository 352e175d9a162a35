//! Column-major index arithmetic

use crate::FmatError;

/// Flat offset of `(row, col)` in a column-major buffer with `rows` rows
#[inline]
pub const fn column_major_index(row: usize, col: usize, rows: usize) -> usize {
    col * rows + row
}

/// Validate `(row, col)` against a shape and return its column-major offset
pub const fn validate_index(
    row: usize,
    col: usize,
    shape: (usize, usize),
) -> Result<usize, FmatError> {
    if row >= shape.0 || col >= shape.1 {
        return Err(FmatError::IndexOutOfBounds);
    }
    Ok(column_major_index(row, col, shape.0))
}

/// Length of the main diagonal of a `rows x columns` matrix
#[inline]
pub const fn diagonal_length(rows: usize, columns: usize) -> usize {
    if rows < columns {
        rows
    } else {
        columns
    }
}
