//! Shape validation for construction and binary operations
//!
//! Pure functions with no allocation; every operation runs these before it
//! touches a result buffer.

use crate::{FmatError, Transpose};

/// Validate a `rows x columns` shape and return its element count
///
/// Both counts must be at least one and their product must not overflow.
pub const fn validate_dimensions(rows: usize, columns: usize) -> Result<usize, FmatError> {
    if rows == 0 || columns == 0 {
        return Err(FmatError::InvalidDimension);
    }
    match rows.checked_mul(columns) {
        Some(len) => Ok(len),
        None => Err(FmatError::InvalidDimension),
    }
}

/// Validate that a buffer of `len` values can back a `rows x columns` matrix
pub const fn validate_buffer_length(
    rows: usize,
    columns: usize,
    len: usize,
) -> Result<(), FmatError> {
    match validate_dimensions(rows, columns) {
        Ok(expected) if expected == len => Ok(()),
        Ok(_) => Err(FmatError::InvalidDimension),
        Err(err) => Err(err),
    }
}

/// Validate that two shapes are identical (element-wise operations)
pub const fn validate_same_shape(
    left: (usize, usize),
    right: (usize, usize),
) -> Result<(), FmatError> {
    if left.0 != right.0 || left.1 != right.1 {
        return Err(FmatError::DimensionMismatch);
    }
    Ok(())
}

/// Validate `op(left) * op(right)` and return the product's shape
pub const fn validate_product(
    transpose_left: Transpose,
    left: (usize, usize),
    transpose_right: Transpose,
    right: (usize, usize),
) -> Result<(usize, usize), FmatError> {
    let (left_rows, inner_left) = transpose_left.apply(left.0, left.1);
    let (inner_right, right_columns) = transpose_right.apply(right.0, right.1);
    if inner_left != inner_right {
        return Err(FmatError::DimensionMismatch);
    }
    Ok((left_rows, right_columns))
}

/// Validate that a shape is square
pub const fn validate_square(shape: (usize, usize)) -> Result<usize, FmatError> {
    if shape.0 != shape.1 {
        return Err(FmatError::NotSquare);
    }
    Ok(shape.0)
}

/// Validate that every array handed to an element-wise kernel has one length
pub const fn validate_array_lengths(x: usize, y: usize, result: usize) -> Result<(), FmatError> {
    if x != y || x != result {
        return Err(FmatError::DimensionMismatch);
    }
    Ok(())
}
