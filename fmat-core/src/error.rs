//! Error types for matrix operations

/// Errors that can occur during matrix construction, arithmetic or factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FmatError {
    /// A row or column count below one, an overflowing element count, or a
    /// buffer whose length does not equal `rows * columns`
    InvalidDimension,
    /// Operands of a binary operation have incompatible shapes
    DimensionMismatch,
    /// An operator was invoked with a missing operand
    NullOperand,
    /// The operation is only defined for square matrices
    NotSquare,
    /// A row or column index is outside the matrix
    IndexOutOfBounds,
    /// The same (row, column) pair was supplied more than once
    DuplicateEntry,
    /// A write would store a value the target storage cannot represent,
    /// e.g. an off-diagonal non-zero in diagonal storage
    StructureViolation,
    /// A solve needs singular vectors the factorization did not compute
    VectorsNotComputed,
    /// A distribution parameter is outside its valid range
    InvalidParameter,
    /// Cholesky factorization of a matrix that is not symmetric positive definite
    NotPositiveDefinite,
    /// The matrix is singular or rank deficient
    Singular,
    /// The operation requires a symmetric matrix
    NotSymmetric,
    /// An iterative algorithm did not converge within its sweep limit
    NotConverged,
}

/// Broad classification of [`FmatError`] values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller violated a shape, index or operand contract
    Contract,
    /// The input was well-formed but numerically unsuitable
    Numerical,
}

impl FmatError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            FmatError::InvalidDimension
            | FmatError::DimensionMismatch
            | FmatError::NullOperand
            | FmatError::NotSquare
            | FmatError::IndexOutOfBounds
            | FmatError::DuplicateEntry
            | FmatError::StructureViolation
            | FmatError::VectorsNotComputed
            | FmatError::InvalidParameter => ErrorCategory::Contract,
            FmatError::NotPositiveDefinite
            | FmatError::Singular
            | FmatError::NotSymmetric
            | FmatError::NotConverged => ErrorCategory::Numerical,
        }
    }
}

impl core::fmt::Display for FmatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            FmatError::InvalidDimension => "Invalid matrix dimension",
            FmatError::DimensionMismatch => "Matrix dimensions do not match",
            FmatError::NullOperand => "Operand is missing",
            FmatError::NotSquare => "Matrix must be square",
            FmatError::IndexOutOfBounds => "Index out of bounds",
            FmatError::DuplicateEntry => "Duplicate matrix entry",
            FmatError::StructureViolation => "Value not representable by the target storage",
            FmatError::VectorsNotComputed => "Singular vectors were not computed",
            FmatError::InvalidParameter => "Invalid distribution parameter",
            FmatError::NotPositiveDefinite => "Matrix is not positive definite",
            FmatError::Singular => "Matrix is singular",
            FmatError::NotSymmetric => "Matrix must be symmetric",
            FmatError::NotConverged => "Algorithm did not converge",
        };
        write!(f, "{msg}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FmatError {}

/// Result type for matrix operations
pub type Result<T> = core::result::Result<T, FmatError>;
