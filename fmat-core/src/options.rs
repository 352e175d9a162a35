//! Option enums passed across the provider and factorization boundaries

/// Matrix norm selector for [`crate::LinearAlgebraProvider::matrix_norm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Norm {
    /// Maximum absolute column sum
    OneNorm,
    /// Maximum absolute row sum
    InfinityNorm,
    /// Square root of the sum of squared entries
    FrobeniusNorm,
}

/// Whether an operand of a matrix multiply is used as stored or transposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transpose {
    /// Use the operand as stored
    #[default]
    NoTrans,
    /// Use the transpose of the operand
    Trans,
}

impl Transpose {
    /// Shape of `op(A)` for a stored `rows x columns` operand
    pub const fn apply(self, rows: usize, columns: usize) -> (usize, usize) {
        match self {
            Transpose::NoTrans => (rows, columns),
            Transpose::Trans => (columns, rows),
        }
    }

    /// Returns true for [`Transpose::Trans`]
    pub const fn is_transposed(self) -> bool {
        matches!(self, Transpose::Trans)
    }
}

/// Shape of the factors produced by a QR factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QrMethod {
    /// `Q` is `m x m`, `R` is `m x n`
    #[default]
    Full,
    /// `Q` is `m x n`, `R` is `n x n`
    Thin,
}
