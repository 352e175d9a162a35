//! Storage layouts and the capability trait used for operand dispatch
//!
//! Dense operations inspect their operands through [`MatrixStorage::layout`]
//! and pick a kernel per layout pair: raw buffers when everything is dense, a
//! diagonal-aware loop when one operand is diagonal, and the generic
//! element-wise fallback otherwise.

pub mod column_major;
pub mod diagonal;
pub mod sparse;

pub use column_major::ColumnMajorStorage;
pub use diagonal::DiagonalMatrix;
pub use sparse::SparseMatrix;

use crate::dense::DenseMatrix;
use fmat_core::{MatrixOperations, Result};

/// Borrowed view of a matrix tagged with its storage layout
#[derive(Debug, Clone, Copy)]
pub enum Layout<'a> {
    Dense(&'a DenseMatrix),
    Diagonal(&'a DiagonalMatrix),
    Sparse(&'a SparseMatrix),
}

/// Mutable counterpart of [`Layout`], used for result targets
#[derive(Debug)]
pub enum LayoutMut<'a> {
    Dense(&'a mut DenseMatrix),
    Diagonal(&'a mut DiagonalMatrix),
    Sparse(&'a mut SparseMatrix),
}

impl Layout<'_> {
    /// Short layout name for log output
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Dense(_) => "dense",
            Layout::Diagonal(_) => "diagonal",
            Layout::Sparse(_) => "sparse",
        }
    }
}

/// A matrix whose concrete layout can be inspected and whose values can be
/// replaced wholesale
pub trait MatrixStorage: MatrixOperations {
    /// Borrow as a layout-tagged view
    fn layout(&self) -> Layout<'_>;

    /// Borrow mutably as a layout-tagged view
    fn layout_mut(&mut self) -> LayoutMut<'_>;

    /// Replace every element from a column-major slice
    ///
    /// The whole slice is validated first: a wrong length fails with
    /// `DimensionMismatch`, and a value the layout cannot represent fails with
    /// `StructureViolation`. On error the matrix is unchanged.
    fn assign_column_major(&mut self, values: &[f32]) -> Result<()>;
}
