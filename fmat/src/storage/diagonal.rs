//! Diagonal storage: `min(rows, columns)` values, zero elsewhere

use super::{Layout, LayoutMut, MatrixStorage};
use fmat_core::{
    diagonal_length, validate_dimensions, validate_index, FmatError, Matrix, MatrixOperations,
    Result,
};

/// Matrix whose only stored values lie on the main diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalMatrix {
    rows: usize,
    columns: usize,
    diagonal: Vec<f32>,
}

impl DiagonalMatrix {
    /// All-zero diagonal matrix
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        validate_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            diagonal: vec![0.0; diagonal_length(rows, columns)],
        })
    }

    /// Square identity
    pub fn identity(order: usize) -> Result<Self> {
        validate_dimensions(order, order)?;
        Ok(Self {
            rows: order,
            columns: order,
            diagonal: vec![1.0; order],
        })
    }

    /// Diagonal matrix holding `diagonal`; it must have `min(rows, columns)` values
    pub fn of_diagonal(rows: usize, columns: usize, diagonal: &[f32]) -> Result<Self> {
        validate_dimensions(rows, columns)?;
        if diagonal.len() != diagonal_length(rows, columns) {
            return Err(FmatError::DimensionMismatch);
        }
        Ok(Self {
            rows,
            columns,
            diagonal: diagonal.to_vec(),
        })
    }

    /// Square diagonal matrix holding `diagonal`
    pub fn of_square_diagonal(diagonal: &[f32]) -> Result<Self> {
        Self::of_diagonal(diagonal.len(), diagonal.len(), diagonal)
    }

    /// The stored diagonal values
    pub fn diagonal(&self) -> &[f32] {
        &self.diagonal
    }

    /// Set element `(row, col)`
    ///
    /// Off-diagonal positions accept only zero.
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
        validate_index(row, col, (self.rows, self.columns))?;
        if row == col {
            self.diagonal[row] = value;
            Ok(())
        } else if value == 0.0 {
            Ok(())
        } else {
            Err(FmatError::StructureViolation)
        }
    }
}

impl Matrix for DiagonalMatrix {
    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    fn at(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.rows && col < self.columns,
            "index ({row}, {col}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        if row == col {
            self.diagonal[row]
        } else {
            0.0
        }
    }

    fn nnz(&self) -> usize {
        self.diagonal.len()
    }
}

impl MatrixOperations for DiagonalMatrix {}

impl MatrixStorage for DiagonalMatrix {
    fn layout(&self) -> Layout<'_> {
        Layout::Diagonal(self)
    }

    fn layout_mut(&mut self) -> LayoutMut<'_> {
        LayoutMut::Diagonal(self)
    }

    fn assign_column_major(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != self.rows * self.columns {
            return Err(FmatError::DimensionMismatch);
        }
        let rows = self.rows;
        let off_diagonal_nonzero = values
            .iter()
            .enumerate()
            .any(|(index, &value)| index % rows != index / rows && value != 0.0);
        if off_diagonal_nonzero {
            return Err(FmatError::StructureViolation);
        }
        for (i, value) in self.diagonal.iter_mut().enumerate() {
            *value = values[i * rows + i];
        }
        Ok(())
    }
}
