//! Compressed sparse row storage

use super::{Layout, LayoutMut, MatrixStorage};
use fmat_core::{
    validate_dimensions, validate_index, FmatError, Matrix, MatrixOperations, Result,
};
use hashbrown::HashSet;

/// CSR matrix: `values[k]` sits in column `column_indices[k]` of the row whose
/// range `row_offsets[row]..row_offsets[row + 1]` contains `k`
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    rows: usize,
    columns: usize,
    row_offsets: Vec<usize>,
    column_indices: Vec<usize>,
    values: Vec<f32>,
}

impl SparseMatrix {
    /// Matrix with no stored entries
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        validate_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            row_offsets: vec![0; rows + 1],
            column_indices: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Build from `(row, column, value)` triples
    ///
    /// Explicit zeros are dropped; a repeated position fails with
    /// [`FmatError::DuplicateEntry`].
    pub fn of_indexed<I>(rows: usize, columns: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f32)>,
    {
        validate_dimensions(rows, columns)?;
        let mut seen = HashSet::new();
        let mut triples = Vec::new();
        for (row, col, value) in entries {
            validate_index(row, col, (rows, columns))?;
            if !seen.insert((row, col)) {
                return Err(FmatError::DuplicateEntry);
            }
            if value != 0.0 {
                triples.push((row, col, value));
            }
        }
        Ok(Self::from_sorted_triples(rows, columns, triples))
    }

    /// Copy the non-zero entries of any matrix
    pub fn of_matrix<M: Matrix + ?Sized>(matrix: &M) -> Self {
        let (rows, columns) = matrix.dimensions();
        let mut triples = Vec::new();
        for row in 0..rows {
            for col in 0..columns {
                let value = matrix.at(row, col);
                if value != 0.0 {
                    triples.push((row, col, value));
                }
            }
        }
        Self::from_sorted_triples(rows, columns, triples)
    }

    fn from_sorted_triples(rows: usize, columns: usize, mut triples: Vec<(usize, usize, f32)>) -> Self {
        triples.sort_unstable_by_key(|&(row, col, _)| (row, col));

        let mut row_offsets = vec![0; rows + 1];
        for &(row, _, _) in &triples {
            row_offsets[row + 1] += 1;
        }
        for row in 0..rows {
            row_offsets[row + 1] += row_offsets[row];
        }

        Self {
            rows,
            columns,
            row_offsets,
            column_indices: triples.iter().map(|&(_, col, _)| col).collect(),
            values: triples.iter().map(|&(_, _, value)| value).collect(),
        }
    }

    /// Iterate stored entries as `(row, column, value)` in row order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        (0..self.rows).flat_map(move |row| {
            let range = self.row_offsets[row]..self.row_offsets[row + 1];
            self.column_indices[range.clone()]
                .iter()
                .zip(&self.values[range])
                .map(move |(&col, &value)| (row, col, value))
        })
    }

    /// Row offsets (length `rows + 1`)
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Column index of every stored value
    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    /// Stored values
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl Matrix for SparseMatrix {
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
        let range = self.row_offsets[row]..self.row_offsets[row + 1];
        match self.column_indices[range.clone()].binary_search(&col) {
            Ok(position) => self.values[range.start + position],
            Err(_) => 0.0,
        }
    }

    fn nnz(&self) -> usize {
        self.values.len()
    }
}

impl MatrixOperations for SparseMatrix {}

impl MatrixStorage for SparseMatrix {
    fn layout(&self) -> Layout<'_> {
        Layout::Sparse(self)
    }

    fn layout_mut(&mut self) -> LayoutMut<'_> {
        LayoutMut::Sparse(self)
    }

    fn assign_column_major(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != self.rows * self.columns {
            return Err(FmatError::DimensionMismatch);
        }
        let rows = self.rows;
        let triples = values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0.0)
            .map(|(index, &value)| (index % rows, index / rows, value))
            .collect();
        *self = Self::from_sorted_triples(self.rows, self.columns, triples);
        Ok(())
    }
}
