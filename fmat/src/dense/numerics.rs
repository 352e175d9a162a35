//! Norms and other scalar summaries

use super::DenseMatrix;
use crate::control;
use fmat_core::{validate_square, Matrix, Norm, Result};

impl DenseMatrix {
    fn norm(&self, norm: Norm) -> Result<f64> {
        let (rows, columns) = self.dimensions();
        let data = self.buffer().read();
        control::provider().matrix_norm(norm, rows, columns, &data)
    }

    /// Maximum absolute column sum
    pub fn l1_norm(&self) -> Result<f64> {
        self.norm(Norm::OneNorm)
    }

    /// Maximum absolute row sum
    pub fn infinity_norm(&self) -> Result<f64> {
        self.norm(Norm::InfinityNorm)
    }

    /// Square root of the sum of squared elements
    pub fn frobenius_norm(&self) -> Result<f64> {
        self.norm(Norm::FrobeniusNorm)
    }

    /// Largest singular value
    pub fn l2_norm(&self) -> Result<f64> {
        Ok(self.svd(false)?.l2_norm())
    }

    /// Ratio of the largest to the smallest singular value
    pub fn condition_number(&self) -> Result<f64> {
        Ok(self.svd(false)?.condition_number())
    }

    /// Determinant of a square matrix, via LU
    pub fn determinant(&self) -> Result<f64> {
        validate_square(self.dimensions())?;
        Ok(self.lu()?.determinant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmat_core::FmatError;

    #[test]
    fn test_norms() {
        let matrix = DenseMatrix::of_array(&[[1.0, -2.0], [-3.0, 4.0]]).unwrap();
        assert_eq!(matrix.l1_norm(), Ok(6.0));
        assert_eq!(matrix.infinity_norm(), Ok(7.0));
        assert!((matrix.frobenius_norm().unwrap() - 30f64.sqrt()).abs() < 1e-12);
        let l2 = matrix.l2_norm().unwrap();
        assert!(l2 <= matrix.frobenius_norm().unwrap() + 1e-9);
        assert!(l2 >= matrix.l1_norm().unwrap() / 2f64.sqrt() - 1e-9);
    }

    #[test]
    fn test_determinant() {
        let matrix = DenseMatrix::of_array(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert!((matrix.determinant().unwrap() - -2.0).abs() < 1e-9);
        assert_eq!(
            DenseMatrix::zeros(1, 2).unwrap().determinant(),
            Err(FmatError::NotSquare)
        );
        assert!((DenseMatrix::identity(3).unwrap().condition_number().unwrap() - 1.0).abs() < 1e-12);
    }
}
