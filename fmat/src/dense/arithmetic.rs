//! Element-wise and scalar arithmetic with layout dispatch

use super::DenseMatrix;
use crate::buffer;
use crate::control;
use crate::generic;
use crate::parallel;
use crate::storage::{DiagonalMatrix, Layout, LayoutMut, MatrixStorage};
use fmat_core::{column_major_index, validate_same_shape, Matrix, Result};

/// Canonical modulus: the result takes the sign of the divisor
pub(crate) fn modulus(dividend: f32, divisor: f32) -> f32 {
    dividend - divisor * (dividend / divisor).floor()
}

/// Truncated remainder: the result takes the sign of the dividend
pub(crate) fn remainder(dividend: f32, divisor: f32) -> f32 {
    dividend % divisor
}

/// How a dense result handles a diagonal right operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagonalPath {
    /// Copy `self`, then combine the diagonal positions
    CopyAndCombine,
    /// Zero the result, then combine the diagonal positions
    DiagonalOnly,
    /// No shortcut; use the generic fallback
    Generic,
}

impl DenseMatrix {
    /// `result = op(self)`
    fn unary_into<R, K, F>(&self, name: &str, result: &mut R, fast: K, op: F) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
        K: FnOnce(&[f32], &mut [f32]) -> Result<()>,
        F: Fn(f32) -> f32,
    {
        validate_same_shape(self.dimensions(), result.dimensions())?;
        if let LayoutMut::Dense(target) = result.layout_mut() {
            return buffer::map_into(self.buffer(), target.buffer(), fast);
        }
        log::debug!("{name}: generic path for {} result", result.layout().name());
        generic::map(self, result, op)
    }

    /// `result = op(self, other)`
    fn binary_into<M, R, K, F>(
        &self,
        name: &str,
        other: &M,
        result: &mut R,
        diagonal_path: DiagonalPath,
        fast: K,
        op: F,
    ) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
        K: FnOnce(&[f32], &[f32], &mut [f32]) -> Result<()>,
        F: Fn(f32, f32) -> f32,
    {
        validate_same_shape(self.dimensions(), other.dimensions())?;
        validate_same_shape(self.dimensions(), result.dimensions())?;

        let operand = other.layout();
        if let LayoutMut::Dense(target) = result.layout_mut() {
            match operand {
                Layout::Dense(right) => {
                    return buffer::zip_into(self.buffer(), right.buffer(), target.buffer(), fast);
                }
                Layout::Diagonal(diagonal) if diagonal_path != DiagonalPath::Generic => {
                    log::debug!("{name}: diagonal operand");
                    self.combine_diagonal(
                        diagonal,
                        target,
                        diagonal_path == DiagonalPath::DiagonalOnly,
                        op,
                    );
                    return Ok(());
                }
                _ => {}
            }
        }
        log::debug!(
            "{name}: generic path for {} operand, {} result",
            operand.name(),
            result.layout().name()
        );
        generic::zip(self, other, result, op)
    }

    fn combine_diagonal<F>(
        &self,
        diagonal: &DiagonalMatrix,
        target: &DenseMatrix,
        clear_off_diagonal: bool,
        op: F,
    ) where
        F: Fn(f32, f32) -> f32,
    {
        let rows = self.rows();
        buffer::map_into(self.buffer(), target.buffer(), |src, dst| {
            if clear_off_diagonal {
                dst.fill(0.0);
            } else {
                dst.copy_from_slice(src);
            }
            for (i, &value) in diagonal.diagonal().iter().enumerate() {
                let index = column_major_index(i, i, rows);
                dst[index] = op(src[index], value);
            }
        });
    }

    /// Apply a scalar broadcast through the chunked parallel map
    fn broadcast_into<R, F>(&self, name: &str, result: &mut R, op: F) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
        F: Fn(f32) -> f32 + Sync + Send + Copy,
    {
        self.unary_into(
            name,
            result,
            |src, dst| {
                parallel::map_chunked(src, dst, op);
                Ok(())
            },
            op,
        )
    }

    fn scale_into<R>(&self, name: &str, alpha: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.unary_into(
            name,
            result,
            |src, dst| control::provider().scale_array(alpha, src, dst),
            |value| alpha * value,
        )
    }

    /// Run an `*_into` operation into a fresh matrix shaped like `self`
    fn allocate<F>(&self, op: F) -> Result<DenseMatrix>
    where
        F: FnOnce(&mut DenseMatrix) -> Result<()>,
    {
        let mut result = self.zeros_like();
        op(&mut result)?;
        Ok(result)
    }

    /// `-self`
    pub fn negate(&self) -> Result<DenseMatrix> {
        self.allocate(|result| self.negate_into(result))
    }

    pub fn negate_into<R: MatrixStorage + ?Sized>(&self, result: &mut R) -> Result<()> {
        self.scale_into("negate", -1.0, result)
    }

    /// `self + scalar` for every element
    pub fn add_scalar(&self, scalar: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.add_scalar_into(scalar, result))
    }

    pub fn add_scalar_into<R>(&self, scalar: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("add_scalar", result, move |value| value + scalar)
    }

    /// `self - scalar` for every element
    pub fn subtract_scalar(&self, scalar: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.subtract_scalar_into(scalar, result))
    }

    pub fn subtract_scalar_into<R>(&self, scalar: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("subtract_scalar", result, move |value| value - scalar)
    }

    /// `scalar - self` for every element
    pub fn subtract_from_scalar(&self, scalar: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.subtract_from_scalar_into(scalar, result))
    }

    pub fn subtract_from_scalar_into<R>(&self, scalar: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("subtract_from_scalar", result, move |value| scalar - value)
    }

    /// `scalar * self`
    pub fn multiply_scalar(&self, scalar: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.multiply_scalar_into(scalar, result))
    }

    pub fn multiply_scalar_into<R>(&self, scalar: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        if scalar == 1.0 {
            return self.unary_into(
                "multiply_scalar",
                result,
                |src, dst| {
                    dst.copy_from_slice(src);
                    Ok(())
                },
                |value| value,
            );
        }
        self.scale_into("multiply_scalar", scalar, result)
    }

    /// `self / scalar`
    pub fn divide_scalar(&self, scalar: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.divide_scalar_into(scalar, result))
    }

    pub fn divide_scalar_into<R>(&self, scalar: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.multiply_scalar_into(1.0 / scalar, result)
    }

    /// Canonical modulus of every element by `divisor`
    pub fn modulus(&self, divisor: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.modulus_into(divisor, result))
    }

    pub fn modulus_into<R>(&self, divisor: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("modulus", result, move |value| modulus(value, divisor))
    }

    /// Canonical modulus of `dividend` by every element
    pub fn modulus_by(&self, dividend: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.modulus_by_into(dividend, result))
    }

    pub fn modulus_by_into<R>(&self, dividend: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("modulus_by", result, move |value| modulus(dividend, value))
    }

    /// Truncated remainder of every element by `divisor`
    pub fn remainder(&self, divisor: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.remainder_into(divisor, result))
    }

    pub fn remainder_into<R>(&self, divisor: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("remainder", result, move |value| remainder(value, divisor))
    }

    /// Truncated remainder of `dividend` by every element
    pub fn remainder_by(&self, dividend: f32) -> Result<DenseMatrix> {
        self.allocate(|result| self.remainder_by_into(dividend, result))
    }

    pub fn remainder_by_into<R>(&self, dividend: f32, result: &mut R) -> Result<()>
    where
        R: MatrixStorage + ?Sized,
    {
        self.broadcast_into("remainder_by", result, move |value| remainder(dividend, value))
    }

    /// `self + other`
    pub fn add<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.allocate(|result| self.add_into(other, result))
    }

    pub fn add_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "add",
            other,
            result,
            DiagonalPath::CopyAndCombine,
            |a, b, c| control::provider().add_arrays(a, b, c),
            |a, b| a + b,
        )
    }

    /// `self - other`
    pub fn subtract<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.allocate(|result| self.subtract_into(other, result))
    }

    pub fn subtract_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "subtract",
            other,
            result,
            DiagonalPath::CopyAndCombine,
            |a, b, c| control::provider().subtract_arrays(a, b, c),
            |a, b| a - b,
        )
    }

    /// Element-wise (Hadamard) product
    pub fn pointwise_multiply<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.allocate(|result| self.pointwise_multiply_into(other, result))
    }

    /// Element-wise product into `result`
    ///
    /// With a diagonal operand every off-diagonal product is zero, so only
    /// the diagonal positions are computed.
    pub fn pointwise_multiply_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "pointwise_multiply",
            other,
            result,
            DiagonalPath::DiagonalOnly,
            |a, b, c| control::provider().pointwise_multiply_arrays(a, b, c),
            |a, b| a * b,
        )
    }

    /// Element-wise quotient
    pub fn pointwise_divide<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.allocate(|result| self.pointwise_divide_into(other, result))
    }

    pub fn pointwise_divide_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "pointwise_divide",
            other,
            result,
            DiagonalPath::Generic,
            |a, b, c| control::provider().pointwise_divide_arrays(a, b, c),
            |a, b| a / b,
        )
    }

    /// Element-wise canonical modulus
    pub fn pointwise_modulus<M: MatrixStorage + ?Sized>(&self, other: &M) -> Result<DenseMatrix> {
        self.allocate(|result| self.pointwise_modulus_into(other, result))
    }

    pub fn pointwise_modulus_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "pointwise_modulus",
            other,
            result,
            DiagonalPath::Generic,
            |a, b, c| {
                parallel::zip_elements(a, b, c, modulus);
                Ok(())
            },
            modulus,
        )
    }

    /// Element-wise truncated remainder
    pub fn pointwise_remainder<M: MatrixStorage + ?Sized>(
        &self,
        other: &M,
    ) -> Result<DenseMatrix> {
        self.allocate(|result| self.pointwise_remainder_into(other, result))
    }

    pub fn pointwise_remainder_into<M, R>(&self, other: &M, result: &mut R) -> Result<()>
    where
        M: MatrixStorage + ?Sized,
        R: MatrixStorage + ?Sized,
    {
        self.binary_into(
            "pointwise_remainder",
            other,
            result,
            DiagonalPath::Generic,
            |a, b, c| {
                parallel::zip_elements(a, b, c, remainder);
                Ok(())
            },
            remainder,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SparseMatrix;
    use fmat_core::{FmatError, MatrixOperations};

    fn sample() -> DenseMatrix {
        DenseMatrix::of_array(&[[1.0, -2.0, 3.0], [-4.0, 5.0, -6.0], [7.0, -8.0, 9.0]]).unwrap()
    }

    #[test]
    fn test_modulus_and_remainder_differ() {
        assert_eq!(modulus(-1.0, 3.0), 2.0);
        assert_eq!(remainder(-1.0, 3.0), -1.0);
        assert_eq!(modulus(1.0, -3.0), -2.0);
        assert_eq!(remainder(1.0, -3.0), 1.0);

        let matrix = DenseMatrix::filled(2, 2, -1.0).unwrap();
        assert_eq!(matrix.modulus(3.0).unwrap().to_column_major_vec(), vec![2.0; 4]);
        assert_eq!(matrix.remainder(3.0).unwrap().to_column_major_vec(), vec![-1.0; 4]);
        assert_eq!(matrix.modulus_by(3.0).unwrap().to_column_major_vec(), vec![0.0; 4]);
        assert_eq!(matrix.remainder_by(2.5).unwrap().to_column_major_vec(), vec![0.5; 4]);
    }

    #[test]
    fn test_scalar_operations() {
        let matrix = sample();
        assert_eq!(matrix.add_scalar(1.0).unwrap().at(0, 1), -1.0);
        assert_eq!(matrix.subtract_scalar(1.0).unwrap().at(2, 2), 8.0);
        assert_eq!(matrix.subtract_from_scalar(10.0).unwrap().at(1, 0), 14.0);
        assert_eq!(matrix.multiply_scalar(2.0).unwrap().at(2, 1), -16.0);
        assert_eq!(matrix.divide_scalar(2.0).unwrap().at(0, 0), 0.5);
        assert_eq!(matrix.negate().unwrap().at(1, 1), -5.0);
    }

    #[test]
    fn test_add_negation_is_zero() {
        let matrix = sample();
        let sum = matrix.add(&matrix.negate().unwrap()).unwrap();
        assert!(sum.to_column_major_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_diagonal_operand() {
        let ones = DenseMatrix::filled(3, 3, 1.0).unwrap();
        let diagonal = DiagonalMatrix::of_square_diagonal(&[1.0, 2.0, 3.0]).unwrap();

        let sum = ones.add(&diagonal).unwrap();
        assert_eq!(sum.to_array::<3, 3>(), Ok([[2.0, 1.0, 1.0], [1.0, 3.0, 1.0], [1.0, 1.0, 4.0]]));

        let difference = ones.subtract(&diagonal).unwrap();
        assert_eq!(difference.diagonal(), vec![0.0, -1.0, -2.0]);
        assert_eq!(difference.at(0, 2), 1.0);

        let product = ones.pointwise_multiply(&diagonal).unwrap();
        assert_eq!(product.to_array::<3, 3>(), Ok([[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]]));
    }

    #[test]
    fn test_sparse_operand_and_result() {
        let matrix = sample();
        let sparse = SparseMatrix::of_indexed(3, 3, vec![(0, 0, 1.0), (2, 1, 8.0)]).unwrap();
        let sum = matrix.add(&sparse).unwrap();
        assert_eq!(sum.at(0, 0), 2.0);
        assert_eq!(sum.at(2, 1), 0.0);

        let mut target = SparseMatrix::zeros(3, 3).unwrap();
        matrix.pointwise_multiply_into(&sparse, &mut target).unwrap();
        assert_eq!(target.nnz(), 2);
        assert_eq!(target.at(2, 1), -64.0);

        let mut diagonal = DiagonalMatrix::zeros(3, 3).unwrap();
        assert_eq!(
            matrix.add_scalar_into(1.0, &mut diagonal),
            Err(FmatError::StructureViolation)
        );
    }

    #[test]
    fn test_shape_checked_before_write() {
        let matrix = sample();
        let other = DenseMatrix::zeros(2, 3).unwrap();
        let mut result = DenseMatrix::filled(3, 3, 7.0).unwrap();
        assert_eq!(matrix.add_into(&other, &mut result), Err(FmatError::DimensionMismatch));
        assert_eq!(result.to_column_major_vec(), vec![7.0; 9]);
        assert_eq!(matrix.add(&other).err(), Some(FmatError::DimensionMismatch));
    }

    #[test]
    fn test_result_aliases_operand() {
        let matrix = sample();
        let mut alias = matrix.share();
        matrix.add_into(&matrix.clone(), &mut alias).unwrap();
        assert_eq!(matrix.at(2, 2), 18.0);

        let other = DenseMatrix::filled(3, 3, 2.0).unwrap();
        let mut alias = other.share();
        matrix.pointwise_multiply_into(&other, &mut alias).unwrap();
        assert_eq!(other.at(0, 0), 4.0);
    }

    #[test]
    fn test_pointwise_modulus_and_remainder() {
        let dividend = DenseMatrix::filled(2, 2, -1.0).unwrap();
        let divisor = DenseMatrix::filled(2, 2, 3.0).unwrap();
        assert_eq!(
            dividend.pointwise_modulus(&divisor).unwrap().to_column_major_vec(),
            vec![2.0; 4]
        );
        assert_eq!(
            dividend.pointwise_remainder(&divisor).unwrap().to_column_major_vec(),
            vec![-1.0; 4]
        );
    }
}
