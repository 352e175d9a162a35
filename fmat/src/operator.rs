//! Operator entry points for possibly-absent operands
//!
//! Each function checks for a missing operand first, then for compatible
//! shapes, and only then delegates to the matching [`DenseMatrix`] method.

use crate::dense::DenseMatrix;
use fmat_core::{validate_product, validate_same_shape, FmatError, Matrix, Result, Transpose};

fn present(operand: Option<&DenseMatrix>) -> Result<&DenseMatrix> {
    operand.ok_or(FmatError::NullOperand)
}

fn both<'a>(
    left: Option<&'a DenseMatrix>,
    right: Option<&'a DenseMatrix>,
) -> Result<(&'a DenseMatrix, &'a DenseMatrix)> {
    Ok((present(left)?, present(right)?))
}

/// `left + right`
pub fn add(left: Option<&DenseMatrix>, right: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    let (left, right) = both(left, right)?;
    validate_same_shape(left.dimensions(), right.dimensions())?;
    left.add(right)
}

/// `left - right`
pub fn subtract(left: Option<&DenseMatrix>, right: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    let (left, right) = both(left, right)?;
    validate_same_shape(left.dimensions(), right.dimensions())?;
    left.subtract(right)
}

/// Matrix product `left * right`
pub fn multiply(left: Option<&DenseMatrix>, right: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    let (left, right) = both(left, right)?;
    validate_product(
        Transpose::NoTrans,
        left.dimensions(),
        Transpose::NoTrans,
        right.dimensions(),
    )?;
    left.multiply(right)
}

/// Element-wise truncated remainder `left % right`
pub fn remainder(left: Option<&DenseMatrix>, right: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    let (left, right) = both(left, right)?;
    validate_same_shape(left.dimensions(), right.dimensions())?;
    left.pointwise_remainder(right)
}

/// Unary `-operand`
pub fn negate(operand: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    present(operand)?.negate()
}

/// Unary `+operand`, an independent copy
pub fn plus(operand: Option<&DenseMatrix>) -> Result<DenseMatrix> {
    Ok(present(operand)?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_operand_reported_before_shape() {
        let wide = DenseMatrix::zeros(2, 3).unwrap();
        assert_eq!(add(None, Some(&wide)).err(), Some(FmatError::NullOperand));
        assert_eq!(subtract(Some(&wide), None).err(), Some(FmatError::NullOperand));
        assert_eq!(multiply(None, None).err(), Some(FmatError::NullOperand));
        assert_eq!(remainder(Some(&wide), None).err(), Some(FmatError::NullOperand));
        assert_eq!(negate(None).err(), Some(FmatError::NullOperand));
        assert_eq!(plus(None).err(), Some(FmatError::NullOperand));
    }

    #[test]
    fn test_shape_checks() {
        let wide = DenseMatrix::zeros(2, 3).unwrap();
        let tall = DenseMatrix::zeros(4, 2).unwrap();
        assert_eq!(add(Some(&wide), Some(&tall)).err(), Some(FmatError::DimensionMismatch));
        assert_eq!(multiply(Some(&wide), Some(&tall)).err(), Some(FmatError::DimensionMismatch));
        assert_eq!(
            multiply(Some(&tall), Some(&wide)).unwrap().dimensions(),
            (4, 3)
        );
    }

    #[test]
    fn test_delegates() {
        let a = DenseMatrix::of_array(&[[1.0, -2.0], [3.0, 4.0]]).unwrap();
        let copy = plus(Some(&a)).unwrap();
        assert_eq!(copy, a);
        copy.set(0, 0, 9.0).unwrap();
        assert_eq!(a.at(0, 0), 1.0);

        let negated = negate(Some(&a)).unwrap();
        assert_eq!(add(Some(&a), Some(&negated)).unwrap(), DenseMatrix::zeros(2, 2).unwrap());
        assert_eq!(subtract(Some(&a), Some(&a)).unwrap(), DenseMatrix::zeros(2, 2).unwrap());
        let threes = DenseMatrix::filled(2, 2, 3.0).unwrap();
        assert_eq!(
            remainder(Some(&a), Some(&threes)).unwrap(),
            DenseMatrix::of_array(&[[1.0, -2.0], [0.0, 1.0]]).unwrap()
        );
    }
}
