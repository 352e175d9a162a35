//! `std::ops` implementations
//!
//! Every operator returns `Result`: matrix operands can disagree in shape,
//! and scalar operands still go through the active provider.

use super::DenseMatrix;
use crate::storage::{DiagonalMatrix, SparseMatrix};
use fmat_core::Result;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

macro_rules! matrix_operator {
    ($trait:ident, $method:ident, $delegate:ident, $rhs:ty) => {
        impl $trait<&$rhs> for &DenseMatrix {
            type Output = Result<DenseMatrix>;

            fn $method(self, rhs: &$rhs) -> Result<DenseMatrix> {
                self.$delegate(rhs)
            }
        }
    };
}

macro_rules! matrix_operators {
    ($($rhs:ty),*) => {
        $(
            matrix_operator!(Add, add, add, $rhs);
            matrix_operator!(Sub, sub, subtract, $rhs);
            matrix_operator!(Mul, mul, multiply, $rhs);
            matrix_operator!(Rem, rem, pointwise_remainder, $rhs);
        )*
    };
}

matrix_operators!(DenseMatrix, DiagonalMatrix, SparseMatrix);

macro_rules! scalar_operator {
    ($trait:ident, $method:ident, $delegate:ident) => {
        impl $trait<f32> for &DenseMatrix {
            type Output = Result<DenseMatrix>;

            fn $method(self, rhs: f32) -> Result<DenseMatrix> {
                self.$delegate(rhs)
            }
        }
    };
}

scalar_operator!(Add, add, add_scalar);
scalar_operator!(Sub, sub, subtract_scalar);
scalar_operator!(Mul, mul, multiply_scalar);
scalar_operator!(Div, div, divide_scalar);
scalar_operator!(Rem, rem, remainder);

impl Mul<&DenseMatrix> for f32 {
    type Output = Result<DenseMatrix>;

    fn mul(self, rhs: &DenseMatrix) -> Result<DenseMatrix> {
        rhs.multiply_scalar(self)
    }
}

impl Neg for &DenseMatrix {
    type Output = Result<DenseMatrix>;

    fn neg(self) -> Result<DenseMatrix> {
        self.negate()
    }
}
