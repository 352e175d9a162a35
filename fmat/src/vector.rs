//! Dense `f32` vector used by the matrix-vector products

use crate::buffer::SharedBuffer;
use fmat_core::{FmatError, Result};
use parking_lot::MappedRwLockReadGuard;
use std::fmt;

/// Flat vector over a [`SharedBuffer`]
#[derive(Debug)]
pub struct DenseVector {
    data: SharedBuffer,
}

impl DenseVector {
    /// Zero vector of `len` elements
    pub fn zeros(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(FmatError::InvalidDimension);
        }
        Ok(Self {
            data: SharedBuffer::zeroed(len),
        })
    }

    /// Take ownership of `values`
    pub fn from_vec(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            return Err(FmatError::InvalidDimension);
        }
        Ok(Self {
            data: SharedBuffer::new(values),
        })
    }

    /// Copy `values` into a new vector
    pub fn of_slice(values: &[f32]) -> Result<Self> {
        Self::from_vec(values.to_vec())
    }

    /// Bind to `buffer` without copying
    pub fn bind(buffer: SharedBuffer) -> Result<Self> {
        if buffer.is_empty() {
            return Err(FmatError::InvalidDimension);
        }
        Ok(Self { data: buffer })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; vectors hold at least one element
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn at(&self, index: usize) -> f32 {
        self.data.read()[index]
    }

    /// Bounds-checked write
    pub fn set(&self, index: usize, value: f32) -> Result<()> {
        if index >= self.len() {
            return Err(FmatError::IndexOutOfBounds);
        }
        self.data.write()[index] = value;
        Ok(())
    }

    /// Read-locked view of the values
    pub fn values(&self) -> MappedRwLockReadGuard<'_, [f32]> {
        self.data.read()
    }

    /// Copy the values out
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.to_vec()
    }

    /// The underlying buffer handle
    pub fn buffer(&self) -> &SharedBuffer {
        &self.data
    }

    /// Inner product, accumulated in `f64`
    pub fn dot(&self, other: &DenseVector) -> Result<f64> {
        if self.len() != other.len() {
            return Err(FmatError::DimensionMismatch);
        }
        if self.data.ptr_eq(&other.data) {
            return Ok(self.values().iter().map(|&v| f64::from(v) * f64::from(v)).sum());
        }
        let (left, right) = (self.values(), other.values());
        Ok(left
            .iter()
            .zip(right.iter())
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum())
    }
}

impl Clone for DenseVector {
    /// Deep copy; use [`DenseVector::bind`] with [`DenseVector::buffer`] to alias
    fn clone(&self) -> Self {
        Self {
            data: self.data.deep_clone(),
        }
    }
}

impl PartialEq for DenseVector {
    fn eq(&self, other: &Self) -> bool {
        self.data.ptr_eq(&other.data) || *self.values() == *other.values()
    }
}

impl fmt::Display for DenseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        assert_eq!(DenseVector::zeros(0).err(), Some(FmatError::InvalidDimension));
        assert_eq!(DenseVector::from_vec(Vec::new()).err(), Some(FmatError::InvalidDimension));

        let vector = DenseVector::of_slice(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(vector.len(), 3);
        assert_eq!(vector.at(2), 3.0);
        assert_eq!(vector.set(3, 1.0), Err(FmatError::IndexOutOfBounds));
        assert_eq!(vector.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_dot() {
        let a = DenseVector::of_slice(&[1.0, 2.0, 3.0]).unwrap();
        let b = DenseVector::of_slice(&[4.0, -5.0, 6.0]).unwrap();
        assert_eq!(a.dot(&b), Ok(12.0));
        assert_eq!(a.dot(&a), Ok(14.0));

        let short = DenseVector::of_slice(&[1.0]).unwrap();
        assert_eq!(a.dot(&short), Err(FmatError::DimensionMismatch));
    }

    #[test]
    fn test_bind_and_clone() {
        let buffer = SharedBuffer::new(vec![1.0, 2.0]);
        let bound = DenseVector::bind(buffer.clone()).unwrap();
        bound.set(0, 9.0).unwrap();
        assert_eq!(buffer.read()[0], 9.0);

        let copy = bound.clone();
        copy.set(1, -1.0).unwrap();
        assert_eq!(bound.at(1), 2.0);
    }
}
