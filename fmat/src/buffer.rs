//! Shared element buffers
//!
//! Dense matrices and vectors keep their values in a [`SharedBuffer`]: a
//! fixed-length `[f32]` behind a reference-counted read/write lock. Copying
//! constructors always create a fresh buffer, so the matrix owns it
//! exclusively. Binding constructors accept a caller's handle instead, and
//! every clone of that handle observes the same values.
//!
//! Because two handles may name the same allocation, operations that read one
//! buffer and write another go through [`map_into`] / [`zip_into`], which
//! stage the sources through a copy when the destination aliases them.

use parking_lot::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::sync::Arc;

/// Reference-counted, lock-guarded, fixed-length `f32` buffer
#[derive(Debug, Clone)]
pub struct SharedBuffer {
    inner: Arc<RwLock<Box<[f32]>>>,
    len: usize,
}

impl SharedBuffer {
    /// Wrap `values` in a new, unshared buffer
    pub fn new(values: Vec<f32>) -> Self {
        let len = values.len();
        Self {
            inner: Arc::new(RwLock::new(values.into_boxed_slice())),
            len,
        }
    }

    /// Allocate a zero-filled buffer
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Number of values; fixed for the lifetime of the buffer
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lock the buffer for reading
    pub fn read(&self) -> MappedRwLockReadGuard<'_, [f32]> {
        RwLockReadGuard::map(self.inner.read(), |values| &**values)
    }

    /// Lock the buffer for writing
    ///
    /// The guard derefs to a slice, so the length can never change.
    pub fn write(&self) -> MappedRwLockWriteGuard<'_, [f32]> {
        RwLockWriteGuard::map(self.inner.write(), |values| &mut **values)
    }

    /// Copy the values out
    pub fn to_vec(&self) -> Vec<f32> {
        self.read().to_vec()
    }

    /// Whether both handles name the same allocation
    pub fn ptr_eq(&self, other: &SharedBuffer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether another handle to this allocation exists
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.inner) > 1
    }

    /// Deep copy into a new, unshared buffer
    pub fn deep_clone(&self) -> Self {
        Self::new(self.to_vec())
    }
}

impl From<Vec<f32>> for SharedBuffer {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Run `f(source, destination)`, staging `src` when it aliases `dst`
pub(crate) fn map_into<T, F>(src: &SharedBuffer, dst: &SharedBuffer, f: F) -> T
where
    F: FnOnce(&[f32], &mut [f32]) -> T,
{
    if src.ptr_eq(dst) {
        let staged = src.to_vec();
        let mut out = dst.write();
        return f(staged.as_slice(), &mut *out);
    }
    let input = src.read();
    let mut out = dst.write();
    f(&*input, &mut *out)
}

/// Run `f(a, b, destination)`, staging any source that aliases `dst`
pub(crate) fn zip_into<T, F>(a: &SharedBuffer, b: &SharedBuffer, dst: &SharedBuffer, f: F) -> T
where
    F: FnOnce(&[f32], &[f32], &mut [f32]) -> T,
{
    if a.ptr_eq(dst) || b.ptr_eq(dst) {
        let left = a.to_vec();
        let right = if b.ptr_eq(a) { left.clone() } else { b.to_vec() };
        let mut out = dst.write();
        return f(left.as_slice(), right.as_slice(), &mut *out);
    }
    let left = a.read();
    if b.ptr_eq(a) {
        let mut out = dst.write();
        return f(&*left, &*left, &mut *out);
    }
    let right = b.read();
    let mut out = dst.write();
    f(&*left, &*right, &mut *out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_handles_see_writes() {
        let buffer = SharedBuffer::new(vec![1.0, 2.0, 3.0]);
        let alias = buffer.clone();
        assert!(buffer.is_shared());
        assert!(buffer.ptr_eq(&alias));

        alias.write()[1] = 20.0;
        assert_eq!(buffer.to_vec(), vec![1.0, 20.0, 3.0]);

        let copy = buffer.deep_clone();
        assert!(!copy.ptr_eq(&buffer));
        copy.write()[0] = -1.0;
        assert_eq!(buffer.read()[0], 1.0);
    }

    #[test]
    fn test_map_into_aliased() {
        let buffer = SharedBuffer::new(vec![1.0, 2.0]);
        map_into(&buffer, &buffer, |src, dst| {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s * 2.0;
            }
        });
        assert_eq!(buffer.to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_zip_into_aliased() {
        let a = SharedBuffer::new(vec![1.0, 2.0]);
        let b = SharedBuffer::new(vec![10.0, 20.0]);

        // destination is the first source
        zip_into(&a, &b, &a, |x, y, out| {
            for i in 0..out.len() {
                out[i] = x[i] + y[i];
            }
        });
        assert_eq!(a.to_vec(), vec![11.0, 22.0]);

        // both sources are the same buffer
        let out = SharedBuffer::zeroed(2);
        zip_into(&b, &b, &out, |x, y, out| {
            for i in 0..out.len() {
                out[i] = x[i] * y[i];
            }
        });
        assert_eq!(out.to_vec(), vec![100.0, 400.0]);
    }
}
