//! Fork-join helpers over contiguous index ranges
//!
//! Every helper runs on the calling thread when the input is small or the
//! control settings ask for sequential execution, and otherwise inside the
//! configured rayon pool.

use crate::control;
use fmat_core::SEQUENTIAL_THRESHOLD;
use rayon::prelude::*;

/// Run `op` inside the configured thread pool, or the global one
pub(crate) fn install<R, F>(op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    match control::thread_pool() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Whether `len` elements are worth splitting across threads
pub(crate) fn should_split(len: usize) -> bool {
    len > SEQUENTIAL_THRESHOLD && !control::is_sequential()
}

/// `dst[i] = op(src[i])`, split into chunks of the configured chunk size
pub(crate) fn map_chunked<F>(src: &[f32], dst: &mut [f32], op: F)
where
    F: Fn(f32) -> f32 + Sync + Send,
{
    if !should_split(dst.len()) {
        map_range(src, dst, &op);
        return;
    }
    let chunk_size = control::parallel_chunk_size();
    install(|| {
        dst.par_chunks_mut(chunk_size)
            .zip(src.par_chunks(chunk_size))
            .for_each(|(out, input)| map_range(input, out, &op));
    });
}

/// `dst[i] = op(src[i])` with rayon's default splitting
pub(crate) fn map_elements<F>(src: &[f32], dst: &mut [f32], op: F)
where
    F: Fn(f32) -> f32 + Sync + Send,
{
    if !should_split(dst.len()) {
        map_range(src, dst, &op);
        return;
    }
    install(|| {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(out, &value)| *out = op(value));
    });
}

/// `dst[i] = op(a[i], b[i])` with rayon's default splitting
pub(crate) fn zip_elements<F>(a: &[f32], b: &[f32], dst: &mut [f32], op: F)
where
    F: Fn(f32, f32) -> f32 + Sync + Send,
{
    if !should_split(dst.len()) {
        for ((out, &left), &right) in dst.iter_mut().zip(a).zip(b) {
            *out = op(left, right);
        }
        return;
    }
    install(|| {
        dst.par_iter_mut()
            .zip(a.par_iter().zip(b.par_iter()))
            .for_each(|(out, (&left, &right))| *out = op(left, right));
    });
}

fn map_range<F>(src: &[f32], dst: &mut [f32], op: &F)
where
    F: Fn(f32) -> f32,
{
    for (out, &value) in dst.iter_mut().zip(src) {
        *out = op(value);
    }
}
