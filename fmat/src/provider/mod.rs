//! Concrete [`fmat_core::LinearAlgebraProvider`] implementations

mod kernels;
pub mod parallel;
pub mod reference;

pub use parallel::ParallelProvider;
pub use reference::ReferenceProvider;
