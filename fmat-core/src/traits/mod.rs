//! Abstract interfaces for the fmat ecosystem
//!
//! Traits are pure interfaces - concrete storage and providers live in `fmat`.

pub mod distribution;
pub mod matrix;
pub mod provider;

pub use distribution::ContinuousDistribution;
pub use matrix::Matrix;
#[cfg(feature = "alloc")]
pub use matrix::MatrixOperations;
pub use provider::LinearAlgebraProvider;
