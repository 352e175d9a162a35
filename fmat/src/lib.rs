//! fmat - Single-precision dense matrices with pluggable numerical providers
//!
//! This library provides a column-major `f32` matrix whose arithmetic is
//! delegated to a swappable [`LinearAlgebraProvider`], with dedicated paths
//! for diagonal and sparse operands and a generic fallback for everything else.
//!
//! ## Architecture
//!
//! fmat follows a clean specification/implementation separation:
//!
//! - **fmat-core**: Errors, option enums, shape validation and traits (no allocation required)
//! - **fmat**: Storage layouts, providers, the dense matrix and factorizations
//!
//! ## Quick Start
//!
//! ```rust
//! use fmat::{DenseMatrix, DiagonalMatrix};
//!
//! fn example() -> fmat::Result<()> {
//!     let ones = DenseMatrix::filled(3, 3, 1.0)?;
//!     let diagonal = DiagonalMatrix::of_square_diagonal(&[1.0, 2.0, 3.0])?;
//!
//!     let sum = (&ones + &diagonal)?;
//!     assert_eq!(sum.trace()?, 9.0);
//!
//!     let product = sum.multiply(&ones)?;
//!     println!("{product}");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! - **Fast/mixed/fallback dispatch**: dense operands go straight to the provider
//! - **Result aliasing**: a result may share its buffer with an operand
//! - **Runtime provider selection**: see [`control`]
//! - **Reference factorizations**: Cholesky, LU, QR, Gram-Schmidt, SVD and EVD
//! - **Serde support**: `{rows, columns, data}` form behind the `serde` feature

// Re-export core abstractions
pub use fmat_core::{
    // Core traits
    ContinuousDistribution, LinearAlgebraProvider, Matrix, MatrixOperations,
    // Options
    Norm, QrMethod, Transpose,
    // Error handling
    ErrorCategory, FmatError, Result,
};

// Implementation modules
pub mod buffer;
pub mod control;
pub mod dense;
pub mod distribution;
pub mod factorization;
pub mod generic;
pub mod operator;
mod parallel;
pub mod provider;
pub mod storage;
pub mod vector;

// Public exports
pub use buffer::SharedBuffer;
pub use control::{ControlConfig, ProviderKind};
pub use dense::DenseMatrix;
pub use distribution::RandomSampler;
pub use factorization::{Cholesky, Evd, GramSchmidt, Lu, Qr, Solver, Svd};
pub use provider::{ParallelProvider, ReferenceProvider};
pub use storage::{ColumnMajorStorage, DiagonalMatrix, Layout, LayoutMut, MatrixStorage, SparseMatrix};
pub use vector::DenseVector;
