#![no_std]

//! fmat Core - single-precision dense matrix definitions
//!
//! This crate provides the error type, option enums, validation helpers and
//! abstract traits shared by matrix storage layouts and numerical providers.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod constants;
pub mod error;
pub mod options;
pub mod traits;
pub mod validation;

pub use constants::*;
pub use error::*;
pub use options::*;
pub use traits::*;
pub use validation::*;
