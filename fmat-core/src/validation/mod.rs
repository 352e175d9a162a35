//! Shape and index validation utilities
//!
//! This module contains pure validation functions with no allocation.
//! All functions are arithmetic checks on shapes and indices.

pub mod dimensions;
pub mod index;

pub use dimensions::{
    validate_array_lengths, validate_buffer_length, validate_dimensions, validate_product,
    validate_same_shape, validate_square,
};
pub use index::{column_major_index, diagonal_length, validate_index};
