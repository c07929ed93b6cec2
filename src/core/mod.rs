//! Core module wiring: lattices, integer, big-integer and real matrices, errors.

pub mod bigint_matrix;
pub mod error;
pub mod lattice;
pub mod matrix;
pub mod types;

// Re-export the most commonly used items so downstream code can simply import
// `crate::core::*` without having to juggle individual submodules.
pub use bigint_matrix::*;
pub use error::*;
pub use lattice::*;
pub use matrix::*;
pub use types::*;
