//! Common types and utilities shared by the record and anchor layers.

// Submodule declarations
pub mod binary;
pub mod error;
pub mod shared;

// Re-exports for convenience
pub use error::{Error, Result};
pub use shared::SharedRecord;
