//! Unified error types for the anchor library.
//!
//! Record-level failures (binary decoding, malformed headers) and anchor-level
//! failures (range violations, rejected anchor types) share one error type.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
