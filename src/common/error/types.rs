//! Unified error type for the anchor library.
//!
//! Range violations, record decoding failures and I/O problems all surface
//! through one enum so callers can use `?` across layers.
use thiserror::Error;

/// Main error type for anchor and record operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading or writing records
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A value fell outside its documented inclusive bounds
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Anchor type code rejected under strict validation
    #[error("Anchor type of shape can take only such values: 0, 2, 3 (got {0})")]
    InvalidAnchorType(u16),

    /// Malformed Escher or BIFF record
    #[error("Invalid record 0x{record_type:04X}: {message}")]
    InvalidRecord { record_type: u16, message: String },

    /// Not enough bytes to decode a field
    #[error("Insufficient data: expected {expected}, got {available}")]
    InsufficientData { expected: usize, available: usize },

    /// Options could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for anchor operations.
pub type Result<T> = std::result::Result<T, Error>;
