//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::common::binary::BinaryError;

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData {
                expected,
                available,
            } => Error::InsufficientData {
                expected,
                available,
            },
            BinaryError::ParseError(message) => Error::InvalidRecord {
                record_type: 0,
                message,
            },
        }
    }
}
