//! Binary data parsing utilities shared by the Escher and BIFF record layers.
//!
//! All multi-byte values in both formats are little-endian.

use zerocopy::{FromBytes, I32, LE, U16};

/// Binary parsing error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn window(data: &[u8], offset: usize, width: usize) -> BinaryResult<&[u8]> {
    data.get(offset..offset + width)
        .ok_or(BinaryError::InsufficientData {
            expected: offset + width,
            available: data.len(),
        })
}

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use litchi_anchor::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    U16::<LE>::read_from_bytes(window(data, offset, 2)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a little-endian u16, falling back to zero past the end of `data`.
///
/// Used for records whose trailing fields may be truncated on disk.
#[inline]
pub fn read_u16_le_or_zero(data: &[u8], offset: usize) -> u16 {
    read_u16_le(data, offset).unwrap_or(0)
}

/// Read a little-endian i32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use litchi_anchor::common::binary::read_i32_le;
/// let data = [0xFF, 0xFF, 0xFF, 0xFF];
/// assert_eq!(read_i32_le(&data, 0).unwrap(), -1i32);
/// ```
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    I32::<LE>::read_from_bytes(window(data, offset, 4)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i32".to_string()))
}
