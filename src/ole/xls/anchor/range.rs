//! Inclusive range checks for client anchor fields.

use tracing::debug;

use crate::common::{Error, Result};

/// Largest `dx` offset: 1023/1024ths of a column.
pub const MAX_DX: i64 = 1023;
/// Largest `dy` offset: 255/256ths of a row.
pub const MAX_DY: i64 = 255;
/// Largest column index.
pub const MAX_COL: i64 = 255;
/// Largest row index.
pub const MAX_ROW: i64 = 255 * 256;

/// Fail with [`Error::OutOfRange`] unless `min <= value <= max`.
pub fn check_range(value: i64, min: i64, max: i64, field: &'static str) -> Result<()> {
    if value < min || value > max {
        debug!(field, value, min, max, "anchor field out of range");
        return Err(Error::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
