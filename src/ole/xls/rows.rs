//! Worksheet row heights.
//!
//! Anchors measure vertical offsets in fractions of a row, so converting an
//! anchor into points needs the height of every row it spans. Heights are
//! stored in twips (1/20 of a point) as in the BIFF ROW record.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use tracing::trace;

use super::records::{DEFAULT_ROW_HEIGHT, DefaultRowHeightRecord, ROW, RecordIter, RowRecord};
use crate::common::Result;

/// Twips per point.
pub const TWIPS_PER_POINT: f32 = 20.0;

/// Supplies the rendered height of a row.
///
/// Implementations must be read-only: looking up a row never creates or
/// modifies it.
pub trait RowHeightSource {
    /// Height in points of the zero-based row `row`: its explicit height if it
    /// has one, else the sheet's default row height.
    fn row_height_in_points(&self, row: u32) -> f32;
}

impl<F> RowHeightSource for F
where
    F: Fn(u32) -> f32,
{
    #[inline]
    fn row_height_in_points(&self, row: u32) -> f32 {
        self(row)
    }
}

/// Sparse row-height table for one worksheet.
///
/// # Example
///
/// ```rust
/// use litchi_anchor::ole::xls::{RowHeightSource, RowHeights};
///
/// let mut rows = RowHeights::new();
/// rows.set_row_height_twips(2, 400);
///
/// assert_eq!(rows.row_height_in_points(2), 20.0);
/// assert_eq!(rows.row_height_in_points(3), 12.75);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHeights {
    default_height: u16,
    rows: BTreeMap<u32, u16>,
}

impl Default for RowHeights {
    fn default() -> Self {
        Self {
            default_height: Self::DEFAULT_ROW_HEIGHT_TWIPS,
            rows: BTreeMap::new(),
        }
    }
}

impl RowHeights {
    /// Excel's default row height, 12.75pt.
    pub const DEFAULT_ROW_HEIGHT_TWIPS: u16 = 0x00FF;

    /// Largest height the 15-bit ROW height field can hold.
    pub const MAX_ROW_HEIGHT_TWIPS: u16 = 0x7FFF;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a sheet default other than 12.75pt.
    #[inline]
    pub fn with_default_height_twips(mut self, twips: u16) -> Self {
        self.default_height = twips;
        self
    }

    #[inline]
    pub fn default_height_twips(&self) -> u16 {
        self.default_height
    }

    #[inline]
    pub fn set_default_height_twips(&mut self, twips: u16) {
        self.default_height = twips;
    }

    #[inline]
    pub fn default_row_height_in_points(&self) -> f32 {
        self.default_height as f32 / TWIPS_PER_POINT
    }

    /// Explicit height of `row`, if it has one.
    #[inline]
    pub fn row_height_twips(&self, row: u32) -> Option<u16> {
        self.rows.get(&row).copied()
    }

    /// Set an explicit height, capped at [`Self::MAX_ROW_HEIGHT_TWIPS`].
    pub fn set_row_height_twips(&mut self, row: u32, twips: u16) {
        self.rows.insert(row, twips.min(Self::MAX_ROW_HEIGHT_TWIPS));
    }

    /// Set an explicit height in points; fractions of a twip are truncated.
    ///
    /// Negative heights store 0 and oversized ones are capped at
    /// [`Self::MAX_ROW_HEIGHT_TWIPS`].
    pub fn set_row_height_in_points(&mut self, row: u32, points: f32) {
        let twips = (points * TWIPS_PER_POINT).clamp(0.0, Self::MAX_ROW_HEIGHT_TWIPS as f32);
        self.rows.insert(row, twips as u16);
    }

    /// Drop the explicit height so the row falls back to the default.
    pub fn clear_row_height(&mut self, row: u32) -> Option<u16> {
        self.rows.remove(&row)
    }

    /// Number of rows with an explicit height.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build the table from a worksheet substream.
    ///
    /// DEFAULTROWHEIGHT sets the default; each ROW with an explicit height adds
    /// an entry. ROW records flagged as default height are not stored.
    pub fn from_biff_records<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut heights = Self::new();

        for record in RecordIter::new(reader)? {
            let record = record?;
            match record.header.record_type {
                DEFAULT_ROW_HEIGHT => {
                    let default = DefaultRowHeightRecord::parse(&record.data)?;
                    heights.default_height = default.height;
                },
                ROW => {
                    let row = RowRecord::parse(&record.data)?;
                    if let Some(twips) = row.height_twips() {
                        heights.rows.insert(row.row as u32, twips);
                    }
                },
                other => trace!(record_type = other, "skipping BIFF record"),
            }
        }

        Ok(heights)
    }
}

impl RowHeightSource for RowHeights {
    fn row_height_in_points(&self, row: u32) -> f32 {
        match self.rows.get(&row) {
            Some(&twips) => twips as f32 / TWIPS_PER_POINT,
            None => self.default_row_height_in_points(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ole::xls::records::encode_record;
    use std::io::Cursor;

    fn row_record(row: u16, raw_height: u16) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&row.to_le_bytes());
        data.extend_from_slice(&[0, 0, 1, 0]);
        data.extend_from_slice(&raw_height.to_le_bytes());
        data.extend_from_slice(&[0u8; 8]);
        encode_record(ROW, &data)
    }

    #[test]
    fn test_default_height() {
        let rows = RowHeights::new();
        assert_eq!(rows.default_row_height_in_points(), 12.75);
        assert_eq!(rows.row_height_in_points(0), 12.75);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_explicit_heights() {
        let mut rows = RowHeights::new().with_default_height_twips(300);
        rows.set_row_height_in_points(4, 30.0);
        assert_eq!(rows.row_height_twips(4), Some(600));
        assert_eq!(rows.row_height_in_points(4), 30.0);
        assert_eq!(rows.row_height_in_points(5), 15.0);

        assert_eq!(rows.clear_row_height(4), Some(600));
        assert_eq!(rows.row_height_in_points(4), 15.0);
    }

    #[test]
    fn test_heights_are_clamped_to_row_field() {
        let mut rows = RowHeights::new();
        rows.set_row_height_in_points(0, -5.0);
        rows.set_row_height_in_points(1, 5000.0);
        rows.set_row_height_twips(2, 0xFFFF);
        assert_eq!(rows.row_height_twips(0), Some(0));
        assert_eq!(rows.row_height_twips(1), Some(RowHeights::MAX_ROW_HEIGHT_TWIPS));
        assert_eq!(rows.row_height_twips(2), Some(0x7FFF));
        assert_eq!(rows.row_height_in_points(1), 1638.35);
    }

    #[test]
    fn test_lookup_does_not_create_rows() {
        let rows = RowHeights::new();
        let _ = rows.row_height_in_points(10);
        assert_eq!(rows.len(), 0);
    }

    #[test]
    fn test_closure_source() {
        let source = |row: u32| -> f32 { if row == 1 { 30.0 } else { 15.0 } };
        assert_eq!(source.row_height_in_points(1), 30.0);
        assert_eq!(source.row_height_in_points(2), 15.0);
    }

    #[test]
    fn test_from_biff_records() {
        let mut stream = encode_record(0x0809, &[0u8; 16]);
        stream.extend(encode_record(DEFAULT_ROW_HEIGHT, &[0x00, 0x00, 0x2C, 0x01]));
        stream.extend(row_record(0, 400));
        stream.extend(row_record(2, 0x80FF));
        stream.extend(encode_record(0x000A, &[]));

        let rows = RowHeights::from_biff_records(Cursor::new(stream)).unwrap();
        assert_eq!(rows.default_height_twips(), 300);
        assert_eq!(rows.row_height_in_points(0), 20.0);
        assert_eq!(rows.row_height_twips(2), None);
        assert_eq!(rows.row_height_in_points(2), 15.0);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_from_biff_records_bad_row() {
        let stream = encode_record(ROW, &[0u8; 4]);
        assert!(RowHeights::from_biff_records(Cursor::new(stream)).is_err());
    }
}
