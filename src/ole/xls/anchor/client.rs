//! Anchor attached to worksheet cells.

use std::hash::{Hash, Hasher};

use tracing::warn;

use super::Anchor;
use super::options::AnchorOptions;
use super::range::{MAX_COL, MAX_DX, MAX_DY, MAX_ROW, check_range};
use crate::common::{Error, Result, SharedRecord};
use crate::ole::escher::{EscherClientAnchorRecord, EscherRecord};
use crate::ole::xls::rows::RowHeightSource;

/// Units per row in a `dy` offset.
const DY_UNITS_PER_ROW: f32 = 256.0;

/// How a shape reacts when the cells under it move or resize.
///
/// Stored in the client anchor's `flag` field. Equality and hashing go
/// through the raw code, so `Unknown(2)` equals `MoveDontSize`.
#[derive(Debug, Clone, Copy, Default)]
pub enum AnchorType {
    /// Move and size with cells (0)
    #[default]
    MoveAndSize,
    /// Move but don't size with cells (2)
    MoveDontSize,
    /// Don't move or size with cells (3)
    DontMoveOrSize,
    /// Any other code found in a file or supplied by a caller
    Unknown(u16),
}

impl AnchorType {
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        match value {
            0 => Self::MoveAndSize,
            2 => Self::MoveDontSize,
            3 => Self::DontMoveOrSize,
            other => Self::Unknown(other),
        }
    }

    #[inline]
    pub const fn to_raw(self) -> u16 {
        match self {
            Self::MoveAndSize => 0,
            Self::MoveDontSize => 2,
            Self::DontMoveOrSize => 3,
            Self::Unknown(other) => other,
        }
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        matches!(self.to_raw(), 0 | 2 | 3)
    }

    /// Same code, with `Unknown` holding only codes that have no named variant.
    #[inline]
    pub const fn normalized(self) -> Self {
        Self::from_raw(self.to_raw())
    }
}

impl PartialEq for AnchorType {
    fn eq(&self, other: &Self) -> bool {
        self.to_raw() == other.to_raw()
    }
}

impl Eq for AnchorType {}

impl Hash for AnchorType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_raw().hash(state);
    }
}

impl From<u16> for AnchorType {
    fn from(value: u16) -> Self {
        Self::from_raw(value)
    }
}

impl From<AnchorType> for u16 {
    fn from(anchor_type: AnchorType) -> Self {
        anchor_type.to_raw()
    }
}

/// A shape anchored between a top-left and a bottom-right cell.
///
/// All fields live in the wrapped [`EscherClientAnchorRecord`]; cloning a
/// `ClientAnchor` clones the handle, not the record. Equality compares the
/// nine record fields only, so flip flags, options and record identity are
/// ignored.
///
/// # Example
///
/// ```rust
/// use litchi_anchor::ole::xls::{Anchor, ClientAnchor};
///
/// # fn main() -> litchi_anchor::Result<()> {
/// // corners given right-to-left
/// let anchor = ClientAnchor::with_coordinates(0, 0, 512, 128, 5, 1, 2, 3)?;
/// assert_eq!((anchor.col1(), anchor.col2()), (2, 5));
/// assert!(anchor.is_horizontally_flipped());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientAnchor {
    record: SharedRecord<EscherClientAnchorRecord>,
    horizontally_flipped: bool,
    vertically_flipped: bool,
    options: AnchorOptions,
}

impl ClientAnchor {
    /// Allocate a fresh record with every field zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an anchor from both corners.
    ///
    /// Corners supplied in reverse order are swapped so that `col1 <= col2`
    /// and `row1 <= row2`, and the matching flip flag is set. Nothing is
    /// allocated if any value is out of range.
    #[allow(clippy::too_many_arguments)]
    pub fn with_coordinates(
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
        col1: u16,
        row1: u32,
        col2: u16,
        row2: u32,
    ) -> Result<Self> {
        check_range(dx1.into(), 0, MAX_DX, "dx1")?;
        check_range(dx2.into(), 0, MAX_DX, "dx2")?;
        check_range(dy1.into(), 0, MAX_DY, "dy1")?;
        check_range(dy2.into(), 0, MAX_DY, "dy2")?;
        check_range(col1.into(), 0, MAX_COL, "col1")?;
        check_range(col2.into(), 0, MAX_COL, "col2")?;
        check_range(row1.into(), 0, MAX_ROW, "row1")?;
        check_range(row2.into(), 0, MAX_ROW, "row2")?;

        // all values are now known to fit in u16
        let record = EscherClientAnchorRecord {
            flag: AnchorType::MoveAndSize.to_raw(),
            col1: col1.min(col2),
            dx1: dx1 as u16,
            row1: row1.min(row2) as u16,
            dy1: dy1 as u16,
            col2: col1.max(col2),
            dx2: dx2 as u16,
            row2: row1.max(row2) as u16,
            dy2: dy2 as u16,
        };

        Ok(Self {
            record: SharedRecord::new(record),
            horizontally_flipped: col1 > col2,
            vertically_flipped: row1 > row2,
            options: AnchorOptions::default(),
        })
    }

    /// Wrap an existing record; reads and writes go through to it.
    pub fn from_record(record: SharedRecord<EscherClientAnchorRecord>) -> Self {
        Self {
            record,
            horizontally_flipped: false,
            vertically_flipped: false,
            options: AnchorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnchorOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn options(&self) -> &AnchorOptions {
        &self.options
    }

    #[inline]
    pub fn escher_record(&self) -> &SharedRecord<EscherClientAnchorRecord> {
        &self.record
    }

    #[inline]
    pub fn col1(&self) -> u16 {
        self.record.read().col1
    }

    pub fn set_col1(&mut self, col1: u16) -> Result<()> {
        check_range(col1.into(), 0, MAX_COL, "col1")?;
        self.record.write().col1 = col1;
        Ok(())
    }

    #[inline]
    pub fn col2(&self) -> u16 {
        self.record.read().col2
    }

    pub fn set_col2(&mut self, col2: u16) -> Result<()> {
        check_range(col2.into(), 0, MAX_COL, "col2")?;
        self.record.write().col2 = col2;
        Ok(())
    }

    #[inline]
    pub fn row1(&self) -> u32 {
        self.record.read().row1.into()
    }

    pub fn set_row1(&mut self, row1: u32) -> Result<()> {
        check_range(row1.into(), 0, MAX_ROW, "row1")?;
        self.record.write().row1 = row1 as u16;
        Ok(())
    }

    #[inline]
    pub fn row2(&self) -> u32 {
        self.record.read().row2.into()
    }

    pub fn set_row2(&mut self, row2: u32) -> Result<()> {
        check_range(row2.into(), 0, MAX_ROW, "row2")?;
        self.record.write().row2 = row2 as u16;
        Ok(())
    }

    #[inline]
    pub fn anchor_type(&self) -> AnchorType {
        AnchorType::from_raw(self.record.read().flag)
    }

    /// Set the anchor type.
    ///
    /// Codes other than 0, 2 and 3 are stored as-is unless the options ask for
    /// strict validation.
    pub fn set_anchor_type(&mut self, anchor_type: AnchorType) -> Result<()> {
        if !anchor_type.is_known() {
            if self.options.is_strict() {
                return Err(Error::InvalidAnchorType(anchor_type.to_raw()));
            }
            warn!(code = anchor_type.to_raw(), "storing unknown anchor type");
        }
        self.record.write().flag = anchor_type.to_raw();
        Ok(())
    }

    /// Check every stored field against its range.
    ///
    /// Fields can drift out of range when the backing record is written
    /// directly through the container that owns it.
    pub fn validate(&self) -> Result<()> {
        let r = self.record.snapshot();
        check_range(r.dx1.into(), 0, MAX_DX, "dx1")?;
        check_range(r.dx2.into(), 0, MAX_DX, "dx2")?;
        check_range(r.dy1.into(), 0, MAX_DY, "dy1")?;
        check_range(r.dy2.into(), 0, MAX_DY, "dy2")?;
        check_range(r.col1.into(), 0, MAX_COL, "col1")?;
        check_range(r.col2.into(), 0, MAX_COL, "col2")?;
        check_range(r.row1.into(), 0, MAX_ROW, "row1")?;
        check_range(r.row2.into(), 0, MAX_ROW, "row2")?;
        Ok(())
    }

    /// Overwrite both corners.
    ///
    /// The current state is validated first, then the new values. Unlike
    /// [`ClientAnchor::with_coordinates`], corners are stored in the order
    /// given and the flip flags are left untouched, so `col1 > col2` is
    /// possible afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn set_anchor(
        &mut self,
        col1: u16,
        row1: u32,
        x1: i32,
        y1: i32,
        col2: u16,
        row2: u32,
        x2: i32,
        y2: i32,
    ) -> Result<()> {
        self.validate()?;

        check_range(col1.into(), 0, MAX_COL, "col1")?;
        check_range(row1.into(), 0, MAX_ROW, "row1")?;
        check_range(x1.into(), 0, MAX_DX, "dx1")?;
        check_range(y1.into(), 0, MAX_DY, "dy1")?;
        check_range(col2.into(), 0, MAX_COL, "col2")?;
        check_range(row2.into(), 0, MAX_ROW, "row2")?;
        check_range(x2.into(), 0, MAX_DX, "dx2")?;
        check_range(y2.into(), 0, MAX_DY, "dy2")?;

        self.record.update(|r| {
            r.col1 = col1;
            r.row1 = row1 as u16;
            r.dx1 = x1 as u16;
            r.dy1 = y1 as u16;
            r.col2 = col2;
            r.row2 = row2 as u16;
            r.dx2 = x2 as u16;
            r.dy2 = y2 as u16;
        });
        Ok(())
    }

    /// Height of the anchored shape in points.
    ///
    /// The first row contributes the part below `dy1`, the last row the part
    /// above `dy2`, and every row in between its full height. Rows are read
    /// from `rows` and never modified.
    pub fn anchor_height_in_points<S>(&self, rows: &S) -> f32
    where
        S: RowHeightSource + ?Sized,
    {
        let r = self.record.snapshot();
        let y1 = r.dy1 as f32;
        let y2 = r.dy2 as f32;
        let row1 = u32::from(r.row1.min(r.row2));
        let row2 = u32::from(r.row1.max(r.row2));

        if row1 == row2 {
            return ((y2 - y1) / DY_UNITS_PER_ROW) * rows.row_height_in_points(row2);
        }

        let mut points = ((DY_UNITS_PER_ROW - y1) / DY_UNITS_PER_ROW)
            * rows.row_height_in_points(row1);
        for row in row1 + 1..row2 {
            points += rows.row_height_in_points(row);
        }
        points += (y2 / DY_UNITS_PER_ROW) * rows.row_height_in_points(row2);
        points
    }
}

impl PartialEq for ClientAnchor {
    fn eq(&self, other: &Self) -> bool {
        self.record.snapshot() == other.record.snapshot()
    }
}

impl Eq for ClientAnchor {}

impl Anchor for ClientAnchor {
    fn dx1(&self) -> i32 {
        self.record.read().dx1.into()
    }

    fn set_dx1(&mut self, dx1: i32) -> Result<()> {
        check_range(dx1.into(), 0, MAX_DX, "dx1")?;
        self.record.write().dx1 = dx1 as u16;
        Ok(())
    }

    fn dy1(&self) -> i32 {
        self.record.read().dy1.into()
    }

    fn set_dy1(&mut self, dy1: i32) -> Result<()> {
        check_range(dy1.into(), 0, MAX_DY, "dy1")?;
        self.record.write().dy1 = dy1 as u16;
        Ok(())
    }

    fn dx2(&self) -> i32 {
        self.record.read().dx2.into()
    }

    fn set_dx2(&mut self, dx2: i32) -> Result<()> {
        check_range(dx2.into(), 0, MAX_DX, "dx2")?;
        self.record.write().dx2 = dx2 as u16;
        Ok(())
    }

    fn dy2(&self) -> i32 {
        self.record.read().dy2.into()
    }

    fn set_dy2(&mut self, dy2: i32) -> Result<()> {
        check_range(dy2.into(), 0, MAX_DY, "dy2")?;
        self.record.write().dy2 = dy2 as u16;
        Ok(())
    }

    fn is_horizontally_flipped(&self) -> bool {
        self.horizontally_flipped
    }

    fn is_vertically_flipped(&self) -> bool {
        self.vertically_flipped
    }

    fn escher_anchor(&self) -> EscherRecord {
        EscherRecord::ClientAnchor(self.record.clone())
    }
}
