//! Litchi Anchor - shape anchors for legacy Excel drawings
//!
//! Every shape in an `.xls` drawing carries an anchor record that fixes its
//! position, either inside a parent group (child anchor) or on the worksheet
//! grid (client anchor). This crate wraps those OfficeArt (Escher) records
//! with a typed, range-checked API and measures client anchors in points.
//!
//! # Features
//!
//! - **Escher records**: parse and write shape containers and anchor atoms
//! - **Write-through anchors**: anchors forward to the record they wrap
//! - **Range checking**: cell coordinates and offsets are validated
//! - **Height conversion**: integrate an anchor over variable row heights
//!
//! # Example
//!
//! ```rust
//! use litchi_anchor::ole::xls::{Anchor, ClientAnchor, RowHeights};
//!
//! # fn main() -> litchi_anchor::Result<()> {
//! // rows 1..=3, starting a quarter into row 1 and ending three quarters into row 3
//! let anchor = ClientAnchor::with_coordinates(0, 64, 0, 192, 0, 1, 2, 3)?;
//! let rows = RowHeights::new().with_default_height_twips(300);
//!
//! assert_eq!(anchor.anchor_height_in_points(&rows), 37.5);
//! assert!(!anchor.is_vertically_flipped());
//! # Ok(())
//! # }
//! ```

/// Shared error type, binary readers and record handles
pub mod common;

/// OLE2 binary formats: Escher drawing records and XLS anchors
pub mod ole;

pub use common::{Error, Result, SharedRecord};
pub use ole::escher::{EscherContainerRecord, EscherRecord, EscherRecordType};
pub use ole::xls::{
    Anchor, AnchorOptions, AnchorType, AnchorTypeValidation, ChildAnchor, ClientAnchor,
    RowHeightSource, RowHeights, ShapeAnchor,
};
