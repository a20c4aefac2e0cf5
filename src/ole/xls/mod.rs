//! Excel (.xls) drawing anchors and the row-height model they measure against.
//!
//! Shapes on a BIFF worksheet are stored as Escher records. This module wraps
//! their anchor records with range-checked accessors and converts a
//! cell-relative anchor into points using the sheet's row heights.

/// Anchor model and variant dispatch
pub mod anchor;

/// BIFF record parsing utilities
pub mod records;

/// Row-height lookup
pub mod rows;

pub use anchor::{
    Anchor, AnchorOptions, AnchorType, AnchorTypeValidation, ChildAnchor, ClientAnchor,
    ShapeAnchor,
};
pub use rows::{RowHeightSource, RowHeights};
