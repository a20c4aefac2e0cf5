//! OfficeArt (Escher) drawing records for the spreadsheet drawing layer.
//!
//! Escher is Microsoft's drawing layer format used across Office binary
//! formats. Shapes on a worksheet are stored as a tree of container records;
//! each shape container carries an anchor record that fixes its position.
//!
//! # Modules
//!
//! - `types`: Escher record type definitions
//! - `header`: 8-byte record header
//! - `anchor_records`: ChildAnchor and ClientAnchor atoms
//! - `container`: owned record tree with lookup, parsing and writing

pub mod anchor_records;
pub mod container;
pub mod header;
pub mod types;

pub use anchor_records::{EscherChildAnchorRecord, EscherClientAnchorRecord};
pub use container::{EscherAtomRecord, EscherContainerRecord, EscherRecord};
pub use header::EscherRecordHeader;
pub use types::EscherRecordType;
