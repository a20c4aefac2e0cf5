//! Office binary (OLE2) format support.
//!
//! - `escher`: OfficeArt drawing records shared by the binary formats
//! - `xls`: worksheet anchors and row heights

pub mod escher;
pub mod xls;
