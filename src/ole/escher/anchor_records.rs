//! ChildAnchor and ClientAnchor atom records.
//!
//! These records hold the raw position fields of a shape. The anchor layer in
//! `ole::xls::anchor` wraps them by reference and never copies their values.
//!
//! # Format
//!
//! - ChildAnchor (0xF00F): four little-endian `i32` values, 16 bytes.
//! - ClientAnchor (0xF010): nine little-endian `u16` values, 18 bytes, in the
//!   order flag, col1, dx1, row1, dy1, col2, dx2, row2, dy2. Some writers emit
//!   a shortened 8-byte body that stops after row1.

use super::header::EscherRecordHeader;
use super::types::EscherRecordType;
use crate::common::binary::{read_i32_le, read_u16_le, read_u16_le_or_zero};
use crate::common::{Error, Result};
use std::io::Write;
use zerocopy::IntoBytes;
use zerocopy::byteorder::{I32, LittleEndian, U16};
use zerocopy_derive::*;

/// Shape position inside the coordinate space of its parent group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EscherChildAnchorRecord {
    pub dx1: i32,
    pub dy1: i32,
    pub dx2: i32,
    pub dy2: i32,
}

#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct ChildAnchorData {
    dx1: I32<LittleEndian>,
    dy1: I32<LittleEndian>,
    dx2: I32<LittleEndian>,
    dy2: I32<LittleEndian>,
}

impl EscherChildAnchorRecord {
    pub const RECORD_ID: EscherRecordType = EscherRecordType::ChildAnchor;
    /// Body length in bytes.
    pub const DATA_SIZE: usize = 16;

    /// Decode a record body (header already stripped).
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::DATA_SIZE {
            return Err(Error::InvalidRecord {
                record_type: Self::RECORD_ID.into(),
                message: format!(
                    "child anchor needs {} bytes, found {}",
                    Self::DATA_SIZE,
                    data.len()
                ),
            });
        }

        Ok(Self {
            dx1: read_i32_le(data, 0)?,
            dy1: read_i32_le(data, 4)?,
            dx2: read_i32_le(data, 8)?,
            dy2: read_i32_le(data, 12)?,
        })
    }

    #[inline]
    pub const fn serialized_size(&self) -> usize {
        EscherRecordHeader::SIZE + Self::DATA_SIZE
    }

    /// Write header and body.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        EscherRecordHeader::new(0x00, 0, Self::RECORD_ID.into(), Self::DATA_SIZE as u32)
            .write_to(writer)?;
        let body = ChildAnchorData {
            dx1: I32::new(self.dx1),
            dy1: I32::new(self.dy1),
            dx2: I32::new(self.dx2),
            dy2: I32::new(self.dy2),
        };
        writer.write_all(body.as_bytes())?;
        Ok(())
    }
}

/// Shape position on the worksheet grid.
///
/// `flag` carries the anchor type (0 = move and size with cells, 2 = move but
/// don't size, 3 = don't move or size). Rows and columns are zero based; `dx`
/// values are 1/1024ths of a column and `dy` values 1/256ths of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EscherClientAnchorRecord {
    pub flag: u16,
    pub col1: u16,
    pub dx1: u16,
    pub row1: u16,
    pub dy1: u16,
    pub col2: u16,
    pub dx2: u16,
    pub row2: u16,
    pub dy2: u16,
}

#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct ClientAnchorData {
    flag: U16<LittleEndian>,
    col1: U16<LittleEndian>,
    dx1: U16<LittleEndian>,
    row1: U16<LittleEndian>,
    dy1: U16<LittleEndian>,
    col2: U16<LittleEndian>,
    dx2: U16<LittleEndian>,
    row2: U16<LittleEndian>,
    dy2: U16<LittleEndian>,
}

impl EscherClientAnchorRecord {
    pub const RECORD_ID: EscherRecordType = EscherRecordType::ClientAnchor;
    /// Body length in bytes.
    pub const DATA_SIZE: usize = 18;
    /// Shortest body accepted on read (flag, col1, dx1, row1).
    pub const SHORT_DATA_SIZE: usize = 8;

    /// Decode a record body (header already stripped).
    ///
    /// Fields missing from a shortened body read as zero.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SHORT_DATA_SIZE {
            return Err(Error::InvalidRecord {
                record_type: Self::RECORD_ID.into(),
                message: format!(
                    "client anchor needs at least {} bytes, found {}",
                    Self::SHORT_DATA_SIZE,
                    data.len()
                ),
            });
        }

        Ok(Self {
            flag: read_u16_le(data, 0)?,
            col1: read_u16_le(data, 2)?,
            dx1: read_u16_le(data, 4)?,
            row1: read_u16_le(data, 6)?,
            dy1: read_u16_le_or_zero(data, 8),
            col2: read_u16_le_or_zero(data, 10),
            dx2: read_u16_le_or_zero(data, 12),
            row2: read_u16_le_or_zero(data, 14),
            dy2: read_u16_le_or_zero(data, 16),
        })
    }

    #[inline]
    pub const fn serialized_size(&self) -> usize {
        EscherRecordHeader::SIZE + Self::DATA_SIZE
    }

    /// Write header and the full 18-byte body.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        EscherRecordHeader::new(0x00, 0, Self::RECORD_ID.into(), Self::DATA_SIZE as u32)
            .write_to(writer)?;
        let body = ClientAnchorData {
            flag: U16::new(self.flag),
            col1: U16::new(self.col1),
            dx1: U16::new(self.dx1),
            row1: U16::new(self.row1),
            dy1: U16::new(self.dy1),
            col2: U16::new(self.col2),
            dx2: U16::new(self.dx2),
            row2: U16::new(self.row2),
            dy2: U16::new(self.dy2),
        };
        writer.write_all(body.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_anchor_layout() {
        let record = EscherChildAnchorRecord {
            dx1: 10,
            dy1: -20,
            dx2: 300,
            dy2: 400,
        };
        let mut out = Vec::new();
        record.write_to(&mut out).unwrap();
        assert_eq!(out.len(), record.serialized_size());
        assert_eq!(&out[2..4], &[0x0F, 0xF0]);
        assert_eq!(&out[4..8], &[16, 0, 0, 0]);
        assert_eq!(&out[12..16], &(-20i32).to_le_bytes());
        assert_eq!(EscherChildAnchorRecord::parse(&out[8..]).unwrap(), record);
    }

    #[test]
    fn test_child_anchor_too_short() {
        assert!(matches!(
            EscherChildAnchorRecord::parse(&[0u8; 12]),
            Err(Error::InvalidRecord {
                record_type: 0xF00F,
                ..
            })
        ));
    }

    #[test]
    fn test_client_anchor_field_order() {
        let body: Vec<u8> = (1u16..=9).flat_map(|v| v.to_le_bytes()).collect();
        let record = EscherClientAnchorRecord::parse(&body).unwrap();
        assert_eq!(record.flag, 1);
        assert_eq!(record.col1, 2);
        assert_eq!(record.dx1, 3);
        assert_eq!(record.row1, 4);
        assert_eq!(record.dy1, 5);
        assert_eq!(record.col2, 6);
        assert_eq!(record.dx2, 7);
        assert_eq!(record.row2, 8);
        assert_eq!(record.dy2, 9);

        let mut out = Vec::new();
        record.write_to(&mut out).unwrap();
        assert_eq!(&out[8..], body.as_slice());
    }

    #[test]
    fn test_client_anchor_short_body() {
        let body = [0x02, 0x00, 0x01, 0x00, 0x40, 0x00, 0x05, 0x00];
        let record = EscherClientAnchorRecord::parse(&body).unwrap();
        assert_eq!(record.flag, 2);
        assert_eq!(record.row1, 5);
        assert_eq!(record.dy1, 0);
        assert_eq!(record.row2, 0);

        assert!(EscherClientAnchorRecord::parse(&body[..6]).is_err());
    }
}
