//! Escher record header.
//!
//! # Format
//!
//! Escher records have an 8-byte header:
//! - Bytes 0-1: Version (4 bits) | Instance (12 bits)
//! - Bytes 2-3: Record Type
//! - Bytes 4-7: Record Length (32-bit, excluding the header)

use super::types::EscherRecordType;
use crate::common::{Error, Result};
use std::io::Write;
use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{FromBytes, IntoBytes};
use zerocopy_derive::*;

/// Version nibble carried by every container record.
pub const CONTAINER_VERSION: u8 = 0x0F;

/// Escher record header (8 bytes) - zerocopy compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct EscherRecordHeader {
    ver_inst: U16<LittleEndian>,
    rec_type: U16<LittleEndian>,
    length: U32<LittleEndian>,
}

impl EscherRecordHeader {
    /// Encoded size of the header.
    pub const SIZE: usize = 8;

    pub fn new(version: u8, instance: u16, rec_type: u16, length: u32) -> Self {
        let ver_inst = (version as u16 & 0x0F) | ((instance & 0x0FFF) << 4);
        Self {
            ver_inst: U16::new(ver_inst),
            rec_type: U16::new(rec_type),
            length: U32::new(length),
        }
    }

    pub fn container(rec_type: u16, instance: u16, length: u32) -> Self {
        Self::new(CONTAINER_VERSION, instance, rec_type, length)
    }

    /// Decode the header at `offset`.
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let bytes = data
            .get(offset..offset + Self::SIZE)
            .ok_or(Error::InsufficientData {
                expected: offset + Self::SIZE,
                available: data.len(),
            })?;
        Self::read_from_bytes(bytes).map_err(|_| Error::InvalidRecord {
            record_type: 0,
            message: "unreadable Escher record header".to_string(),
        })
    }

    #[inline]
    pub fn version(&self) -> u8 {
        (self.ver_inst.get() & 0x000F) as u8
    }

    #[inline]
    pub fn instance(&self) -> u16 {
        (self.ver_inst.get() >> 4) & 0x0FFF
    }

    #[inline]
    pub fn record_type_raw(&self) -> u16 {
        self.rec_type.get()
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.rec_type.get())
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Container records have version 0xF or a container type id.
    #[inline]
    pub fn is_container(&self) -> bool {
        self.version() == CONTAINER_VERSION || self.record_type().is_container()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let data = [0x0F, 0x00, 0x04, 0xF0, 0x20, 0x00, 0x00, 0x00];
        let header = EscherRecordHeader::parse(&data, 0).unwrap();
        assert_eq!(header.version(), 0x0F);
        assert_eq!(header.instance(), 0);
        assert_eq!(header.record_type(), EscherRecordType::SpContainer);
        assert_eq!(header.length(), 0x20);
        assert!(header.is_container());
    }

    #[test]
    fn test_header_bytes() {
        let header = EscherRecordHeader::new(0x02, 0x0CA, 0xF00A, 8);
        let mut out = Vec::new();
        header.write_to(&mut out).unwrap();
        assert_eq!(out, vec![0xA2, 0x0C, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00]);
        assert_eq!(header.instance(), 0x0CA);
        assert_eq!(header.version(), 0x02);
    }

    #[test]
    fn test_truncated_header() {
        let data = [0x00, 0x00, 0x10, 0xF0];
        assert!(matches!(
            EscherRecordHeader::parse(&data, 0),
            Err(Error::InsufficientData { expected: 8, .. })
        ));
    }
}
