//! BIFF record parsing for worksheet substreams
//!
//! Only the records that shape the row-height model are decoded here:
//! ROW and DEFAULTROWHEIGHT. Every other record is surfaced raw so callers can
//! skip it.

use std::io::{Read, Seek, SeekFrom};

use crate::common::binary::read_u16_le;
use crate::common::{Error, Result};

/// ROW record id
pub const ROW: u16 = 0x0208;
/// DEFAULTROWHEIGHT record id
pub const DEFAULT_ROW_HEIGHT: u16 = 0x0225;

/// BIFF record header (4 bytes: type + length)
#[derive(Debug, Clone)]
pub struct RecordHeader {
    pub record_type: u16,
    pub data_len: u16,
}

impl RecordHeader {
    /// Parse record header from stream
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        let record_type = u16::from_le_bytes([buf[0], buf[1]]);
        let data_len = u16::from_le_bytes([buf[2], buf[3]]);

        Ok(RecordHeader {
            record_type,
            data_len,
        })
    }
}

/// Iterator over BIFF records in a stream
pub struct RecordIter<R> {
    reader: R,
    stream_len: u64,
    current_pos: u64,
}

impl<R: Read + Seek> RecordIter<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        Ok(RecordIter {
            reader,
            stream_len,
            current_pos: 0,
        })
    }
}

impl<R: Read + Seek> Iterator for RecordIter<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_pos >= self.stream_len {
            return None;
        }

        match Record::read(&mut self.reader) {
            Ok(record) => {
                self.current_pos += 4 + record.header.data_len as u64;
                Some(Ok(record))
            },
            Err(e) => {
                // A torn record leaves the stream position undefined
                self.current_pos = self.stream_len;
                Some(Err(e))
            },
        }
    }
}

/// A BIFF record with header and data
#[derive(Debug, Clone)]
pub struct Record {
    pub header: RecordHeader,
    pub data: Vec<u8>,
}

impl Record {
    /// Read a complete record from the stream
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let header = RecordHeader::read(reader)?;

        let mut data = vec![0u8; header.data_len as usize];
        reader.read_exact(&mut data)?;

        Ok(Record { header, data })
    }
}

/// ROW record (row properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRecord {
    /// Zero-based row index
    pub row: u16,
    /// Raw height field: low 15 bits are twips, bit 15 marks default height
    pub raw_height: u16,
}

impl RowRecord {
    const DEFAULT_HEIGHT_BIT: u16 = 0x8000;

    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(Error::InvalidRecord {
                record_type: ROW,
                message: format!("ROW needs at least 8 bytes, found {}", data.len()),
            });
        }

        Ok(RowRecord {
            row: read_u16_le(data, 0)?,
            raw_height: read_u16_le(data, 6)?,
        })
    }

    /// Explicit row height in twips, or `None` when the row uses the sheet default.
    pub fn height_twips(&self) -> Option<u16> {
        if self.raw_height & Self::DEFAULT_HEIGHT_BIT != 0 {
            None
        } else {
            Some(self.raw_height & !Self::DEFAULT_HEIGHT_BIT)
        }
    }
}

/// DEFAULTROWHEIGHT record (sheet-wide row height)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultRowHeightRecord {
    pub options: u16,
    /// Height in twips
    pub height: u16,
}

impl DefaultRowHeightRecord {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::InvalidRecord {
                record_type: DEFAULT_ROW_HEIGHT,
                message: format!(
                    "DEFAULTROWHEIGHT needs 4 bytes, found {}",
                    data.len()
                ),
            });
        }

        Ok(DefaultRowHeightRecord {
            options: read_u16_le(data, 0)?,
            height: read_u16_le(data, 2)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn encode_record(record_type: u16, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + data.len());
    out.extend_from_slice(&record_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.extend_from_slice(data);
    out
}
