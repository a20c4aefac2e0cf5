//! Owned Escher record tree.
//!
//! Unlike a read-only walk over borrowed bytes, the drawing layer needs to
//! mutate anchor records in place and write the tree back out. Anchor records
//! are therefore stored behind [`SharedRecord`] handles: a view that wraps an
//! anchor and the container that owns it see the same storage.

use super::anchor_records::{EscherChildAnchorRecord, EscherClientAnchorRecord};
use super::header::EscherRecordHeader;
use super::types::EscherRecordType;
use crate::common::{Error, Result, SharedRecord};
use std::io::Write;

/// Deepest container nesting accepted by the parser.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Any record that is neither a container nor an anchor, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherAtomRecord {
    pub version: u8,
    pub instance: u16,
    pub record_type_raw: u16,
    pub data: Vec<u8>,
}

impl EscherAtomRecord {
    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_type_raw)
    }
}

/// A node of the record tree.
#[derive(Debug, Clone)]
pub enum EscherRecord {
    ChildAnchor(SharedRecord<EscherChildAnchorRecord>),
    ClientAnchor(SharedRecord<EscherClientAnchorRecord>),
    Container(EscherContainerRecord),
    Atom(EscherAtomRecord),
}

impl EscherRecord {
    /// Parse one record starting at `offset`.
    ///
    /// # Returns
    ///
    /// `(record, bytes_consumed)` tuple
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        Self::parse_at_depth(data, offset, 0)
    }

    fn parse_at_depth(data: &[u8], offset: usize, depth: usize) -> Result<(Self, usize)> {
        let header = EscherRecordHeader::parse(data, offset)?;
        let body_start = offset + EscherRecordHeader::SIZE;
        let body_end = body_start + header.length() as usize;
        let body = data
            .get(body_start..body_end)
            .ok_or_else(|| Error::InvalidRecord {
                record_type: header.record_type_raw(),
                message: format!(
                    "record data extends beyond bounds: offset={}, length={}, data_len={}",
                    offset,
                    header.length(),
                    data.len()
                ),
            })?;

        let record = if header.is_container() {
            if depth >= MAX_NESTING_DEPTH {
                return Err(Error::InvalidRecord {
                    record_type: header.record_type_raw(),
                    message: "container nesting too deep".to_string(),
                });
            }
            let mut container = EscherContainerRecord::with_raw_type(
                header.record_type_raw(),
                header.instance(),
            );
            container.parse_children(body, depth)?;
            EscherRecord::Container(container)
        } else {
            match header.record_type() {
                EscherRecordType::ChildAnchor => EscherRecord::ChildAnchor(SharedRecord::new(
                    EscherChildAnchorRecord::parse(body)?,
                )),
                EscherRecordType::ClientAnchor => EscherRecord::ClientAnchor(SharedRecord::new(
                    EscherClientAnchorRecord::parse(body)?,
                )),
                _ => EscherRecord::Atom(EscherAtomRecord {
                    version: header.version(),
                    instance: header.instance(),
                    record_type_raw: header.record_type_raw(),
                    data: body.to_vec(),
                }),
            }
        };

        Ok((record, EscherRecordHeader::SIZE + body.len()))
    }

    /// Raw record type id.
    pub fn record_id(&self) -> u16 {
        match self {
            EscherRecord::ChildAnchor(_) => EscherChildAnchorRecord::RECORD_ID.into(),
            EscherRecord::ClientAnchor(_) => EscherClientAnchorRecord::RECORD_ID.into(),
            EscherRecord::Container(c) => c.record_type_raw,
            EscherRecord::Atom(a) => a.record_type_raw,
        }
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_id())
    }

    /// Encoded size including the header.
    pub fn serialized_size(&self) -> usize {
        match self {
            EscherRecord::ChildAnchor(r) => r.read().serialized_size(),
            EscherRecord::ClientAnchor(r) => r.read().serialized_size(),
            EscherRecord::Container(c) => c.serialized_size(),
            EscherRecord::Atom(a) => EscherRecordHeader::SIZE + a.data.len(),
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            EscherRecord::ChildAnchor(r) => r.read().write_to(writer),
            EscherRecord::ClientAnchor(r) => r.read().write_to(writer),
            EscherRecord::Container(c) => c.write_to(writer),
            EscherRecord::Atom(a) => {
                EscherRecordHeader::new(
                    a.version,
                    a.instance,
                    a.record_type_raw,
                    a.data.len() as u32,
                )
                .write_to(writer)?;
                writer.write_all(&a.data)?;
                Ok(())
            },
        }
    }

    #[inline]
    pub fn as_container(&self) -> Option<&EscherContainerRecord> {
        match self {
            EscherRecord::Container(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_child_anchor(&self) -> Option<&SharedRecord<EscherChildAnchorRecord>> {
        match self {
            EscherRecord::ChildAnchor(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_client_anchor(&self) -> Option<&SharedRecord<EscherClientAnchorRecord>> {
        match self {
            EscherRecord::ClientAnchor(r) => Some(r),
            _ => None,
        }
    }
}

/// A container record and its immediate children.
#[derive(Debug, Clone)]
pub struct EscherContainerRecord {
    record_type_raw: u16,
    instance: u16,
    children: Vec<EscherRecord>,
}

impl EscherContainerRecord {
    /// Create an empty container of the given kind.
    pub fn new(record_type: EscherRecordType) -> Self {
        Self::with_raw_type(record_type.into(), 0)
    }

    fn with_raw_type(record_type_raw: u16, instance: u16) -> Self {
        Self {
            record_type_raw,
            instance,
            children: Vec::new(),
        }
    }

    /// Parse a complete container record (header included).
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (record, _) = EscherRecord::parse(data, 0)?;
        match record {
            EscherRecord::Container(container) => Ok(container),
            other => Err(Error::InvalidRecord {
                record_type: other.record_id(),
                message: "expected a container record".to_string(),
            }),
        }
    }

    /// Trailing bytes too short to hold a header are ignored.
    fn parse_children(&mut self, body: &[u8], depth: usize) -> Result<()> {
        let mut offset = 0;
        while offset + EscherRecordHeader::SIZE <= body.len() {
            let (child, consumed) = EscherRecord::parse_at_depth(body, offset, depth + 1)?;
            self.children.push(child);
            offset += consumed;
        }
        Ok(())
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_type_raw)
    }

    #[inline]
    pub fn children(&self) -> &[EscherRecord] {
        &self.children
    }

    pub fn add_child(&mut self, child: EscherRecord) {
        self.children.push(child);
    }

    /// Find the first immediate child of a specific type.
    pub fn child_by_id(&self, record_type: EscherRecordType) -> Option<&EscherRecord> {
        let id = u16::from(record_type);
        self.children.iter().find(|c| c.record_id() == id)
    }

    /// Encoded size including the header.
    pub fn serialized_size(&self) -> usize {
        EscherRecordHeader::SIZE + self.body_size()
    }

    fn body_size(&self) -> usize {
        self.children.iter().map(EscherRecord::serialized_size).sum()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        EscherRecordHeader::container(
            self.record_type_raw,
            self.instance,
            self.body_size() as u32,
        )
        .write_to(writer)?;
        for child in &self.children {
            child.write_to(writer)?;
        }
        Ok(())
    }

    /// Serialize into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_size());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp_container_bytes() -> Vec<u8> {
        let mut body = Vec::new();
        // Sp atom: version 2, instance 1 (rectangle), spid + flags
        body.extend_from_slice(&[0x12, 0x00, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00]);
        body.extend_from_slice(&[0x01, 0x04, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00]);
        // ClientAnchor atom
        body.extend_from_slice(&[0x00, 0x00, 0x10, 0xF0, 0x12, 0x00, 0x00, 0x00]);
        for v in [0u16, 1, 0, 2, 64, 3, 0, 4, 128] {
            body.extend_from_slice(&v.to_le_bytes());
        }

        let mut data = vec![0x0F, 0x00, 0x04, 0xF0];
        data.extend_from_slice(&(body.len() as u32).to_le_bytes());
        data.extend_from_slice(&body);
        data
    }

    #[test]
    fn test_parse_container() {
        let container = EscherContainerRecord::parse(&sp_container_bytes()).unwrap();
        assert_eq!(container.record_type(), EscherRecordType::SpContainer);
        assert_eq!(container.children().len(), 2);

        let sp = container.child_by_id(EscherRecordType::Sp).unwrap();
        assert!(matches!(sp, EscherRecord::Atom(a) if a.instance == 1));

        let anchor = container
            .child_by_id(EscherRecordType::ClientAnchor)
            .and_then(EscherRecord::as_client_anchor)
            .unwrap();
        assert_eq!(anchor.read().row1, 2);
        assert_eq!(anchor.read().dy2, 128);
        assert!(container.child_by_id(EscherRecordType::ChildAnchor).is_none());
    }

    #[test]
    fn test_write_reproduces_input() {
        let data = sp_container_bytes();
        let container = EscherContainerRecord::parse(&data).unwrap();
        assert_eq!(container.serialized_size(), data.len());
        assert_eq!(container.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_child_handle_shares_storage() {
        let container = EscherContainerRecord::parse(&sp_container_bytes()).unwrap();
        let handle = container
            .child_by_id(EscherRecordType::ClientAnchor)
            .and_then(EscherRecord::as_client_anchor)
            .cloned()
            .unwrap();
        handle.write().col2 = 9;

        let bytes = container.to_bytes().unwrap();
        let reparsed = EscherContainerRecord::parse(&bytes).unwrap();
        let col2 = reparsed
            .child_by_id(EscherRecordType::ClientAnchor)
            .and_then(EscherRecord::as_client_anchor)
            .map(|r| r.read().col2);
        assert_eq!(col2, Some(9));
    }

    #[test]
    fn test_nested_containers() {
        let mut group = EscherContainerRecord::new(EscherRecordType::SpgrContainer);
        let mut shape = EscherContainerRecord::new(EscherRecordType::SpContainer);
        shape.add_child(EscherRecord::ChildAnchor(SharedRecord::new(
            EscherChildAnchorRecord {
                dx1: 1,
                dy1: 2,
                dx2: 3,
                dy2: 4,
            },
        )));
        group.add_child(EscherRecord::Container(shape));

        let bytes = group.to_bytes().unwrap();
        let parsed = EscherContainerRecord::parse(&bytes).unwrap();
        let inner = parsed
            .child_by_id(EscherRecordType::SpContainer)
            .and_then(EscherRecord::as_container)
            .unwrap();
        let anchor = inner
            .child_by_id(EscherRecordType::ChildAnchor)
            .and_then(EscherRecord::as_child_anchor)
            .unwrap();
        assert_eq!(anchor.read().dy2, 4);
        // lookup is limited to immediate children
        assert!(parsed.child_by_id(EscherRecordType::ChildAnchor).is_none());
    }

    #[test]
    fn test_overrunning_child_is_rejected() {
        let mut data = sp_container_bytes();
        // claim the client anchor body is longer than the container
        data[8 + 16 + 4] = 0x40;
        assert!(matches!(
            EscherContainerRecord::parse(&data),
            Err(Error::InvalidRecord {
                record_type: 0xF010,
                ..
            })
        ));
    }

    // SpgrContainer headers, each claiming the rest of the buffer
    fn nested_groups(levels: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(levels * 8);
        for level in 0..levels {
            let remaining = ((levels - level - 1) * 8) as u32;
            data.extend_from_slice(&[0x0F, 0x00, 0x03, 0xF0]);
            data.extend_from_slice(&remaining.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_nesting_at_limit_parses() {
        let data = nested_groups(MAX_NESTING_DEPTH);
        let mut container = EscherContainerRecord::parse(&data).unwrap();
        let mut levels = 1;
        while let Some(inner) = container
            .child_by_id(EscherRecordType::SpgrContainer)
            .and_then(EscherRecord::as_container)
            .cloned()
        {
            container = inner;
            levels += 1;
        }
        assert_eq!(levels, MAX_NESTING_DEPTH);
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        for levels in [MAX_NESTING_DEPTH + 1, 200_000] {
            let data = nested_groups(levels);
            match EscherContainerRecord::parse(&data) {
                Err(Error::InvalidRecord {
                    record_type,
                    message,
                }) => {
                    assert_eq!(record_type, 0xF003);
                    assert_eq!(message, "container nesting too deep");
                },
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_trailing_padding_is_ignored() {
        let mut data = sp_container_bytes();
        data.extend_from_slice(&[0, 0, 0]);
        let body_len = (data.len() - 8) as u32;
        data[4..8].copy_from_slice(&body_len.to_le_bytes());

        let container = EscherContainerRecord::parse(&data).unwrap();
        assert_eq!(container.children().len(), 2);
        // padding is not written back
        assert_eq!(container.to_bytes().unwrap(), sp_container_bytes());
    }

    #[test]
    fn test_atom_is_not_a_container() {
        let data = [0x00, 0x00, 0x11, 0xF0, 0x00, 0x00, 0x00, 0x00];
        assert!(EscherContainerRecord::parse(&data).is_err());
    }
}
