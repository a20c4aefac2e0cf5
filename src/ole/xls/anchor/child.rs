//! Anchor inside a parent group's coordinate space.

use super::Anchor;
use crate::common::{Result, SharedRecord};
use crate::ole::escher::{EscherChildAnchorRecord, EscherRecord};

/// Position of a shape relative to the group that contains it.
///
/// The four offsets are passed straight through to the backing record; they
/// carry no range restriction beyond the record's 32-bit storage, and the
/// corners are never reordered, so the flip flags are always `false`.
#[derive(Debug, Clone, Default)]
pub struct ChildAnchor {
    record: SharedRecord<EscherChildAnchorRecord>,
}

impl ChildAnchor {
    /// Allocate a fresh zeroed record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offsets(dx1: i32, dy1: i32, dx2: i32, dy2: i32) -> Self {
        Self::from_record(SharedRecord::new(EscherChildAnchorRecord {
            dx1,
            dy1,
            dx2,
            dy2,
        }))
    }

    /// Wrap an existing record; reads and writes go through to it.
    pub fn from_record(record: SharedRecord<EscherChildAnchorRecord>) -> Self {
        Self { record }
    }

    #[inline]
    pub fn escher_record(&self) -> &SharedRecord<EscherChildAnchorRecord> {
        &self.record
    }
}

impl Anchor for ChildAnchor {
    fn dx1(&self) -> i32 {
        self.record.read().dx1
    }

    fn set_dx1(&mut self, dx1: i32) -> Result<()> {
        self.record.write().dx1 = dx1;
        Ok(())
    }

    fn dy1(&self) -> i32 {
        self.record.read().dy1
    }

    fn set_dy1(&mut self, dy1: i32) -> Result<()> {
        self.record.write().dy1 = dy1;
        Ok(())
    }

    fn dx2(&self) -> i32 {
        self.record.read().dx2
    }

    fn set_dx2(&mut self, dx2: i32) -> Result<()> {
        self.record.write().dx2 = dx2;
        Ok(())
    }

    fn dy2(&self) -> i32 {
        self.record.read().dy2
    }

    fn set_dy2(&mut self, dy2: i32) -> Result<()> {
        self.record.write().dy2 = dy2;
        Ok(())
    }

    fn is_horizontally_flipped(&self) -> bool {
        false
    }

    fn is_vertically_flipped(&self) -> bool {
        false
    }

    fn escher_anchor(&self) -> EscherRecord {
        EscherRecord::ChildAnchor(self.record.clone())
    }
}
