//! Shape anchors.
//!
//! An anchor fixes where a shape sits. A [`ChildAnchor`] places it inside the
//! coordinate space of its parent group; a [`ClientAnchor`] pins it to
//! worksheet cells. Both forward every read and write to the Escher record
//! they wrap, so changes are visible to whoever else holds that record.
//!
//! # Example
//!
//! ```rust
//! use litchi_anchor::ole::escher::{EscherContainerRecord, EscherRecordType};
//! use litchi_anchor::ole::xls::{Anchor, ClientAnchor, ShapeAnchor};
//!
//! # fn main() -> litchi_anchor::Result<()> {
//! let anchor = ClientAnchor::with_coordinates(0, 0, 0, 128, 1, 1, 3, 4)?;
//! let mut shape = EscherContainerRecord::new(EscherRecordType::SpContainer);
//! shape.add_child(anchor.escher_anchor());
//!
//! match ShapeAnchor::from_container(&shape) {
//!     Some(ShapeAnchor::Client(found)) => assert_eq!(found, anchor),
//!     other => panic!("unexpected anchor: {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```

mod child;
mod client;
mod options;
mod range;

pub use child::ChildAnchor;
pub use client::{AnchorType, ClientAnchor};
pub use options::{AnchorOptions, AnchorTypeValidation};
pub use range::{MAX_COL, MAX_DX, MAX_DY, MAX_ROW};

use tracing::{debug, trace};

use crate::common::Result;
use crate::ole::escher::{EscherContainerRecord, EscherRecord, EscherRecordType};

/// Operations shared by every anchor kind.
///
/// Offsets are expressed in the anchor's own frame: group units for
/// child anchors, fractions of a cell for client anchors. Range enforcement
/// belongs to each implementation.
pub trait Anchor {
    fn dx1(&self) -> i32;
    fn set_dx1(&mut self, dx1: i32) -> Result<()>;

    fn dy1(&self) -> i32;
    fn set_dy1(&mut self, dy1: i32) -> Result<()>;

    fn dx2(&self) -> i32;
    fn set_dx2(&mut self, dx2: i32) -> Result<()>;

    fn dy2(&self) -> i32;
    fn set_dy2(&mut self, dy2: i32) -> Result<()>;

    /// True if the anchor was given right to left.
    fn is_horizontally_flipped(&self) -> bool;

    /// True if the anchor was given bottom to top.
    fn is_vertically_flipped(&self) -> bool;

    /// Handle to the backing record, ready to be placed in a container.
    fn escher_anchor(&self) -> EscherRecord;
}

/// The anchor of one shape, whichever kind it is.
#[derive(Debug, Clone)]
pub enum ShapeAnchor {
    Child(ChildAnchor),
    Client(ClientAnchor),
}

impl ShapeAnchor {
    /// Find the anchor among the immediate children of a shape container.
    ///
    /// A child anchor wins over a client anchor. `None` means the shape has no
    /// position information, which is not an error.
    pub fn from_container(container: &EscherContainerRecord) -> Option<Self> {
        Self::from_container_with_options(container, AnchorOptions::default())
    }

    /// Like [`ShapeAnchor::from_container`], applying `options` to a client anchor.
    pub fn from_container_with_options(
        container: &EscherContainerRecord,
        options: AnchorOptions,
    ) -> Option<Self> {
        if let Some(record) = container
            .child_by_id(EscherRecordType::ChildAnchor)
            .and_then(EscherRecord::as_child_anchor)
        {
            debug!("shape positioned by child anchor");
            return Some(ShapeAnchor::Child(ChildAnchor::from_record(record.clone())));
        }

        if let Some(record) = container
            .child_by_id(EscherRecordType::ClientAnchor)
            .and_then(EscherRecord::as_client_anchor)
        {
            debug!("shape positioned by client anchor");
            return Some(ShapeAnchor::Client(
                ClientAnchor::from_record(record.clone()).with_options(options),
            ));
        }

        trace!(
            container_type = ?container.record_type(),
            "container has no anchor record"
        );
        None
    }

    #[inline]
    pub fn as_child(&self) -> Option<&ChildAnchor> {
        match self {
            ShapeAnchor::Child(anchor) => Some(anchor),
            ShapeAnchor::Client(_) => None,
        }
    }

    #[inline]
    pub fn as_client(&self) -> Option<&ClientAnchor> {
        match self {
            ShapeAnchor::Client(anchor) => Some(anchor),
            ShapeAnchor::Child(_) => None,
        }
    }

    #[inline]
    pub fn as_client_mut(&mut self) -> Option<&mut ClientAnchor> {
        match self {
            ShapeAnchor::Client(anchor) => Some(anchor),
            ShapeAnchor::Child(_) => None,
        }
    }

    fn inner(&self) -> &dyn Anchor {
        match self {
            ShapeAnchor::Child(anchor) => anchor,
            ShapeAnchor::Client(anchor) => anchor,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Anchor {
        match self {
            ShapeAnchor::Child(anchor) => anchor,
            ShapeAnchor::Client(anchor) => anchor,
        }
    }
}

impl From<ChildAnchor> for ShapeAnchor {
    fn from(anchor: ChildAnchor) -> Self {
        ShapeAnchor::Child(anchor)
    }
}

impl From<ClientAnchor> for ShapeAnchor {
    fn from(anchor: ClientAnchor) -> Self {
        ShapeAnchor::Client(anchor)
    }
}

impl Anchor for ShapeAnchor {
    fn dx1(&self) -> i32 {
        self.inner().dx1()
    }

    fn set_dx1(&mut self, dx1: i32) -> Result<()> {
        self.inner_mut().set_dx1(dx1)
    }

    fn dy1(&self) -> i32 {
        self.inner().dy1()
    }

    fn set_dy1(&mut self, dy1: i32) -> Result<()> {
        self.inner_mut().set_dy1(dy1)
    }

    fn dx2(&self) -> i32 {
        self.inner().dx2()
    }

    fn set_dx2(&mut self, dx2: i32) -> Result<()> {
        self.inner_mut().set_dx2(dx2)
    }

    fn dy2(&self) -> i32 {
        self.inner().dy2()
    }

    fn set_dy2(&mut self, dy2: i32) -> Result<()> {
        self.inner_mut().set_dy2(dy2)
    }

    fn is_horizontally_flipped(&self) -> bool {
        self.inner().is_horizontally_flipped()
    }

    fn is_vertically_flipped(&self) -> bool {
        self.inner().is_vertically_flipped()
    }

    fn escher_anchor(&self) -> EscherRecord {
        self.inner().escher_anchor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Error, SharedRecord};
    use crate::ole::escher::{EscherAtomRecord, EscherChildAnchorRecord, EscherClientAnchorRecord};

    fn shape_with(children: Vec<EscherRecord>) -> EscherContainerRecord {
        let mut container = EscherContainerRecord::new(EscherRecordType::SpContainer);
        container.add_child(EscherRecord::Atom(EscherAtomRecord {
            version: 2,
            instance: 1,
            record_type_raw: EscherRecordType::Sp.into(),
            data: vec![0; 8],
        }));
        for child in children {
            container.add_child(child);
        }
        container
    }

    #[test]
    fn test_child_anchor_dispatch() {
        let container = shape_with(vec![ChildAnchor::with_offsets(1, 2, 3, 4).escher_anchor()]);
        let anchor = ShapeAnchor::from_container(&container).unwrap();
        let child = anchor.as_child().unwrap();
        assert_eq!(child.dy2(), 4);
        assert!(anchor.as_client().is_none());
    }

    #[test]
    fn test_client_anchor_dispatch() {
        let container = shape_with(vec![EscherRecord::ClientAnchor(SharedRecord::new(
            EscherClientAnchorRecord {
                col2: 3,
                row2: 7,
                ..Default::default()
            },
        ))]);
        let anchor = ShapeAnchor::from_container(&container).unwrap();
        let client = anchor.as_client().unwrap();
        assert_eq!((client.col2(), client.row2()), (3, 7));
        assert!(!anchor.is_horizontally_flipped());
    }

    #[test]
    fn test_child_anchor_preferred() {
        let container = shape_with(vec![
            ClientAnchor::new().escher_anchor(),
            ChildAnchor::new().escher_anchor(),
        ]);
        assert!(matches!(
            ShapeAnchor::from_container(&container),
            Some(ShapeAnchor::Child(_))
        ));
    }

    #[test]
    fn test_no_anchor() {
        let container = shape_with(Vec::new());
        assert!(ShapeAnchor::from_container(&container).is_none());
    }

    #[test]
    fn test_anchor_writes_visible_in_container() {
        let record = SharedRecord::new(EscherChildAnchorRecord::default());
        let container = shape_with(vec![EscherRecord::ChildAnchor(record.clone())]);

        let mut anchor = ShapeAnchor::from_container(&container).unwrap();
        anchor.set_dx1(-250).unwrap();
        assert_eq!(record.read().dx1, -250);

        let stored = container
            .child_by_id(EscherRecordType::ChildAnchor)
            .and_then(EscherRecord::as_child_anchor)
            .map(|r| r.read().dx1);
        assert_eq!(stored, Some(-250));
    }

    #[test]
    fn test_shape_anchor_delegates_range_checks() {
        let container = shape_with(vec![ClientAnchor::new().escher_anchor()]);
        let mut anchor = ShapeAnchor::from_container(&container).unwrap();
        assert!(matches!(
            anchor.set_dy1(256),
            Err(Error::OutOfRange { field: "dy1", .. })
        ));
        anchor.set_dy1(255).unwrap();
        assert_eq!(anchor.dy1(), 255);
    }

    #[test]
    fn test_options_applied_to_client_anchor() {
        let container = shape_with(vec![ClientAnchor::new().escher_anchor()]);
        let options = AnchorOptions::new().with_anchor_type_validation(AnchorTypeValidation::Strict);
        let mut anchor = ShapeAnchor::from_container_with_options(&container, options).unwrap();
        let client = anchor.as_client_mut().unwrap();
        assert!(client.options().is_strict());
        assert!(client.set_anchor_type(AnchorType::Unknown(9)).is_err());
    }
}
