/// Escher record types used by the spreadsheet drawing layer.
///
/// Based on the MS-ODRAW specification. Only the records that appear inside a
/// shape container are named; everything else decodes as `Unknown` and keeps
/// its raw id on the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EscherRecordType {
    /// Unknown or unsupported record type
    Unknown = 0x0000,

    // Container records
    /// Drawing Container
    DgContainer = 0xF002,
    /// Shape Group Container
    SpgrContainer = 0xF003,
    /// Shape Container
    SpContainer = 0xF004,

    // Atom records
    /// Shape Group atom
    Spgr = 0xF009,
    /// Shape atom
    Sp = 0xF00A,
    /// Shape Options
    Opt = 0xF00B,
    /// Client Textbox
    ClientTextbox = 0xF00D,
    /// Child Anchor (position inside a group's coordinate space)
    ChildAnchor = 0xF00F,
    /// Client Anchor (position on the worksheet grid)
    ClientAnchor = 0xF010,
    /// Client Data
    ClientData = 0xF011,
}

impl EscherRecordType {
    /// Check if this is a container record type.
    ///
    /// Container records have version field 0xF (15) and can contain child records.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::DgContainer | Self::SpgrContainer | Self::SpContainer
        )
    }

    /// Check if this record type positions a shape.
    #[inline]
    pub const fn is_anchor(self) -> bool {
        matches!(self, Self::ChildAnchor | Self::ClientAnchor)
    }
}

impl From<u16> for EscherRecordType {
    fn from(value: u16) -> Self {
        match value {
            0xF002 => Self::DgContainer,
            0xF003 => Self::SpgrContainer,
            0xF004 => Self::SpContainer,
            0xF009 => Self::Spgr,
            0xF00A => Self::Sp,
            0xF00B => Self::Opt,
            0xF00D => Self::ClientTextbox,
            0xF00F => Self::ChildAnchor,
            0xF010 => Self::ClientAnchor,
            0xF011 => Self::ClientData,
            _ => Self::Unknown,
        }
    }
}

impl From<EscherRecordType> for u16 {
    fn from(record_type: EscherRecordType) -> Self {
        record_type as u16
    }
}
