//! Image File Directory structures
//!
//! An EXIF block is a small TIFF file: IFD0 describes the primary image and
//! links to the Exif and GPS sub-IFDs through pointer tags. This module keeps
//! the raw entries exactly as read; value decoding happens in the reader.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::exif::constants::field_types;
use crate::exif::tag_names;

/// Which directory of the block an IFD is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfdKind {
    /// IFD0, primary image
    Primary,
    /// Exif sub-IFD (camera settings)
    Exif,
    /// GPS sub-IFD
    Gps,
}

impl IfdKind {
    pub fn name(&self) -> &'static str {
        match self {
            IfdKind::Primary => "IFD0",
            IfdKind::Exif => "Exif",
            IfdKind::Gps => "GPS",
        }
    }
}

/// One 12-byte directory entry
///
/// `value_field` holds the raw last four bytes of the entry: the value
/// itself when it fits, otherwise an offset into the block.
#[derive(Debug, Clone)]
pub struct IfdEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub value_field: [u8; 4],
}

impl IfdEntry {
    pub fn new(tag: u16, field_type: u16, count: u32, value_field: [u8; 4]) -> Self {
        IfdEntry {
            tag,
            field_type,
            count,
            value_field,
        }
    }

    /// Size in bytes of one value of this entry's type, `None` if the
    /// type is not part of TIFF 6.0
    pub fn field_type_size(&self) -> Option<usize> {
        field_type_size(self.field_type)
    }

    /// Total payload size, `None` for unknown types or overflowing counts
    pub fn payload_size(&self) -> Option<usize> {
        self.field_type_size()?.checked_mul(self.count as usize)
    }

    /// Whether the payload lives inside `value_field`
    pub fn is_value_inline(&self) -> bool {
        matches!(self.payload_size(), Some(size) if size <= 4)
    }

    pub fn description(&self) -> String {
        format!(
            "Tag: {} ({}), Type: {} ({}), Count: {}",
            self.tag,
            tag_names::tag_name(self.tag),
            self.field_type,
            field_type_name(self.field_type),
            self.count
        )
    }
}

/// A parsed directory
#[derive(Debug, Clone)]
pub struct Ifd {
    pub kind: IfdKind,
    /// Offset of the directory from the start of the block
    pub offset: u64,
    pub entries: Vec<IfdEntry>,
    tag_index: HashMap<u16, usize>,
}

impl Ifd {
    pub fn new(kind: IfdKind, offset: u64) -> Self {
        Ifd {
            kind,
            offset,
            entries: Vec::new(),
            tag_index: HashMap::new(),
        }
    }

    pub fn add_entry(&mut self, entry: IfdEntry) {
        trace!("Adding entry to {}: {}", self.kind.name(), entry.description());

        self.tag_index.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IfdEntry> {
        self.tag_index.get(&tag).map(|&i| &self.entries[i])
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.get_entry(tag).is_some()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (offset: {})", self.kind.name(), self.offset)?;
        for entry in &self.entries {
            writeln!(f, "    {}", entry.description())?;
        }
        Ok(())
    }
}

/// Size of one value of a TIFF field type
pub fn field_type_size(field_type: u16) -> Option<usize> {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
        field_types::SHORT | field_types::SSHORT => Some(2),
        field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => Some(4),
        field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
        _ => None,
    }
}

pub fn field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        field_types::IFD => "IFD",
        _ => "Unknown",
    }
}
