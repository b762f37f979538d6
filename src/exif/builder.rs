//! TIFF-structured block construction
//!
//! Builds the little-endian TIFF blocks the injector needs: a bare EXIF
//! payload (IFD0 + Exif sub-IFD) for JPEG APP1 segments, and a complete
//! baseline TIFF file when pixel data is attached.

use log::{debug, error};

use crate::exif::builders::basic_tags::{BasicTagsBuilder, PixelLayout};
use crate::exif::builders::metadata_tags::MetadataTagsBuilder;
use crate::exif::builders::writer::WriterBuilder;
use crate::exif::constants::field_types;
use crate::exif::errors::{MetaError, MetaResult};
use crate::exif::ifd::IfdKind;

/// Where an entry's value comes from
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    /// Raw value bytes, already in little-endian order
    Bytes(Vec<u8>),
    /// Offset of another directory of the same block
    IfdPointer(usize),
    /// Offset of the attached pixel data
    ImageDataOffset,
}

/// Entry waiting to be laid out
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntry {
    pub tag: u16,
    pub field_type: u16,
    pub count: u32,
    pub data: EntryData,
}

impl BlockEntry {
    /// Bytes the entry needs outside the directory, zero when inline
    pub fn external_len(&self) -> usize {
        match &self.data {
            EntryData::Bytes(bytes) if bytes.len() > 4 => bytes.len(),
            _ => 0,
        }
    }
}

/// Directory waiting to be laid out
#[derive(Debug, Clone)]
pub struct BlockIfd {
    pub kind: IfdKind,
    pub entries: Vec<BlockEntry>,
}

/// Builder for little-endian TIFF blocks
pub struct TiffBlockBuilder {
    pub ifds: Vec<BlockIfd>,
    image_data: Option<Vec<u8>>,
}

impl Default for TiffBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffBlockBuilder {
    /// Creates a builder holding an empty IFD0
    pub fn new() -> Self {
        TiffBlockBuilder {
            ifds: vec![BlockIfd {
                kind: IfdKind::Primary,
                entries: Vec::new(),
            }],
            image_data: None,
        }
    }

    /// Index of IFD0
    pub fn primary(&self) -> usize {
        0
    }

    pub fn add_ifd(&mut self, kind: IfdKind) -> usize {
        debug!("Adding {} directory to block", kind.name());
        self.ifds.push(BlockIfd {
            kind,
            entries: Vec::new(),
        });
        self.ifds.len() - 1
    }

    pub fn add_entry(&mut self, ifd_index: usize, entry: BlockEntry) {
        match self.ifds.get_mut(ifd_index) {
            Some(ifd) => ifd.entries.push(entry),
            None => error!("Invalid IFD index {}, only have {} IFDs", ifd_index, self.ifds.len()),
        }
    }

    /// NUL-terminated text; interior NULs are rejected
    pub fn add_ascii(&mut self, ifd_index: usize, tag: u16, text: &str) -> MetaResult<()> {
        if text.contains('\0') {
            return Err(MetaError::EncodingError(format!("tag {} text contains a NUL byte", tag)));
        }
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.add_bytes(ifd_index, tag, field_types::ASCII, bytes)
    }

    pub fn add_undefined(&mut self, ifd_index: usize, tag: u16, bytes: Vec<u8>) -> MetaResult<()> {
        self.add_bytes(ifd_index, tag, field_types::UNDEFINED, bytes)
    }

    pub fn add_shorts(&mut self, ifd_index: usize, tag: u16, values: &[u16]) -> MetaResult<()> {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.add_bytes(ifd_index, tag, field_types::SHORT, bytes)
    }

    pub fn add_long(&mut self, ifd_index: usize, tag: u16, value: u32) -> MetaResult<()> {
        self.add_bytes(ifd_index, tag, field_types::LONG, value.to_le_bytes().to_vec())
    }

    fn add_bytes(&mut self, ifd_index: usize, tag: u16, field_type: u16, bytes: Vec<u8>) -> MetaResult<()> {
        let unit = crate::exif::ifd::field_type_size(field_type).unwrap_or(1);
        let count = u32::try_from(bytes.len() / unit)
            .map_err(|_| MetaError::EncodingError(format!("tag {} value too large", tag)))?;
        self.add_entry(ifd_index, BlockEntry {
            tag,
            field_type,
            count,
            data: EntryData::Bytes(bytes),
        });
        Ok(())
    }

    /// Points `tag` in `parent` at directory `child`
    pub fn link_sub_ifd(&mut self, parent: usize, tag: u16, child: usize) {
        self.add_entry(parent, BlockEntry {
            tag,
            field_type: field_types::LONG,
            count: 1,
            data: EntryData::IfdPointer(child),
        });
    }

    /// Attaches pixel data referenced by `EntryData::ImageDataOffset`
    pub fn set_image_data(&mut self, data: Vec<u8>) {
        debug!("Setting image data: {} bytes", data.len());
        self.image_data = Some(data);
    }

    /// Adds the baseline tags describing an uncompressed single-strip image
    pub fn add_image_structure(&mut self, layout: &PixelLayout, strip_len: usize) -> MetaResult<()> {
        let primary = self.primary();
        BasicTagsBuilder::add_image_structure(self, primary, layout, strip_len)
    }

    /// Adds the Artist tag and an Exif sub-IFD carrying UserComment
    pub fn add_comment_and_author(&mut self, comment: &str, author: &str) -> MetaResult<()> {
        let primary = self.primary();
        MetadataTagsBuilder::add_comment_and_author(self, primary, comment, author)
    }

    /// Lays out and serialises the block
    pub fn build(&self) -> MetaResult<Vec<u8>> {
        WriterBuilder::write(&self.ifds, self.image_data.as_deref())
    }
}
