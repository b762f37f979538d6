//! EXIF block reader
//!
//! Walks a TIFF-structured metadata block (the payload of a JPEG APP1
//! segment, a PNG eXIf chunk, a WebP EXIF chunk, or a TIFF file itself) and
//! produces the raw tag mapping the report pipeline works on.
//!
//! IFD0 and the Exif sub-IFD are merged into one flat mapping in file
//! order; the GPS sub-IFD is nested as a `TagValue::Directory` under the
//! GPSInfo pointer tag.

use byteorder::ReadBytesExt;
use log::{debug, info, warn};
use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::exif::constants::{field_types, header, tags, MAX_IFD_ENTRIES};
use crate::exif::errors::{MetaError, MetaResult};
use crate::exif::ifd::{Ifd, IfdEntry, IfdKind};
use crate::exif::value::{Rational, TagMap, TagValue};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::SeekableReader;
use crate::utils::string_utils;

/// Parsed metadata block
#[derive(Debug)]
pub struct ExifBlock {
    pub byte_order: ByteOrder,
    /// Directories in the order they were read
    pub ifds: Vec<Ifd>,
    /// Flattened mapping for reporting
    pub tags: TagMap,
}

impl ExifBlock {
    pub fn ifd(&self, kind: IfdKind) -> Option<&Ifd> {
        self.ifds.iter().find(|ifd| ifd.kind == kind)
    }
}

/// Reader for TIFF-structured metadata blocks
pub struct ExifReader {
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    block_len: u64,
}

impl Default for ExifReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ExifReader {
    pub fn new() -> Self {
        ExifReader {
            byte_order_handler: None,
            block_len: 0,
        }
    }

    fn handler(&self) -> MetaResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| MetaError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Parses a complete block held in memory
    pub fn read_block(&mut self, block: &[u8]) -> MetaResult<ExifBlock> {
        let mut cursor = Cursor::new(block);
        self.read(&mut cursor)
    }

    /// Parses a block from any seekable source
    ///
    /// 1. Detect byte order and check the TIFF magic number
    /// 2. Read IFD0
    /// 3. Follow the Exif and GPS pointers found in IFD0
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> MetaResult<ExifBlock> {
        self.block_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if self.block_len < header::HEADER_SIZE {
            return Err(MetaError::InvalidHeader);
        }

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        if version != header::TIFF_VERSION {
            return Err(MetaError::UnsupportedVersion(version));
        }

        let first_ifd_offset = handler.read_u32(reader)? as u64;
        if first_ifd_offset < header::HEADER_SIZE || first_ifd_offset >= self.block_len {
            warn!("First IFD offset {} outside block of {} bytes", first_ifd_offset, self.block_len);
            return Err(MetaError::InvalidHeader);
        }

        let primary = self.read_ifd(reader, first_ifd_offset, IfdKind::Primary)?;
        let mut tag_map = self.decode_ifd(reader, &primary);
        let mut ifds = vec![primary];

        if let Some(offset) = pointer_value(&tag_map, tags::GPS_IFD) {
            match self.read_ifd(reader, offset, IfdKind::Gps) {
                Ok(gps) => {
                    let gps_tags = self.decode_ifd(reader, &gps);
                    tag_map.insert(tags::GPS_IFD, TagValue::Directory(gps_tags));
                    ifds.push(gps);
                }
                Err(e) => warn!("Skipping GPS IFD at offset {}: {}", offset, e),
            }
        }

        if let Some(offset) = pointer_value(&tag_map, tags::EXIF_IFD) {
            match self.read_ifd(reader, offset, IfdKind::Exif) {
                Ok(exif) => {
                    for (tag, value) in self.decode_ifd(reader, &exif).iter() {
                        tag_map.insert(tag, value.clone());
                    }
                    ifds.push(exif);
                }
                Err(e) => warn!("Skipping Exif IFD at offset {}: {}", offset, e),
            }
        }

        info!("Read metadata block: {} IFDs, {} tags", ifds.len(), tag_map.len());
        Ok(ExifBlock {
            byte_order,
            ifds,
            tags: tag_map,
        })
    }

    /// Reads the directory at `offset`
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, kind: IfdKind) -> MetaResult<Ifd> {
        if offset < header::HEADER_SIZE || offset + 2 > self.block_len {
            return Err(MetaError::DecodeError(format!(
                "{} offset {} outside block of {} bytes", kind.name(), offset, self.block_len
            )));
        }
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = handler.read_u16(reader)?;
        let table_end = offset + 2 + 12 * entry_count as u64;
        if entry_count > MAX_IFD_ENTRIES || table_end > self.block_len {
            return Err(MetaError::DecodeError(format!(
                "{} declares {} entries, block too short", kind.name(), entry_count
            )));
        }
        debug!("{} at offset {}: {} entries", kind.name(), offset, entry_count);

        let mut ifd = Ifd::new(kind, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader, handler)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader, handler: &dyn ByteOrderHandler) -> MetaResult<IfdEntry> {
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = handler.read_u32(reader)?;
        let mut value_field = [0u8; 4];
        reader.read_exact(&mut value_field)?;

        Ok(IfdEntry::new(tag, field_type, count, value_field))
    }

    /// Decodes every entry of a directory, skipping the ones that fail
    fn decode_ifd(&self, reader: &mut dyn SeekableReader, ifd: &Ifd) -> TagMap {
        let mut map = TagMap::new();
        for entry in &ifd.entries {
            match self.decode_entry(reader, entry) {
                Ok(value) => map.insert(entry.tag, value),
                Err(e) => debug!("Skipping entry in {}: {} ({})", ifd.kind.name(), entry.description(), e),
            }
        }
        map
    }

    /// Decodes the value of one entry
    pub fn decode_entry(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> MetaResult<TagValue> {
        let handler = self.handler()?;
        let size = entry
            .payload_size()
            .ok_or(MetaError::UnsupportedFieldType(entry.field_type))?;

        if entry.is_value_inline() {
            let mut inline = Cursor::new(entry.value_field);
            return decode_values(&mut inline, handler, entry, size);
        }

        let offset = handler.u32_from(&entry.value_field) as u64;
        if offset + size as u64 > self.block_len {
            return Err(MetaError::DecodeError(format!(
                "tag {} data at {}+{} exceeds block of {} bytes", entry.tag, offset, size, self.block_len
            )));
        }
        reader.seek(SeekFrom::Start(offset))?;
        decode_values(reader, handler, entry, size)
    }
}

/// Convenience wrapper returning only the flattened mapping
pub fn read_exif(block: &[u8]) -> MetaResult<TagMap> {
    ExifReader::new().read_block(block).map(|block| block.tags)
}

fn pointer_value(tag_map: &TagMap, tag: u16) -> Option<u64> {
    match tag_map.get(tag) {
        Some(TagValue::Integer(offset)) if *offset > 0 => Some(*offset as u64),
        _ => None,
    }
}

fn decode_values(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
    entry: &IfdEntry,
    size: usize,
) -> MetaResult<TagValue> {
    match entry.field_type {
        field_types::BYTE | field_types::UNDEFINED => {
            let mut buffer = vec![0u8; size];
            reader.read_exact(&mut buffer)?;
            return Ok(TagValue::Bytes(buffer));
        }
        field_types::ASCII => {
            let mut buffer = vec![0u8; size];
            reader.read_exact(&mut buffer)?;
            string_utils::trim_trailing_nulls(&mut buffer);
            return Ok(TagValue::Text(String::from_utf8_lossy(&buffer).into_owned()));
        }
        _ => {}
    }

    let mut values = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        let value = match entry.field_type {
            field_types::SBYTE => TagValue::Integer(reader.read_i8()? as i64),
            field_types::SHORT => TagValue::Integer(handler.read_u16(reader)? as i64),
            field_types::SSHORT => TagValue::Integer(handler.read_i16(reader)? as i64),
            field_types::LONG | field_types::IFD => TagValue::Integer(handler.read_u32(reader)? as i64),
            field_types::SLONG => TagValue::Integer(handler.read_i32(reader)? as i64),
            field_types::RATIONAL => {
                let (num, den) = handler.read_rational(reader)?;
                TagValue::Rational(Rational::new(num as i64, den as i64))
            }
            field_types::SRATIONAL => {
                let (num, den) = handler.read_srational(reader)?;
                TagValue::Rational(Rational::new(num as i64, den as i64))
            }
            field_types::FLOAT => TagValue::Float(handler.read_f32(reader)? as f64),
            field_types::DOUBLE => TagValue::Float(handler.read_f64(reader)?),
            other => return Err(MetaError::UnsupportedFieldType(other)),
        };
        values.push(value);
    }

    if values.len() == 1 {
        Ok(values.remove(0))
    } else {
        Ok(TagValue::Sequence(values))
    }
}
