//! TIFF block serialisation
//!
//! Lays out directories, out-of-line values and pixel data, then writes
//! them at their computed offsets. Blocks are always little-endian.
//!
//! Layout: header | IFD0 | sub-IFDs | external values | pixel data

use std::collections::HashMap;
use std::io::{Cursor, Seek, SeekFrom, Write};

use log::debug;

use crate::exif::builder::{BlockEntry, BlockIfd, EntryData};
use crate::exif::constants::header;
use crate::exif::errors::{MetaError, MetaResult};
use crate::utils::write_utils;

/// Offsets computed before anything is written
struct BlockLayout {
    ifd_offsets: Vec<u64>,
    /// (ifd index, tag) -> offset of the out-of-line value
    value_offsets: HashMap<(usize, u16), u64>,
    image_offset: Option<u64>,
    total_len: u64,
}

pub struct WriterBuilder;

impl WriterBuilder {
    /// Serialises the directories and optional pixel data into one block
    pub fn write(ifds: &[BlockIfd], image_data: Option<&[u8]>) -> MetaResult<Vec<u8>> {
        let sorted_ifds = Self::prepare_sorted_ifds(ifds);
        let layout = Self::calculate_offsets(&sorted_ifds, image_data.map(|d| d.len()))?;

        debug!("Writing TIFF block: {} IFDs, {} bytes", sorted_ifds.len(), layout.total_len);

        let mut writer = Cursor::new(Vec::with_capacity(layout.total_len as usize));
        Self::write_header(&mut writer, layout.ifd_offsets.first().copied().unwrap_or(0))?;

        for (index, ifd) in sorted_ifds.iter().enumerate() {
            writer.seek(SeekFrom::Start(layout.ifd_offsets[index]))?;
            Self::write_ifd(&mut writer, index, ifd, &layout)?;
        }

        Self::write_external_data(&mut writer, &sorted_ifds, &layout)?;

        if let (Some(data), Some(offset)) = (image_data, layout.image_offset) {
            writer.seek(SeekFrom::Start(offset))?;
            writer.write_all(data)?;
        }

        Ok(writer.into_inner())
    }

    /// Entries sorted by tag, one entry per tag
    fn prepare_sorted_ifds(ifds: &[BlockIfd]) -> Vec<BlockIfd> {
        ifds.iter()
            .map(|ifd| BlockIfd {
                kind: ifd.kind,
                entries: write_utils::get_unique_sorted_entries(&ifd.entries),
            })
            .collect()
    }

    fn calculate_offsets(sorted_ifds: &[BlockIfd], image_len: Option<usize>) -> MetaResult<BlockLayout> {
        let mut current_offset = header::HEADER_SIZE;

        let mut ifd_offsets = Vec::with_capacity(sorted_ifds.len());
        for ifd in sorted_ifds {
            ifd_offsets.push(current_offset);
            current_offset += Self::calculate_ifd_size(ifd);
        }

        let mut value_offsets = HashMap::new();
        for (index, ifd) in sorted_ifds.iter().enumerate() {
            for entry in &ifd.entries {
                let len = entry.external_len();
                if len > 0 {
                    current_offset = write_utils::align_to_4_bytes(current_offset);
                    value_offsets.insert((index, entry.tag), current_offset);
                    current_offset += len as u64;
                }
            }
        }

        let image_offset = image_len.map(|len| {
            let offset = write_utils::align_to_4_bytes(current_offset);
            current_offset = offset + len as u64;
            offset
        });

        if current_offset > u32::MAX as u64 {
            return Err(MetaError::EncodingError(format!(
                "block of {} bytes exceeds the 4 GiB TIFF limit", current_offset
            )));
        }

        Ok(BlockLayout {
            ifd_offsets,
            value_offsets,
            image_offset,
            total_len: current_offset,
        })
    }

    /// 2 (entry count) + 12 per entry + 4 (next IFD offset)
    fn calculate_ifd_size(ifd: &BlockIfd) -> u64 {
        2 + 12 * ifd.entries.len() as u64 + 4
    }

    fn write_header(writer: &mut impl Write, first_ifd_offset: u64) -> MetaResult<()> {
        writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;
        writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
        writer.write_all(&(first_ifd_offset as u32).to_le_bytes())?;
        Ok(())
    }

    /// Writes one directory; sub-IFDs are never chained, so the next-IFD
    /// offset is always zero
    fn write_ifd(writer: &mut impl Write, index: usize, ifd: &BlockIfd, layout: &BlockLayout) -> MetaResult<()> {
        let count = u16::try_from(ifd.entries.len())
            .map_err(|_| MetaError::EncodingError(format!("{} has too many entries", ifd.kind.name())))?;
        writer.write_all(&count.to_le_bytes())?;

        for entry in &ifd.entries {
            writer.write_all(&entry.tag.to_le_bytes())?;
            writer.write_all(&entry.field_type.to_le_bytes())?;
            writer.write_all(&entry.count.to_le_bytes())?;
            writer.write_all(&Self::value_field(index, entry, layout)?)?;
        }

        writer.write_all(&0u32.to_le_bytes())?;
        Ok(())
    }

    fn value_field(index: usize, entry: &BlockEntry, layout: &BlockLayout) -> MetaResult<[u8; 4]> {
        let offset = match &entry.data {
            EntryData::Bytes(bytes) if bytes.len() <= 4 => {
                let mut field = [0u8; 4];
                field[..bytes.len()].copy_from_slice(bytes);
                return Ok(field);
            }
            EntryData::Bytes(_) => layout.value_offsets.get(&(index, entry.tag)).copied(),
            EntryData::IfdPointer(target) => layout.ifd_offsets.get(*target).copied(),
            EntryData::ImageDataOffset => layout.image_offset,
        };

        offset
            .map(|o| (o as u32).to_le_bytes())
            .ok_or_else(|| MetaError::EncodingError(format!("no offset computed for tag {}", entry.tag)))
    }

    fn write_external_data(writer: &mut (impl Write + Seek), sorted_ifds: &[BlockIfd], layout: &BlockLayout) -> MetaResult<()> {
        for (index, ifd) in sorted_ifds.iter().enumerate() {
            for entry in &ifd.entries {
                if let (EntryData::Bytes(bytes), Some(offset)) =
                    (&entry.data, layout.value_offsets.get(&(index, entry.tag)))
                {
                    writer.seek(SeekFrom::Start(*offset))?;
                    writer.write_all(bytes)?;
                    write_utils::write_padding(writer, bytes.len())?;
                }
            }
        }
        Ok(())
    }
}
