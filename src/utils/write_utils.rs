//! Block writing utilities
//!
//! Alignment and entry ordering helpers used when laying out TIFF blocks.

use std::collections::HashSet;
use std::io::Write;

use crate::exif::builder::BlockEntry;
use crate::exif::errors::MetaResult;

/// Align an offset to a 4-byte boundary
pub fn align_to_4_bytes(offset: u64) -> u64 {
    let remainder = offset % 4;
    if remainder == 0 {
        offset
    } else {
        offset + (4 - remainder)
    }
}

/// Write the zero bytes that pad `data_len` to a 4-byte boundary
pub fn write_padding(writer: &mut impl Write, data_len: usize) -> MetaResult<()> {
    let padding = (4 - (data_len % 4)) % 4;
    if padding > 0 {
        writer.write_all(&vec![0u8; padding])?;
    }
    Ok(())
}

/// Entries sorted by tag number, keeping the last entry added for each tag
///
/// Readers expect ascending tags with no duplicates.
pub fn get_unique_sorted_entries(entries: &[BlockEntry]) -> Vec<BlockEntry> {
    let mut seen_tags = HashSet::new();
    let mut unique_entries: Vec<BlockEntry> = entries
        .iter()
        .rev()
        .filter(|entry| seen_tags.insert(entry.tag))
        .cloned()
        .collect();

    unique_entries.sort_by_key(|entry| entry.tag);
    unique_entries
}
