//! Baseline image structure tags
//!
//! The tags a reader needs to interpret one uncompressed, chunky, single
//! strip of pixels.

use crate::exif::builder::{BlockEntry, EntryData, TiffBlockBuilder};
use crate::exif::constants::{extra_samples, field_types, photometric, tags};
use crate::exif::errors::{MetaError, MetaResult};

/// Shape of the pixel buffer being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    pub width: u32,
    pub height: u32,
    /// Channels per pixel, colour channels first, alpha last
    pub samples_per_pixel: u16,
    pub bits_per_sample: u16,
    pub has_alpha: bool,
}

impl PixelLayout {
    pub fn color_channels(&self) -> u16 {
        if self.has_alpha {
            self.samples_per_pixel - 1
        } else {
            self.samples_per_pixel
        }
    }

    pub fn photometric(&self) -> u16 {
        if self.color_channels() >= 3 {
            photometric::RGB
        } else {
            photometric::BLACK_IS_ZERO
        }
    }

    /// Bytes in one strip covering the whole image
    pub fn strip_len(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.samples_per_pixel as usize
            * (self.bits_per_sample as usize / 8)
    }
}

pub struct BasicTagsBuilder;

impl BasicTagsBuilder {
    pub fn add_image_structure(
        builder: &mut TiffBlockBuilder,
        ifd_index: usize,
        layout: &PixelLayout,
        strip_len: usize,
    ) -> MetaResult<()> {
        let strip_len = u32::try_from(strip_len)
            .map_err(|_| MetaError::EncodingError(format!("strip of {} bytes too large for TIFF", strip_len)))?;

        builder.add_long(ifd_index, tags::IMAGE_WIDTH, layout.width)?;
        builder.add_long(ifd_index, tags::IMAGE_LENGTH, layout.height)?;

        let bits = vec![layout.bits_per_sample; layout.samples_per_pixel as usize];
        builder.add_shorts(ifd_index, tags::BITS_PER_SAMPLE, &bits)?;

        // 1 = no compression
        builder.add_shorts(ifd_index, tags::COMPRESSION, &[1])?;
        builder.add_shorts(ifd_index, tags::PHOTOMETRIC_INTERPRETATION, &[layout.photometric()])?;

        builder.add_entry(ifd_index, BlockEntry {
            tag: tags::STRIP_OFFSETS,
            field_type: field_types::LONG,
            count: 1,
            data: EntryData::ImageDataOffset,
        });

        builder.add_shorts(ifd_index, tags::SAMPLES_PER_PIXEL, &[layout.samples_per_pixel])?;
        builder.add_long(ifd_index, tags::ROWS_PER_STRIP, layout.height)?;
        builder.add_long(ifd_index, tags::STRIP_BYTE_COUNTS, strip_len)?;

        // 1 = chunky
        builder.add_shorts(ifd_index, tags::PLANAR_CONFIGURATION, &[1])?;

        if layout.has_alpha {
            builder.add_shorts(ifd_index, tags::EXTRA_SAMPLES, &[extra_samples::UNASSOCIATED_ALPHA])?;
        }

        Ok(())
    }
}
