//! Metadata stripping and injection
//!
//! The source is decoded to its pixel buffer and encoded again from that
//! buffer alone, so no chunk, segment or tag of the original container can
//! survive. An optional comment/author payload is then embedded the way the
//! target container stores free text.

pub mod format;
pub mod payload;
#[cfg(test)]
mod tests;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use log::{info, warn};

use crate::config::{ScrubConfig, DEFAULT_JPEG_QUALITY};
use crate::container::decode_pixels;
use crate::exif::builder::TiffBlockBuilder;
use crate::exif::builders::basic_tags::PixelLayout;
use crate::exif::errors::{MetaError, MetaResult};

pub use format::OutputFormat;
pub use payload::CustomMetadataPayload;

/// Result of one scrub
#[derive(Debug, Clone)]
pub struct ScrubOutcome {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// False when no payload was requested, the format cannot carry one, or
    /// building it failed
    pub payload_embedded: bool,
}

pub struct Scrubber {
    jpeg_quality: u8,
}

impl Default for Scrubber {
    fn default() -> Self {
        Scrubber { jpeg_quality: DEFAULT_JPEG_QUALITY }
    }
}

impl Scrubber {
    pub fn new(jpeg_quality: u8) -> Self {
        Scrubber { jpeg_quality: jpeg_quality.clamp(1, 100) }
    }

    pub fn from_config(config: &ScrubConfig) -> Self {
        Self::new(config.jpeg_quality)
    }

    /// Re-encodes `bytes` as `target` from pixels only
    pub fn scrub(
        &self,
        bytes: &[u8],
        target: OutputFormat,
        payload: Option<&CustomMetadataPayload>,
    ) -> MetaResult<ScrubOutcome> {
        let pixels = prepare_pixels(decode_pixels(bytes)?, target);
        info!("Scrubbing {}x{} image to {:?}", pixels.width(), pixels.height(), target);

        let stripped = self.encode(&pixels, target)?;

        let payload = match payload {
            Some(p) if target.carries_payload() => p,
            Some(_) => {
                warn!("{:?} cannot carry a comment, writing stripped image only", target);
                return Ok(outcome(stripped, target, false));
            }
            None => return Ok(outcome(stripped, target, false)),
        };

        let embedded = match target {
            OutputFormat::Png => payload::embed_png(stripped.clone(), payload),
            OutputFormat::Jpeg => payload::embed_jpeg(stripped.clone(), payload),
            OutputFormat::Tiff => encode_tiff(&pixels, Some(payload)),
            _ => return Ok(outcome(stripped, target, false)),
        };

        match embedded {
            Ok(bytes) => Ok(outcome(bytes, target, true)),
            Err(e) => {
                warn!("Custom metadata not embedded: {}", e);
                Ok(outcome(stripped, target, false))
            }
        }
    }

    /// Reads `input`, scrubs it to the format named by `output` and writes it
    pub fn scrub_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        payload: Option<&CustomMetadataPayload>,
    ) -> MetaResult<ScrubOutcome> {
        let target = OutputFormat::from_path(output.as_ref())?;
        let bytes = fs::read(input.as_ref())?;
        let result = self.scrub(&bytes, target, payload)?;
        fs::write(output.as_ref(), &result.bytes)?;
        info!("Wrote scrubbed copy to {}", output.as_ref().display());
        Ok(result)
    }

    fn encode(&self, pixels: &DynamicImage, target: OutputFormat) -> MetaResult<Vec<u8>> {
        match target {
            OutputFormat::Jpeg => {
                let mut out = Vec::new();
                pixels.write_with_encoder(JpegEncoder::new_with_quality(&mut out, self.jpeg_quality))?;
                Ok(out)
            }
            OutputFormat::Tiff => encode_tiff(pixels, None),
            other => {
                let mut out = Cursor::new(Vec::new());
                pixels.write_to(&mut out, other.image_format())?;
                Ok(out.into_inner())
            }
        }
    }
}

fn outcome(bytes: Vec<u8>, format: OutputFormat, payload_embedded: bool) -> ScrubOutcome {
    ScrubOutcome { bytes, format, payload_embedded }
}

/// Converts the buffer to a layout the target encoder accepts
///
/// Layouts the target supports are passed through untouched.
fn prepare_pixels(image: DynamicImage, target: OutputFormat) -> DynamicImage {
    let color = image.color();
    let is_float = matches!(image, DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_));
    let has_color = color.has_color();
    let has_alpha = color.has_alpha();

    match target {
        OutputFormat::Jpeg => match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            _ if has_color => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => DynamicImage::ImageLuma8(image.to_luma8()),
        },
        OutputFormat::Png | OutputFormat::Tiff if is_float => {
            if has_alpha {
                DynamicImage::ImageRgba16(image.to_rgba16())
            } else {
                DynamicImage::ImageRgb16(image.to_rgb16())
            }
        }
        OutputFormat::Png | OutputFormat::Tiff => image,
        OutputFormat::WebP => match image {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
            _ if has_alpha => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
        OutputFormat::Bmp => match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => image,
            _ if has_alpha => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
        OutputFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

/// Baseline uncompressed single-strip TIFF with optional payload tags
fn encode_tiff(pixels: &DynamicImage, payload: Option<&CustomMetadataPayload>) -> MetaResult<Vec<u8>> {
    let (layout, samples) = tiff_samples(pixels);
    if samples.len() != layout.strip_len() {
        return Err(MetaError::EncodingError(format!(
            "strip holds {} bytes, layout expects {}",
            samples.len(),
            layout.strip_len()
        )));
    }

    let mut builder = TiffBlockBuilder::new();
    builder.add_image_structure(&layout, samples.len())?;
    if let Some(payload) = payload {
        payload.add_to_block(&mut builder)?;
    }
    builder.set_image_data(samples);
    builder.build()
}

/// Pixel layout and little-endian sample bytes
fn tiff_samples(pixels: &DynamicImage) -> (PixelLayout, Vec<u8>) {
    let color = pixels.color();
    let bits_per_sample = (color.bits_per_pixel() / color.channel_count() as u16).max(8);
    let layout = PixelLayout {
        width: pixels.width(),
        height: pixels.height(),
        samples_per_pixel: color.channel_count() as u16,
        bits_per_sample,
        has_alpha: color.has_alpha(),
    };

    let samples = match pixels {
        DynamicImage::ImageLuma16(buf) => le_samples(buf.as_raw()),
        DynamicImage::ImageLumaA16(buf) => le_samples(buf.as_raw()),
        DynamicImage::ImageRgb16(buf) => le_samples(buf.as_raw()),
        DynamicImage::ImageRgba16(buf) => le_samples(buf.as_raw()),
        other => other.as_bytes().to_vec(),
    };
    (layout, samples)
}

fn le_samples(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
