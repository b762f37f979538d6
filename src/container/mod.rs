//! Image container decoding
//!
//! Probes an encoded image for its format, dimensions and colour layout,
//! locates the embedded EXIF block for the container it came in and collects
//! container-level info (PNG text chunks, JPEG comments and JFIF fields).

pub mod text_chunks;
#[cfg(test)]
mod tests;

use std::io::Cursor;

use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::webp::WebP;
use img_parts::{Bytes, ImageEXIF};
use log::{debug, warn};

use crate::exif::errors::{MetaError, MetaResult};
use crate::exif::reader::read_exif;
use crate::exif::value::TagMap;

const JPEG_COM: u8 = 0xFE;
const JPEG_APP0: u8 = 0xE0;

/// Everything the report needs from an encoded image
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    /// Raw tag mapping, empty when the image carries no EXIF block
    pub tags: TagMap,
    /// Container-level key/value pairs in file order
    pub info: Vec<(String, String)>,
}

impl DecodedImage {
    pub fn format_name(&self) -> String {
        format_name(self.format)
    }

    pub fn color_mode(&self) -> &'static str {
        color_mode(self.color)
    }

    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Reads format, dimensions, colour type, tags and container info
///
/// The pixel data is not decoded; a truncated pixel stream may still pass
/// here and fail in `decode_pixels`.
pub fn decode_metadata(bytes: &[u8]) -> MetaResult<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| MetaError::DecodeError("unrecognised image format".to_string()))?;

    let decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();
    let color = decoder.color_type();
    debug!("Probed {} image {}x{} ({:?})", format_name(format), width, height, color);

    let tags = match locate_exif(bytes, format) {
        Some(block) => read_exif(&block).unwrap_or_else(|e| {
            warn!("Ignoring unreadable EXIF block: {}", e);
            TagMap::new()
        }),
        None => TagMap::new(),
    };

    Ok(DecodedImage {
        format,
        width,
        height,
        color,
        tags,
        info: container_info(bytes, format),
    })
}

/// Decodes the full pixel buffer
pub fn decode_pixels(bytes: &[u8]) -> MetaResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// TIFF-structured EXIF payload of the container, if any
pub fn locate_exif(bytes: &[u8], format: ImageFormat) -> Option<Vec<u8>> {
    let exif = match format {
        ImageFormat::Jpeg => Jpeg::from_bytes(Bytes::copy_from_slice(bytes)).ok()?.exif(),
        ImageFormat::Png => Png::from_bytes(Bytes::copy_from_slice(bytes)).ok()?.exif(),
        ImageFormat::WebP => WebP::from_bytes(Bytes::copy_from_slice(bytes)).ok()?.exif(),
        ImageFormat::Tiff => return Some(bytes.to_vec()),
        _ => None,
    };
    exif.map(|block| strip_exif_prefix(&block).to_vec())
}

/// Some writers keep the APP1 identifier inside PNG and WebP chunks
fn strip_exif_prefix(block: &[u8]) -> &[u8] {
    block.strip_prefix(b"Exif\0\0".as_slice()).unwrap_or(block)
}

fn container_info(bytes: &[u8], format: ImageFormat) -> Vec<(String, String)> {
    match format {
        ImageFormat::Png => match Png::from_bytes(Bytes::copy_from_slice(bytes)) {
            Ok(png) => png
                .chunks()
                .iter()
                .filter_map(|chunk| text_chunks::parse_text_chunk(&chunk.kind(), chunk.contents()))
                .collect(),
            Err(e) => {
                debug!("PNG chunk walk failed: {}", e);
                Vec::new()
            }
        },
        ImageFormat::Jpeg => match Jpeg::from_bytes(Bytes::copy_from_slice(bytes)) {
            Ok(jpeg) => jpeg_info(&jpeg),
            Err(e) => {
                debug!("JPEG segment walk failed: {}", e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    }
}

fn jpeg_info(jpeg: &Jpeg) -> Vec<(String, String)> {
    let mut info = Vec::new();
    for segment in jpeg.segments() {
        let contents = segment.contents();
        match segment.marker() {
            JPEG_APP0 if contents.starts_with(b"JFIF\0") && contents.len() >= 12 => {
                info.push(("jfif_version".to_string(), format!("({}, {})", contents[5], contents[6])));
                info.push(("jfif_unit".to_string(), contents[7].to_string()));
                let x = u16::from_be_bytes([contents[8], contents[9]]);
                let y = u16::from_be_bytes([contents[10], contents[11]]);
                info.push(("jfif_density".to_string(), format!("({}, {})", x, y)));
            }
            JPEG_COM => {
                let text = String::from_utf8_lossy(contents);
                info.push(("comment".to_string(), text.trim_end_matches('\0').to_string()));
            }
            _ => {}
        }
    }
    info
}

/// Upper-case container name
pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Short colour mode label
pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "L;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "unknown",
    }
}
