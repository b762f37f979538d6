//! Output container selection

use std::path::Path;

use image::ImageFormat;

use crate::exif::errors::{MetaError, MetaResult};

/// Container a scrubbed image is written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Tiff,
    WebP,
    Bmp,
    Gif,
}

impl OutputFormat {
    /// Picks the container from the output file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> MetaResult<Self> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|_| {
            MetaError::GenericError(format!("Unsupported output format: {}", path.display()))
        })?;
        Self::from_image_format(format)
            .ok_or_else(|| MetaError::GenericError(format!("Cannot write {:?} images", format)))
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Tiff => Some(OutputFormat::Tiff),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            ImageFormat::Bmp => Some(OutputFormat::Bmp),
            ImageFormat::Gif => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }

    /// Whether a comment/author payload can be embedded
    pub fn carries_payload(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Jpeg | OutputFormat::Tiff)
    }

    /// Whether encoding keeps every pixel value
    pub fn is_lossless(&self) -> bool {
        !matches!(self, OutputFormat::Jpeg | OutputFormat::Gif)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Tiff => "tiff",
            OutputFormat::WebP => "webp",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
        }
    }
}
