//! Error types for metadata extraction, scrubbing and reporting

use std::fmt;
use std::io;

/// Errors raised while reading or writing image metadata
///
/// The variants follow the degradation policy of the report pipeline:
/// `IoError` aborts a report, `DecodeError` degrades to "no metadata",
/// `FormatError` degrades to "no geolocation" and `EncodingError` degrades to
/// a stripped image without the custom block.
#[derive(Debug)]
pub enum MetaError {
    /// Unreadable source or unwritable sink
    IoError(io::Error),
    /// TIFF header is truncated or has the wrong magic number
    InvalidHeader,
    /// Byte order marker is neither "II" nor "MM"
    InvalidByteOrder(u16),
    /// TIFF version other than 42
    UnsupportedVersion(u16),
    /// IFD entry uses a field type outside the TIFF 6.0 set
    UnsupportedFieldType(u16),
    /// Corrupt or unsupported image container
    DecodeError(String),
    /// Malformed coordinate or numeric tag data
    FormatError(String),
    /// Custom metadata block could not be built
    EncodingError(String),
    /// Bad configuration value
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaError::IoError(e) => write!(f, "I/O error: {}", e),
            MetaError::InvalidHeader => write!(f, "Invalid TIFF header in metadata block"),
            MetaError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            MetaError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            MetaError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            MetaError::DecodeError(msg) => write!(f, "Cannot decode image: {}", msg),
            MetaError::FormatError(msg) => write!(f, "Malformed tag data: {}", msg),
            MetaError::EncodingError(msg) => write!(f, "Cannot build metadata block: {}", msg),
            MetaError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MetaError::GenericError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MetaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetaError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MetaError {
    fn from(error: io::Error) -> Self {
        MetaError::IoError(error)
    }
}

impl From<image::ImageError> for MetaError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(e) => MetaError::IoError(e),
            other => MetaError::DecodeError(other.to_string()),
        }
    }
}

impl From<String> for MetaError {
    fn from(msg: String) -> Self {
        MetaError::GenericError(msg)
    }
}

/// Result type for metadata operations
pub type MetaResult<T> = Result<T, MetaError>;
