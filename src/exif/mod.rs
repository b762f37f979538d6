//! EXIF/TIFF structure engine
//!
//! Reads TIFF-structured metadata blocks into a `TagMap` and writes the
//! little-endian blocks the scrubber injects.

pub mod errors;
pub mod constants;
pub mod value;
pub mod ifd;
pub mod tag_names;
pub mod reader;
pub mod builder;
pub mod builders;
#[cfg(test)]
pub(crate) mod tests;

pub use builder::TiffBlockBuilder;
pub use errors::{MetaError, MetaResult};
pub use ifd::{Ifd, IfdEntry, IfdKind};
pub use reader::{read_exif, ExifBlock, ExifReader};
pub use tag_names::{gps_tag_name, is_known_tag, tag_name};
pub use value::{Rational, TagMap, TagValue};
