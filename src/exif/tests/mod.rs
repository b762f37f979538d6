//! Tests for the EXIF structure engine

pub mod test_utils;
