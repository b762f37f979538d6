//! Building blocks for `TiffBlockBuilder`

pub mod basic_tags;
pub mod metadata_tags;
pub mod writer;
