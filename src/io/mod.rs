//! Low-level I/O helpers shared by the EXIF reader and the digest code.

pub mod byte_order;

use std::io::{Read, Seek};

/// Anything the IFD reader can walk: readable and seekable.
///
/// EXIF blocks are parsed from an in-memory `Cursor<&[u8]>`, but the reader
/// only depends on this trait so file-backed sources work as well.
pub trait SeekableReader: Read + Seek {}

impl<T: Read + Seek> SeekableReader for T {}
