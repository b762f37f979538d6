//! Custom comment/author payload and its per-container embedding

use img_parts::jpeg::Jpeg;
use img_parts::png::{Png, PngChunk};
use img_parts::{Bytes, ImageEXIF};
use log::debug;

use crate::container::text_chunks;
use crate::exif::builder::TiffBlockBuilder;
use crate::exif::errors::{MetaError, MetaResult};

pub const COMMENT_KEYWORD: &str = "Comment";
pub const AUTHOR_KEYWORD: &str = "Author";

/// Text injected into a scrubbed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMetadataPayload {
    pub comment: String,
    author: Option<String>,
}

impl CustomMetadataPayload {
    pub fn new(comment: impl Into<String>) -> Self {
        CustomMetadataPayload {
            comment: comment.into(),
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Explicit author, or the comment when none was given
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(&self.comment)
    }

    /// Adds Artist and an Exif sub-IFD with UserComment to `builder`
    pub fn add_to_block(&self, builder: &mut TiffBlockBuilder) -> MetaResult<()> {
        builder.add_comment_and_author(&self.comment, self.author())
    }

    /// Bare EXIF block carrying only the payload
    pub fn exif_block(&self) -> MetaResult<Vec<u8>> {
        let mut builder = TiffBlockBuilder::new();
        self.add_to_block(&mut builder)?;
        builder.build()
    }
}

/// Inserts `Comment` and `Author` text chunks before IEND
pub fn embed_png(encoded: Vec<u8>, payload: &CustomMetadataPayload) -> MetaResult<Vec<u8>> {
    let mut png = Png::from_bytes(Bytes::from(encoded))
        .map_err(|e| MetaError::EncodingError(format!("Cannot parse encoded PNG: {}", e)))?;

    let comment = text_chunk(COMMENT_KEYWORD, &payload.comment)?;
    let author = text_chunk(AUTHOR_KEYWORD, payload.author())?;

    let chunks = png.chunks_mut();
    let iend = chunks
        .iter()
        .position(|chunk| &chunk.kind() == b"IEND")
        .unwrap_or(chunks.len());
    chunks.insert(iend, author);
    chunks.insert(iend, comment);

    debug!("Inserted PNG text chunks before IEND");
    Ok(png.encoder().bytes().to_vec())
}

/// Latin-1 text goes into `tEXt`, anything else into `iTXt`
fn text_chunk(keyword: &str, text: &str) -> MetaResult<PngChunk> {
    let (kind, data) = match text_chunks::encode_text_chunk(keyword, text) {
        Some(data) => (text_chunks::TEXT, data),
        None => (
            text_chunks::ITXT,
            text_chunks::encode_itxt_chunk(keyword, text)
                .ok_or_else(|| MetaError::EncodingError(format!("Invalid PNG keyword: {}", keyword)))?,
        ),
    };
    Ok(PngChunk::new(kind, Bytes::from(data)))
}

/// Adds an EXIF APP1 segment carrying the payload
pub fn embed_jpeg(encoded: Vec<u8>, payload: &CustomMetadataPayload) -> MetaResult<Vec<u8>> {
    let block = payload.exif_block()?;
    let mut jpeg = Jpeg::from_bytes(Bytes::from(encoded))
        .map_err(|e| MetaError::EncodingError(format!("Cannot parse encoded JPEG: {}", e)))?;

    // APP1 segments are limited to 64 KiB including the length field and identifier
    if block.len() > u16::MAX as usize - 8 {
        return Err(MetaError::EncodingError(format!("EXIF block of {} bytes does not fit APP1", block.len())));
    }

    jpeg.set_exif(Some(Bytes::from(block)));
    Ok(jpeg.encoder().bytes().to_vec())
}
