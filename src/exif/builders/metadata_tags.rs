//! Custom comment/author tags written by the injector

use log::debug;

use crate::exif::builder::TiffBlockBuilder;
use crate::exif::constants::{comment_preamble, tags};
use crate::exif::errors::MetaResult;
use crate::exif::ifd::IfdKind;

pub struct MetadataTagsBuilder;

impl MetadataTagsBuilder {
    /// Writes `author` as Artist into `ifd_index` and `comment` as an
    /// ASCII-prefixed UserComment into a new Exif sub-IFD
    pub fn add_comment_and_author(
        builder: &mut TiffBlockBuilder,
        ifd_index: usize,
        comment: &str,
        author: &str,
    ) -> MetaResult<()> {
        debug!("Adding Artist ({} bytes) and UserComment ({} bytes)", author.len(), comment.len());

        builder.add_ascii(ifd_index, tags::ARTIST, author)?;

        let exif_ifd = builder.add_ifd(IfdKind::Exif);
        builder.add_undefined(exif_ifd, tags::USER_COMMENT, encode_user_comment(comment))?;
        builder.link_sub_ifd(ifd_index, tags::EXIF_IFD, exif_ifd);

        Ok(())
    }
}

/// `ASCII\0\0\0` followed by the text bytes
pub fn encode_user_comment(comment: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(comment_preamble::LEN + comment.len());
    bytes.extend_from_slice(comment_preamble::ASCII);
    bytes.extend_from_slice(comment.as_bytes());
    bytes
}
