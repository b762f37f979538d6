//! String utility functions
//!
//! Byte-buffer trimming for decoded tag text and markup removal for
//! reports delivered as plain-text files.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANCHOR: Regex =
        Regex::new(r#"<a\s+href="([^"]*)"\s*>([^<]*)</a>"#).expect("anchor pattern compiles");
    static ref TAG: Regex = Regex::new(r"</?[a-zA-Z][^>]*>").expect("tag pattern compiles");
}

/// Trims trailing null characters from a byte buffer
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
}

/// Removes the inline markup of a report
///
/// Links become `label: url`, every other tag is dropped and the escaped
/// entities are turned back into characters.
pub fn strip_markup(html: &str) -> String {
    let with_links = ANCHOR.replace_all(html, "$2: $1");
    let without_tags = TAG.replace_all(&with_links, "");
    match quick_xml::escape::unescape(&without_tags) {
        Ok(text) => text.into_owned(),
        Err(_) => without_tags.into_owned(),
    }
}
