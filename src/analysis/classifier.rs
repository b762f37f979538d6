//! Tag classification and display formatting
//!
//! Turns a raw tag mapping into report lines: resolves names, applies the
//! inclusion policy and the value rules, and escapes the result for the
//! HTML subset chat clients accept.

use std::collections::BTreeSet;

use log::trace;
use quick_xml::escape::partial_escape;

use crate::exif::constants::{comment_preamble, names};
use crate::exif::tag_names::{is_known_tag, tag_name};
use crate::exif::value::{TagMap, TagValue};

/// Byte values longer than this are replaced by a placeholder
pub const DEFAULT_BINARY_THRESHOLD: usize = 50;

/// Names reported when the allow-list policy is active
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "Make",
    "Model",
    "LensMake",
    "LensModel",
    "BodySerialNumber",
    "CameraOwnerName",
    "Software",
    "HostComputer",
    "Artist",
    "Copyright",
    "ImageDescription",
    "UserComment",
    "XPComment",
    "XPAuthor",
    "DateTime",
    "DateTimeOriginal",
    "DateTimeDigitized",
    "OffsetTime",
    "Orientation",
    "ExifImageWidth",
    "ExifImageHeight",
    "ExposureTime",
    "FNumber",
    "ISOSpeedRatings",
    "FocalLength",
];

/// Which tags make it into a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InclusionPolicy {
    All,
    /// Listed names plus every tag without a known name
    AllowList(BTreeSet<String>),
}

impl InclusionPolicy {
    pub fn default_allow_list() -> Self {
        InclusionPolicy::AllowList(DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect())
    }

    pub fn admits(&self, tag: u16, name: &str) -> bool {
        match self {
            InclusionPolicy::All => true,
            InclusionPolicy::AllowList(names) => !is_known_tag(tag) || names.contains(name),
        }
    }
}

impl Default for InclusionPolicy {
    fn default() -> Self {
        InclusionPolicy::All
    }
}

/// One tag ready for display, not yet escaped
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTag {
    pub tag: u16,
    pub name: String,
    pub value: String,
}

impl ClassifiedTag {
    /// `<b>name:</b> value` with both parts escaped
    pub fn to_line(&self) -> String {
        format!("<b>{}:</b> {}", partial_escape(&self.name), partial_escape(&self.value))
    }
}

pub struct TagClassifier {
    policy: InclusionPolicy,
    binary_threshold: usize,
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::new(InclusionPolicy::All, DEFAULT_BINARY_THRESHOLD)
    }
}

impl TagClassifier {
    pub fn new(policy: InclusionPolicy, binary_threshold: usize) -> Self {
        TagClassifier { policy, binary_threshold }
    }

    pub fn policy(&self) -> &InclusionPolicy {
        &self.policy
    }

    /// Classifies every reportable entry in mapping order
    pub fn classify(&self, tags: &TagMap) -> Vec<ClassifiedTag> {
        tags.iter()
            .filter_map(|(tag, value)| {
                let name = tag_name(tag);
                if name == names::GPS_INFO {
                    return None;
                }
                if !self.policy.admits(tag, &name) {
                    trace!("Tag {} ({}) excluded by policy", tag, name);
                    return None;
                }
                let value = self.render_value(&name, value);
                Some(ClassifiedTag { tag, name, value })
            })
            .collect()
    }

    pub fn format_lines(&self, tags: &TagMap) -> Vec<String> {
        self.classify(tags).iter().map(ClassifiedTag::to_line).collect()
    }

    fn render_value(&self, name: &str, value: &TagValue) -> String {
        match value {
            TagValue::Bytes(bytes) if bytes.len() > self.binary_threshold => {
                format!("(Binary data: {} bytes)", bytes.len())
            }
            TagValue::Bytes(bytes) if name == names::USER_COMMENT => decode_user_comment(bytes),
            other => other.to_string(),
        }
    }
}

/// Decodes a UserComment value
///
/// Strips the 8-byte character code when one is present. Undecodable
/// bytes are replaced, so this never fails.
pub fn decode_user_comment(bytes: &[u8]) -> String {
    let (code, body) = if bytes.len() >= comment_preamble::LEN {
        bytes.split_at(comment_preamble::LEN)
    } else {
        (&bytes[..0], bytes)
    };

    let text = if code == comment_preamble::UNICODE {
        decode_utf16(body)
    } else if code == comment_preamble::ASCII || code == comment_preamble::JIS || code == comment_preamble::UNDEFINED {
        String::from_utf8_lossy(body).into_owned()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    text.trim_end_matches('\0').to_string()
}

/// UTF-16 with a byte order mark, or guessed from the first code unit
fn decode_utf16(body: &[u8]) -> String {
    let (little_endian, body) = match body {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        [first, 0, ..] if *first != 0 => (true, body),
        _ => (false, body),
    };

    let units = body.chunks_exact(2).map(|pair| {
        if little_endian {
            u16::from_le_bytes([pair[0], pair[1]])
        } else {
            u16::from_be_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
