//! Report assembly
//!
//! Runs digesting, decoding, geotag resolution and tag classification in
//! that order and joins the resulting lines. The assembler never fails: an
//! unreadable source or an undecodable image still yields a report, with
//! the failure written into it.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::analysis::classifier::TagClassifier;
use crate::analysis::digest::{digest_bytes, digest_file, digest_reader_with_chunk_size, DigestPair};
use crate::analysis::geotag::{resolve_geotag, GeoLookup};
use crate::config::{Config, ReportConfig};
use crate::container::{decode_metadata, DecodedImage};
use crate::exif::errors::MetaResult;
use crate::utils::string_utils::strip_markup;

pub const SEPARATOR: &str = "--------------------";

/// How far assembly got
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    /// Image decoded and it carries tags
    Complete,
    /// Image decoded without tags, or not decodable at all
    NoMetadata,
    /// Source could not be read
    Failed,
}

/// Finished report text
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReport {
    pub text: String,
    /// Length in characters, not bytes
    pub char_len: usize,
    pub status: ReportStatus,
    inline_limit: usize,
}

impl ComposedReport {
    pub fn new(text: String, status: ReportStatus, inline_limit: usize) -> Self {
        ComposedReport {
            char_len: text.chars().count(),
            text,
            status,
            inline_limit,
        }
    }

    /// Whether the text is too long to send as one message
    pub fn requires_file_delivery(&self) -> bool {
        self.char_len > self.inline_limit
    }

    /// The report without markup, for delivery as a text file
    pub fn to_plain_text(&self) -> String {
        strip_markup(&self.text)
    }
}

/// Builds reports with one fixed configuration
pub struct ReportAssembler {
    chunk_size: usize,
    inline_limit: usize,
    map_url: String,
    classifier: TagClassifier,
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReportAssembler {
    pub fn new(chunk_size: usize, report: &ReportConfig) -> Self {
        ReportAssembler {
            chunk_size,
            inline_limit: report.inline_limit,
            map_url: report.map_url.clone(),
            classifier: TagClassifier::new(report.inclusion.clone(), report.binary_threshold),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.digest.chunk_size, &config.report)
    }

    pub fn inline_limit(&self) -> usize {
        self.inline_limit
    }

    /// Reports on a file
    ///
    /// The digests are computed by streaming the file before it is loaded
    /// for decoding.
    pub fn assemble_file<P: AsRef<Path>>(&self, path: P) -> ComposedReport {
        let path = path.as_ref();
        info!("Analysing {}", path.display());

        let loaded = digest_file(path, self.chunk_size)
            .and_then(|digests| Ok((fs::read(path)?, digests)));
        match loaded {
            Ok((bytes, digests)) => self.compose(&bytes, &digests),
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                self.failed(&e)
            }
        }
    }

    /// Reports on bytes already in memory
    pub fn assemble_bytes(&self, bytes: &[u8]) -> ComposedReport {
        self.compose(bytes, &digest_bytes(bytes))
    }

    /// Reports on any reader
    pub fn assemble_reader<R: Read>(&self, reader: R) -> ComposedReport {
        match self.read_and_digest(reader) {
            Ok((bytes, digests)) => self.compose(&bytes, &digests),
            Err(e) => self.failed(&e),
        }
    }

    fn read_and_digest<R: Read>(&self, mut reader: R) -> MetaResult<(Vec<u8>, DigestPair)> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let digests = digest_reader_with_chunk_size(bytes.as_slice(), self.chunk_size)?;
        Ok((bytes, digests))
    }

    fn failed(&self, error: &dyn std::fmt::Display) -> ComposedReport {
        ComposedReport::new(format!("Error analysing file: {}", error), ReportStatus::Failed, self.inline_limit)
    }

    fn compose(&self, bytes: &[u8], digests: &DigestPair) -> ComposedReport {
        let mut lines = vec![
            "🔍 <b>File Analysis</b>".to_string(),
            format!("<b>MD5:</b> <code>{}</code>", digests.md5),
            format!("<b>SHA256:</b> <code>{}</code>", digests.sha256),
            SEPARATOR.to_string(),
        ];

        let decoded = match decode_metadata(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("Decode failed: {}", e);
                lines.push(format!("❌ {}", quick_xml::escape::partial_escape(&e.to_string())));
                return self.finish(lines, ReportStatus::NoMetadata);
            }
        };

        let status = if decoded.tags.is_empty() {
            lines.push("❌ No EXIF metadata found.".to_string());
            ReportStatus::NoMetadata
        } else {
            lines.push(self.geolocation_line(&resolve_geotag(&decoded.tags)));
            ReportStatus::Complete
        };
        lines.push(SEPARATOR.to_string());

        lines.extend(self.classifier.format_lines(&decoded.tags));
        lines.extend(format_block(&decoded));

        self.finish(lines, status)
    }

    fn geolocation_line(&self, lookup: &GeoLookup) -> String {
        match lookup.map_link_with(&self.map_url) {
            Some(url) => format!("🌍 <b>GEOLOCATION FOUND:</b>\n<a href=\"{}\">Open map</a>", url),
            None => "🌍 <b>Geolocation:</b> not found (no GPS tags)".to_string(),
        }
    }

    fn finish(&self, lines: Vec<String>, status: ReportStatus) -> ComposedReport {
        ComposedReport::new(lines.join("\n"), status, self.inline_limit)
    }
}

/// Format, size, colour mode and container info lines
fn format_block(decoded: &DecodedImage) -> Vec<String> {
    let escape = |s: &str| quick_xml::escape::partial_escape(s).into_owned();

    let mut lines = vec![
        format!("<b>Format:</b> {}", decoded.format_name()),
        format!("<b>Size:</b> {}x{}", decoded.width, decoded.height),
        format!("<b>Mode:</b> {}", decoded.color_mode()),
    ];
    lines.extend(
        decoded
            .info
            .iter()
            .map(|(key, value)| format!("<b>{}:</b> {}", escape(key), escape(value))),
    );
    lines
}
