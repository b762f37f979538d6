use std::path::Path;

use log::info;

use crate::analysis::digest::{digest_file, DigestPair};
use crate::analysis::geotag::{resolve_geotag, GeoLookup};
use crate::analysis::report::{ComposedReport, ReportAssembler};
use crate::config::Config;
use crate::container::{decode_metadata, DecodedImage};
use crate::exif::errors::MetaResult;
use crate::scrub::{CustomMetadataPayload, OutputFormat, ScrubOutcome, Scrubber};

/// Main interface to the exifscope library
pub struct ExifScope {
    config: Config,
    assembler: ReportAssembler,
    scrubber: Scrubber,
}

impl Default for ExifScope {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

impl ExifScope {
    /// Create an instance using the given configuration
    pub fn from_config(config: Config) -> Self {
        let assembler = ReportAssembler::from_config(&config);
        let scrubber = Scrubber::from_config(&config.scrub);
        ExifScope { config, assembler, scrubber }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the metadata report for a file
    ///
    /// Never fails: an unreadable file yields a report with status `Failed`.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> ComposedReport {
        self.assembler.assemble_file(path)
    }

    /// Build the metadata report for an image already in memory
    pub fn analyze_bytes(&self, bytes: &[u8]) -> ComposedReport {
        self.assembler.assemble_bytes(bytes)
    }

    /// Compute MD5 and SHA-256 digests of a file
    pub fn digest<P: AsRef<Path>>(&self, path: P) -> MetaResult<DigestPair> {
        digest_file(path, self.config.digest.chunk_size)
    }

    /// Decode format, dimensions, tags and container info
    pub fn decode(&self, bytes: &[u8]) -> MetaResult<DecodedImage> {
        decode_metadata(bytes)
    }

    /// Find the GPS position recorded in an image
    ///
    /// # Returns
    /// `GeoLookup::Absent` when the image has no usable GPS tags, or a
    /// `DecodeError` when the image itself cannot be read
    pub fn geolocate(&self, bytes: &[u8]) -> MetaResult<GeoLookup> {
        Ok(resolve_geotag(&decode_metadata(bytes)?.tags))
    }

    /// Build the payload for a comment, with the configured author
    pub fn payload(&self, comment: &str) -> CustomMetadataPayload {
        let payload = CustomMetadataPayload::new(comment);
        match &self.config.scrub.author {
            Some(author) => payload.with_author(author.clone()),
            None => payload,
        }
    }

    /// Re-encode an image without its metadata
    ///
    /// # Arguments
    /// * `bytes` - Source image
    /// * `target` - Output format
    /// * `comment` - Optional comment to embed in the clean copy
    pub fn scrub(&self, bytes: &[u8], target: OutputFormat, comment: Option<&str>) -> MetaResult<ScrubOutcome> {
        let payload = comment.map(|c| self.payload(c));
        self.scrubber.scrub(bytes, target, payload.as_ref())
    }

    /// Write a metadata-free copy of `input` to `output`
    ///
    /// The output format follows the extension of `output`.
    pub fn scrub_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        comment: Option<&str>,
    ) -> MetaResult<ScrubOutcome> {
        let payload = comment.map(|c| self.payload(c));
        let outcome = self.scrubber.scrub_file(input.as_ref(), output.as_ref(), payload.as_ref())?;
        info!(
            "Scrubbed {} -> {} (payload embedded: {})",
            input.as_ref().display(),
            output.as_ref().display(),
            outcome.payload_embedded
        );
        Ok(outcome)
    }
}
