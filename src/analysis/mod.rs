//! Metadata analysis pipeline
//!
//! Digests, coordinate conversion, geotag resolution, tag classification
//! and the report built from them.

pub mod digest;
pub mod coordinate;
pub mod geotag;
pub mod classifier;
pub mod report;
#[cfg(test)]
mod tests;

pub use classifier::{ClassifiedTag, InclusionPolicy, TagClassifier};
pub use coordinate::{dms_to_decimal, to_decimal_degrees, GeoCoordinate};
pub use digest::{digest_bytes, digest_file, digest_reader, digest_reader_with_chunk_size, DigestPair};
pub use geotag::{resolve_geotag, GeoLookup};
pub use report::{ComposedReport, ReportAssembler, ReportStatus};
