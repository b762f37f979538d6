pub mod io;
pub mod exif;
pub mod container;
pub mod analysis;
pub mod scrub;
pub mod services;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::ExifScope;

pub use analysis::{ComposedReport, DigestPair, GeoCoordinate, GeoLookup, InclusionPolicy, ReportAssembler, ReportStatus};
pub use config::Config;
pub use exif::{MetaError, MetaResult, TagMap, TagValue};
pub use scrub::{CustomMetadataPayload, OutputFormat, ScrubOutcome, Scrubber};
