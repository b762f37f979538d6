//! Runtime configuration
//!
//! Read from a TOML file; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! [digest]
//! chunk_size = 4096
//!
//! [report]
//! inline_limit = 4000
//! binary_threshold = 50
//! inclusion = "all"            # or "allow-list"
//! allow_list = ["Make", "Model"]
//! map_url = "https://www.google.com/maps?q={lat},{lon}"
//!
//! [scrub]
//! jpeg_quality = 95
//! author = "anonymous"
//!
//! [vision]
//! enabled = false
//! credentials = ["key-1", "key-2"]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::debug;

use crate::analysis::classifier::{InclusionPolicy, DEFAULT_ALLOW_LIST, DEFAULT_BINARY_THRESHOLD};
use crate::analysis::digest::DEFAULT_CHUNK_SIZE;
use crate::analysis::geotag::DEFAULT_MAP_URL;
use crate::exif::errors::{MetaError, MetaResult};

/// Reports longer than this many characters go out as a file
pub const DEFAULT_INLINE_LIMIT: usize = 4000;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq)]
pub struct DigestConfig {
    pub chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub inline_limit: usize,
    pub binary_threshold: usize,
    pub inclusion: InclusionPolicy,
    pub map_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrubConfig {
    pub jpeg_quality: u8,
    /// Author written next to an injected comment; the comment itself when unset
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisionConfig {
    pub enabled: bool,
    pub credentials: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub digest: DigestConfig,
    pub report: ReportConfig,
    pub scrub: ScrubConfig,
    pub vision: VisionConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        DigestConfig { chunk_size: DEFAULT_CHUNK_SIZE }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            inline_limit: DEFAULT_INLINE_LIMIT,
            binary_threshold: DEFAULT_BINARY_THRESHOLD,
            inclusion: InclusionPolicy::All,
            map_url: DEFAULT_MAP_URL.to_string(),
        }
    }
}

impl Default for ScrubConfig {
    fn default() -> Self {
        ScrubConfig {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            author: None,
        }
    }
}

impl Config {
    /// Parse a configuration from a TOML string
    pub fn from_str(content: &str) -> MetaResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| MetaError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut config = Config::default();

        if let Some(digest) = toml_value.get("digest") {
            if let Some(size) = get_usize(digest, "digest", "chunk_size")? {
                if size == 0 {
                    return Err(MetaError::ConfigError("digest.chunk_size must be positive".to_string()));
                }
                config.digest.chunk_size = size;
            }
        }

        if let Some(report) = toml_value.get("report") {
            Self::parse_report(report, &mut config.report)?;
        }

        if let Some(scrub) = toml_value.get("scrub") {
            if let Some(quality) = get_usize(scrub, "scrub", "jpeg_quality")? {
                if !(1..=100).contains(&quality) {
                    return Err(MetaError::ConfigError(format!(
                        "scrub.jpeg_quality must be within 1-100, got {}", quality
                    )));
                }
                config.scrub.jpeg_quality = quality as u8;
            }
            config.scrub.author = get_str(scrub, "scrub", "author")?.map(str::to_string);
        }

        if let Some(vision) = toml_value.get("vision") {
            if let Some(enabled) = vision.get("enabled") {
                config.vision.enabled = enabled
                    .as_bool()
                    .ok_or_else(|| type_error("vision", "enabled", "a boolean"))?;
            }
            if let Some(credentials) = get_str_list(vision, "vision", "credentials")? {
                config.vision.credentials = credentials;
            }
        }

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn parse_report(report: &toml::Value, target: &mut ReportConfig) -> MetaResult<()> {
        if let Some(limit) = get_usize(report, "report", "inline_limit")? {
            target.inline_limit = limit;
        }
        if let Some(threshold) = get_usize(report, "report", "binary_threshold")? {
            target.binary_threshold = threshold;
        }
        if let Some(template) = get_str(report, "report", "map_url")? {
            if !template.contains("{lat}") || !template.contains("{lon}") {
                return Err(MetaError::ConfigError(
                    "report.map_url must contain {lat} and {lon}".to_string(),
                ));
            }
            target.map_url = template.to_string();
        }

        let allow_list: BTreeSet<String> = match get_str_list(report, "report", "allow_list")? {
            Some(names) => names.into_iter().collect(),
            None => DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
        };

        target.inclusion = match get_str(report, "report", "inclusion")? {
            None | Some("all") => InclusionPolicy::All,
            Some("allow-list") => InclusionPolicy::AllowList(allow_list),
            Some(other) => {
                return Err(MetaError::ConfigError(format!(
                    "report.inclusion must be \"all\" or \"allow-list\", got \"{}\"", other
                )))
            }
        };
        Ok(())
    }

    /// Load a configuration file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> MetaResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_str(&contents)
    }
}

fn type_error(section: &str, key: &str, expected: &str) -> MetaError {
    MetaError::ConfigError(format!("{}.{} must be {}", section, key, expected))
}

fn get_usize(table: &toml::Value, section: &str, key: &str) -> MetaResult<Option<usize>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| type_error(section, key, "a non-negative integer")),
    }
}

fn get_str<'a>(table: &'a toml::Value, section: &str, key: &str) -> MetaResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| type_error(section, key, "a string")),
    }
}

fn get_str_list(table: &toml::Value, section: &str, key: &str) -> MetaResult<Option<Vec<String>>> {
    let array = match table.get(key) {
        None => return Ok(None),
        Some(value) => value.as_array().ok_or_else(|| type_error(section, key, "an array of strings"))?,
    };
    array
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| type_error(section, key, "an array of strings"))
        })
        .collect::<MetaResult<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.digest.chunk_size, 4096);
        assert_eq!(config.report.inline_limit, 4000);
        assert_eq!(config.report.binary_threshold, 50);
        assert_eq!(config.report.inclusion, InclusionPolicy::All);
        assert_eq!(config.scrub.jpeg_quality, 95);
        assert!(!config.vision.enabled);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_document() {
        let config = Config::from_str(
            r#"
            [digest]
            chunk_size = 1

            [report]
            inline_limit = 100
            inclusion = "allow-list"
            allow_list = ["Make"]
            map_url = "https://maps.example/?ll={lat},{lon}"

            [scrub]
            jpeg_quality = 80
            author = "anon"

            [vision]
            enabled = true
            credentials = ["a", "b"]
            "#,
        )
        .unwrap();

        assert_eq!(config.digest.chunk_size, 1);
        assert_eq!(config.report.inline_limit, 100);
        assert_eq!(
            config.report.inclusion,
            InclusionPolicy::AllowList(["Make".to_string()].into_iter().collect())
        );
        assert_eq!(config.report.map_url, "https://maps.example/?ll={lat},{lon}");
        assert_eq!(config.scrub.jpeg_quality, 80);
        assert_eq!(config.scrub.author.as_deref(), Some("anon"));
        assert_eq!(config.vision.credentials, vec!["a", "b"]);
    }

    #[test]
    fn test_allow_list_without_names_uses_defaults() {
        let config = Config::from_str("[report]\ninclusion = \"allow-list\"").unwrap();
        assert_eq!(config.report.inclusion, InclusionPolicy::default_allow_list());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(Config::from_str("[digest]\nchunk_size = 0"), Err(MetaError::ConfigError(_))));
        assert!(matches!(Config::from_str("[report]\ninclusion = \"some\""), Err(MetaError::ConfigError(_))));
        assert!(matches!(Config::from_str("[report]\nmap_url = \"x\""), Err(MetaError::ConfigError(_))));
        assert!(matches!(Config::from_str("[scrub]\njpeg_quality = 101"), Err(MetaError::ConfigError(_))));
        assert!(matches!(Config::from_str("[vision]\ncredentials = [1]"), Err(MetaError::ConfigError(_))));
        assert!(matches!(Config::from_str("not = [toml"), Err(MetaError::ConfigError(_))));
    }
}
