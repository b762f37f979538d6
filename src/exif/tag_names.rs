//! Tag name reference tables
//!
//! Two static lookups (standard tags and GPS sub-tags) shipped as
//! `exif_tags.toml` and parsed once at first use. Lookups never fail: an
//! identifier missing from a table is named by its decimal value.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::exif::errors::{MetaError, MetaResult};

lazy_static! {
    static ref TAG_DEFINITIONS: TagDefinitions = {
        let content = include_str!("../../exif_tags.toml");
        TagDefinitions::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse EXIF tag definitions: {}", e);
            TagDefinitions::default()
        })
    };
}

/// Container for both name tables
#[derive(Debug, Default)]
pub struct TagDefinitions {
    pub tag_names: HashMap<u16, String>,
    pub gps_tag_names: HashMap<u16, String>,
}

impl TagDefinitions {
    /// Parse the tables from a TOML string
    pub fn from_str(content: &str) -> MetaResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| MetaError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut defs = TagDefinitions::default();
        Self::parse_id_table(&toml_value, "tag_ids", &mut defs.tag_names);
        Self::parse_id_table(&toml_value, "gps_tag_ids", &mut defs.gps_tag_names);

        Ok(defs)
    }

    fn parse_id_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }

    pub fn tag_name(&self, tag: u16) -> String {
        self.tag_names.get(&tag).cloned().unwrap_or_else(|| tag.to_string())
    }

    pub fn gps_tag_name(&self, tag: u16) -> String {
        self.gps_tag_names.get(&tag).cloned().unwrap_or_else(|| tag.to_string())
    }
}

/// Name of a standard tag, or the identifier itself
pub fn tag_name(tag: u16) -> String {
    TAG_DEFINITIONS.tag_name(tag)
}

/// Name of a GPS sub-tag, or the identifier itself
pub fn gps_tag_name(tag: u16) -> String {
    TAG_DEFINITIONS.gps_tag_name(tag)
}

/// Whether the standard table knows this identifier
pub fn is_known_tag(tag: u16) -> bool {
    TAG_DEFINITIONS.tag_names.contains_key(&tag)
}
