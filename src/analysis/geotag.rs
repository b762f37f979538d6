//! GPS block resolution
//!
//! Finds the GPSInfo directory in a tag mapping, converts the latitude and
//! longitude triples and applies the hemisphere references. Every failure
//! stays local: the caller gets a `GeoLookup` state, never an error.

use std::collections::HashMap;

use log::debug;

use crate::analysis::coordinate::{to_decimal_degrees, GeoCoordinate};
use crate::exif::constants::names;
use crate::exif::tag_names::{gps_tag_name, tag_name};
use crate::exif::value::{TagMap, TagValue};

/// Map URL template used when none is configured
pub const DEFAULT_MAP_URL: &str = "https://www.google.com/maps?q={lat},{lon}";

/// Outcome of looking for a position in a tag mapping
#[derive(Debug, Clone, PartialEq)]
pub enum GeoLookup {
    Found(GeoCoordinate),
    /// No GPS block, or it lacks latitude or longitude
    Absent,
    /// Latitude and longitude are present but cannot be converted
    Malformed(String),
}

impl GeoLookup {
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        match self {
            GeoLookup::Found(coordinate) => Some(*coordinate),
            _ => None,
        }
    }

    /// URL built from the default template
    pub fn map_link(&self) -> Option<String> {
        self.map_link_with(DEFAULT_MAP_URL)
    }

    /// URL built from `template`, where `{lat}` and `{lon}` are replaced
    pub fn map_link_with(&self, template: &str) -> Option<String> {
        self.coordinate().map(|c| {
            template
                .replace("{lat}", &format!("{:?}", c.latitude))
                .replace("{lon}", &format!("{:?}", c.longitude))
        })
    }
}

/// Resolves the position stored in `tags`
pub fn resolve_geotag(tags: &TagMap) -> GeoLookup {
    let gps_block = tags
        .iter()
        .find(|(tag, _)| tag_name(*tag) == names::GPS_INFO)
        .and_then(|(_, value)| value.as_directory());

    let gps_block = match gps_block {
        Some(block) if !block.is_empty() => block,
        _ => return GeoLookup::Absent,
    };

    let decoded: HashMap<String, &TagValue> = gps_block
        .iter()
        .map(|(tag, value)| (gps_tag_name(tag), value))
        .collect();

    let (latitude, longitude) = match (decoded.get(names::GPS_LATITUDE), decoded.get(names::GPS_LONGITUDE)) {
        (Some(lat), Some(lon)) => (*lat, *lon),
        _ => {
            debug!("GPS block without latitude or longitude");
            return GeoLookup::Absent;
        }
    };

    let convert = |value: &TagValue| to_decimal_degrees(&value.components());
    let (mut lat, mut lon) = match (convert(latitude), convert(longitude)) {
        (Ok(lat), Ok(lon)) => (lat, lon),
        (Err(e), _) | (_, Err(e)) => {
            debug!("GPS coordinates not convertible: {}", e);
            return GeoLookup::Malformed(e.to_string());
        }
    };

    if hemisphere(&decoded, names::GPS_LATITUDE_REF).as_deref() == Some("S") {
        lat = -lat;
    }
    if hemisphere(&decoded, names::GPS_LONGITUDE_REF).as_deref() == Some("W") {
        lon = -lon;
    }

    GeoLookup::Found(GeoCoordinate::new(lat, lon))
}

fn hemisphere(decoded: &HashMap<String, &TagValue>, name: &str) -> Option<String> {
    decoded
        .get(name)
        .and_then(|value| value.as_text())
        .map(|text| text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string())
}
