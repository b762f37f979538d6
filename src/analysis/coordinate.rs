//! Sexagesimal to decimal degree conversion

use std::fmt;

use crate::exif::errors::{MetaError, MetaResult};
use crate::exif::value::TagValue;

/// Signed decimal position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoCoordinate { latitude, longitude }
    }

    /// Whether both values lie inside the valid degree ranges
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?}", self.latitude, self.longitude)
    }
}

/// `degrees + minutes / 60 + seconds / 3600`
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Converts a (degrees, minutes, seconds) tag value
///
/// Components beyond the third are ignored. Every component must be a
/// finite, non-negative number.
pub fn to_decimal_degrees(components: &[TagValue]) -> MetaResult<f64> {
    if components.len() < 3 {
        return Err(MetaError::FormatError(format!(
            "expected degrees, minutes and seconds, got {} components", components.len()
        )));
    }

    let mut dms = [0f64; 3];
    for (slot, (component, label)) in dms
        .iter_mut()
        .zip(components.iter().zip(["degrees", "minutes", "seconds"]))
    {
        let value = component.as_f64().ok_or_else(|| {
            MetaError::FormatError(format!("{} is not numeric ({})", label, component.kind()))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(MetaError::FormatError(format!("{} out of range: {}", label, value)));
        }
        *slot = value;
    }

    Ok(dms_to_decimal(dms[0], dms[1], dms[2]))
}
