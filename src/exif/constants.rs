//! EXIF/TIFF constants
//!
//! Numeric identifiers used by the reader, the classifier and the
//! injector. Human-readable names live in `exif_tags.toml`.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number
    pub const TIFF_VERSION: u16 = 42;

    /// "II" byte order marker
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// Size of the classic TIFF header (marker, version, first IFD offset)
    pub const HEADER_SIZE: u64 = 8;
}

/// Field types as defined in TIFF 6.0
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // NUL-terminated 7-bit text
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // Opaque bytes
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs
    pub const FLOAT: u16 = 11;     // IEEE single
    pub const DOUBLE: u16 = 12;    // IEEE double
    pub const IFD: u16 = 13;       // LONG offset to a sub-IFD (TIFF Supplement 1)
}

/// Tags the pipeline addresses by number
pub mod tags {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const IMAGE_DESCRIPTION: u16 = 270;
    pub const MAKE: u16 = 271;
    pub const MODEL: u16 = 272;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const ORIENTATION: u16 = 274;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    pub const SOFTWARE: u16 = 305;
    pub const DATE_TIME: u16 = 306;
    pub const ARTIST: u16 = 315;
    pub const EXTRA_SAMPLES: u16 = 338;
    pub const COPYRIGHT: u16 = 33432;

    /// Pointer to the Exif sub-IFD
    pub const EXIF_IFD: u16 = 34665;
    /// Pointer to the GPS sub-IFD
    pub const GPS_IFD: u16 = 34853;
    /// Pointer to the interoperability sub-IFD
    pub const INTEROP_IFD: u16 = 40965;

    pub const DATE_TIME_ORIGINAL: u16 = 36867;
    pub const USER_COMMENT: u16 = 37510;
    pub const MAKER_NOTE: u16 = 37500;
}

/// GPS sub-IFD tags
pub mod gps_tags {
    pub const VERSION_ID: u16 = 0;
    pub const LATITUDE_REF: u16 = 1;
    pub const LATITUDE: u16 = 2;
    pub const LONGITUDE_REF: u16 = 3;
    pub const LONGITUDE: u16 = 4;
    pub const ALTITUDE_REF: u16 = 5;
    pub const ALTITUDE: u16 = 6;
}

/// Reserved names used by the classifier and the geotag resolver
pub mod names {
    pub const GPS_INFO: &str = "GPSInfo";
    pub const USER_COMMENT: &str = "UserComment";
    pub const GPS_LATITUDE: &str = "GPSLatitude";
    pub const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";
    pub const GPS_LONGITUDE: &str = "GPSLongitude";
    pub const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";
}

/// 8-byte character code prefixes of UserComment
pub mod comment_preamble {
    pub const ASCII: &[u8; 8] = b"ASCII\0\0\0";
    pub const UNICODE: &[u8; 8] = b"UNICODE\0";
    pub const JIS: &[u8; 8] = b"JIS\0\0\0\0\0";
    pub const UNDEFINED: &[u8; 8] = &[0u8; 8];
    pub const LEN: usize = 8;
}

/// Photometric interpretation values written by the TIFF encoder
pub mod photometric {
    pub const BLACK_IS_ZERO: u16 = 1;
    pub const RGB: u16 = 2;
}

/// Extra sample values
pub mod extra_samples {
    pub const UNASSOCIATED_ALPHA: u16 = 2;
}

/// Maximum number of entries accepted in one IFD
pub const MAX_IFD_ENTRIES: u16 = 1024;
