//! End-to-end tests through the public exifscope API

use std::io::Cursor;

use byteorder::{BigEndian, WriteBytesExt};
use image::{DynamicImage, ImageFormat, RgbImage};
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, ImageEXIF};

use exifscope::analysis::digest_bytes;
use exifscope::{Config, ExifScope, GeoLookup, OutputFormat, ReportStatus};

fn write_entry(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, field: [u8; 4]) {
    buffer.write_u16::<BigEndian>(tag).unwrap();
    buffer.write_u16::<BigEndian>(field_type).unwrap();
    buffer.write_u32::<BigEndian>(count).unwrap();
    buffer.extend_from_slice(&field);
}

/// Big-endian EXIF block: Make "Nikon" and GPS 52 deg 30' N, 13 deg 30' E
fn nikon_gps_block() -> Vec<u8> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(b"MM");                  // Big-endian
    buffer.write_u16::<BigEndian>(42).unwrap();        // TIFF magic number
    buffer.write_u32::<BigEndian>(8).unwrap();         // Offset to IFD0

    // IFD0, 2 entries, ends at 38
    buffer.write_u16::<BigEndian>(2).unwrap();
    write_entry(&mut buffer, 271, 2, 6, 38u32.to_be_bytes());   // Make -> 38
    write_entry(&mut buffer, 34853, 4, 1, 44u32.to_be_bytes()); // GPSInfo -> 44
    buffer.write_u32::<BigEndian>(0).unwrap();
    buffer.extend_from_slice(b"Nikon\0");

    // GPS IFD, 4 entries, ends at 98
    buffer.write_u16::<BigEndian>(4).unwrap();
    write_entry(&mut buffer, 1, 2, 2, *b"N\0\0\0");           // GPSLatitudeRef
    write_entry(&mut buffer, 2, 5, 3, 98u32.to_be_bytes());   // GPSLatitude -> 98
    write_entry(&mut buffer, 3, 2, 2, *b"E\0\0\0");           // GPSLongitudeRef
    write_entry(&mut buffer, 4, 5, 3, 122u32.to_be_bytes());  // GPSLongitude -> 122
    buffer.write_u32::<BigEndian>(0).unwrap();

    for (num, den) in [(52u32, 1u32), (30, 1), (0, 1), (13, 1), (30, 1), (0, 1)] {
        buffer.write_u32::<BigEndian>(num).unwrap();
        buffer.write_u32::<BigEndian>(den).unwrap();
    }
    assert_eq!(buffer.len(), 146);
    buffer
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn geotagged_jpeg() -> Vec<u8> {
    let pixels = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 8, |x, y| image::Rgb([x as u8 * 15, y as u8 * 30, 90])));
    let mut jpeg = Jpeg::from_bytes(Bytes::from(encode(&pixels, ImageFormat::Jpeg))).unwrap();
    jpeg.set_exif(Some(Bytes::from(nikon_gps_block())));
    jpeg.encoder().bytes().to_vec()
}

#[test]
fn test_geotagged_jpeg_report() {
    let source = geotagged_jpeg();
    let report = ExifScope::default().analyze_bytes(&source);
    let digests = digest_bytes(&source);

    assert_eq!(report.status, ReportStatus::Complete);
    let lines: Vec<&str> = report.text.lines().collect();
    assert_eq!(lines[0], "🔍 <b>File Analysis</b>");
    assert_eq!(lines[1], format!("<b>MD5:</b> <code>{}</code>", digests.md5));
    assert_eq!(lines[2], format!("<b>SHA256:</b> <code>{}</code>", digests.sha256));
    assert!(report.text.contains("<a href=\"https://www.google.com/maps?q=52.5,13.5\">Open map</a>"));
    assert!(report.text.contains("<b>Make:</b> Nikon"));
    assert!(report.text.contains("<b>Format:</b> JPEG"));
    assert!(report.text.contains("<b>Size:</b> 16x8"));
    assert!(!report.requires_file_delivery());
}

#[test]
fn test_geolocate() {
    let scope = ExifScope::default();
    let lookup = scope.geolocate(&geotagged_jpeg()).unwrap();
    let coordinate = lookup.coordinate().unwrap();
    assert_eq!(coordinate.latitude, 52.5);
    assert_eq!(coordinate.longitude, 13.5);

    let plain = encode(&DynamicImage::ImageRgb8(RgbImage::new(2, 2)), ImageFormat::Png);
    assert_eq!(scope.geolocate(&plain).unwrap(), GeoLookup::Absent);
}

#[test]
fn test_image_without_metadata() {
    let plain = encode(&DynamicImage::ImageRgb8(RgbImage::new(5, 4)), ImageFormat::Png);
    let report = ExifScope::default().analyze_bytes(&plain);

    assert_eq!(report.status, ReportStatus::NoMetadata);
    assert!(report.text.contains("❌ No EXIF metadata found."));
    assert!(report.text.contains("<b>Size:</b> 5x4"));
    assert!(report.text.contains("<b>Mode:</b> RGB"));
}

#[test]
fn test_undecodable_and_unreadable_input() {
    let scope = ExifScope::default();

    let garbage = scope.analyze_bytes(b"definitely not an image");
    assert_eq!(garbage.status, ReportStatus::NoMetadata);
    assert!(garbage.text.lines().nth(4).unwrap().starts_with("❌ "));

    let dir = tempfile::tempdir().unwrap();
    let missing = scope.analyze_file(dir.path().join("gone.jpg"));
    assert_eq!(missing.status, ReportStatus::Failed);
    assert!(missing.text.starts_with("Error analysing file: "));
}

#[test]
fn test_scrubbed_copy_has_no_geotag() {
    let scope = ExifScope::default();
    let outcome = scope.scrub(&geotagged_jpeg(), OutputFormat::Png, None).unwrap();

    assert!(!outcome.payload_embedded);
    assert_eq!(scope.geolocate(&outcome.bytes).unwrap(), GeoLookup::Absent);
    assert_eq!(scope.analyze_bytes(&outcome.bytes).status, ReportStatus::NoMetadata);
}

#[test]
fn test_scrub_file_to_tiff_with_comment() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    let output = dir.path().join("clean.tiff");
    std::fs::write(&input, geotagged_jpeg()).unwrap();

    let config = Config::from_str("[scrub]\nauthor = \"desk\"\n").unwrap();
    let scope = ExifScope::from_config(config);
    let outcome = scope.scrub_file(&input, &output, Some("reviewed")).unwrap();
    assert!(outcome.payload_embedded);

    let report = scope.analyze_file(&output);
    assert_eq!(report.status, ReportStatus::Complete);
    assert!(report.text.contains("<b>Artist:</b> desk"));
    assert!(report.text.contains("<b>UserComment:</b> reviewed"));
    assert!(report.text.contains("Geolocation:</b> not found"));
    assert!(!report.text.contains("Nikon"));
}
