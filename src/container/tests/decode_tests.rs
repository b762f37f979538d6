use std::io::Cursor;

use image::{ColorType, ImageFormat, Rgb, RgbImage};
use img_parts::jpeg::{Jpeg, JpegSegment};
use img_parts::png::{Png, PngChunk};
use img_parts::{Bytes, ImageEXIF};

use crate::container::{decode_metadata, decode_pixels, locate_exif};
use crate::exif::builder::TiffBlockBuilder;
use crate::exif::constants::tags;
use crate::exif::value::TagValue;

fn encode(format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 128]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn artist_block(name: &str) -> Vec<u8> {
    let mut builder = TiffBlockBuilder::new();
    let primary = builder.primary();
    builder.add_ascii(primary, tags::ARTIST, name).unwrap();
    builder.build().unwrap()
}

#[test]
fn test_decode_plain_png() {
    let decoded = decode_metadata(&encode(ImageFormat::Png)).unwrap();

    assert_eq!(decoded.format, ImageFormat::Png);
    assert_eq!((decoded.width, decoded.height), (4, 3));
    assert_eq!(decoded.color, ColorType::Rgb8);
    assert_eq!(decoded.color_mode(), "RGB");
    assert_eq!(decoded.format_name(), "PNG");
    assert!(decoded.tags.is_empty());
}

#[test]
fn test_png_exif_and_text_chunks() {
    let mut png = Png::from_bytes(Bytes::from(encode(ImageFormat::Png))).unwrap();
    png.set_exif(Some(Bytes::from(artist_block("bob"))));
    let iend = png.chunks().len() - 1;
    png.chunks_mut().insert(iend, PngChunk::new(*b"tEXt", Bytes::from_static(b"Comment\0hello")));
    let bytes = png.encoder().bytes().to_vec();

    let decoded = decode_metadata(&bytes).unwrap();
    assert_eq!(decoded.tags.get(tags::ARTIST), Some(&TagValue::Text("bob".to_string())));
    assert_eq!(decoded.info_value("Comment"), Some("hello"));
}

#[test]
fn test_jpeg_exif_and_comment() {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(encode(ImageFormat::Jpeg))).unwrap();
    jpeg.set_exif(Some(Bytes::from(artist_block("carol"))));
    jpeg.segments_mut().insert(1, JpegSegment::new_with_contents(0xFE, Bytes::from_static(b"shot on a phone")));
    let bytes = jpeg.encoder().bytes().to_vec();

    assert!(locate_exif(&bytes, ImageFormat::Jpeg).is_some());
    let decoded = decode_metadata(&bytes).unwrap();
    assert_eq!(decoded.format_name(), "JPEG");
    assert_eq!(decoded.tags.get(tags::ARTIST), Some(&TagValue::Text("carol".to_string())));
    assert_eq!(decoded.info_value("comment"), Some("shot on a phone"));
}

#[test]
fn test_unreadable_exif_block_is_ignored() {
    let mut png = Png::from_bytes(Bytes::from(encode(ImageFormat::Png))).unwrap();
    png.set_exif(Some(Bytes::from_static(b"garbage")));
    let bytes = png.encoder().bytes().to_vec();

    let decoded = decode_metadata(&bytes).unwrap();
    assert!(decoded.tags.is_empty());
}

#[test]
fn test_garbage_is_a_decode_error() {
    assert!(decode_metadata(b"definitely not an image").is_err());
    assert!(decode_pixels(b"").is_err());
}

#[test]
fn test_decode_pixels() {
    let pixels = decode_pixels(&encode(ImageFormat::Png)).unwrap().to_rgb8();
    assert_eq!(pixels.get_pixel(3, 2), &Rgb([120, 120, 128]));
}
