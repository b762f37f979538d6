use byteorder::{BigEndian, ByteOrder as _, LittleEndian, WriteBytesExt};

/// Writes one 12-byte IFD entry whose value fits in the value field
pub fn write_inline_entry<B: byteorder::ByteOrder>(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: [u8; 4]) {
    buffer.write_u16::<B>(tag).unwrap();
    buffer.write_u16::<B>(field_type).unwrap();
    buffer.write_u32::<B>(count).unwrap();
    buffer.extend_from_slice(&value);
}

/// Writes one 12-byte IFD entry pointing at `offset`
pub fn write_offset_entry<B: byteorder::ByteOrder>(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, offset: u32) {
    buffer.write_u16::<B>(tag).unwrap();
    buffer.write_u16::<B>(field_type).unwrap();
    buffer.write_u32::<B>(count).unwrap();
    buffer.write_u32::<B>(offset).unwrap();
}

fn short_field<B: byteorder::ByteOrder>(value: u16) -> [u8; 4] {
    let mut field = [0u8; 4];
    B::write_u16(&mut field[..2], value);
    field
}

fn long_field<B: byteorder::ByteOrder>(value: u32) -> [u8; 4] {
    let mut field = [0u8; 4];
    B::write_u32(&mut field, value);
    field
}

/// Little-endian block with Make, Orientation, a GPS sub-IFD and an Exif
/// sub-IFD carrying an ASCII UserComment
///
/// Layout:
///   8   IFD0 (4 entries)        -> 8 + 2 + 48 + 4 = 62
///   62  "Canon\0"               -> 68
///   68  GPS IFD (4 entries)     -> 68 + 54 = 122
///   122 latitude rationals      -> 146
///   146 longitude rationals     -> 170
///   170 Exif IFD (1 entry)      -> 170 + 18 = 188
///   188 UserComment (13 bytes)  -> 201
pub fn create_gps_exif_block() -> Vec<u8> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(b"II");
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    // IFD0
    buffer.write_u16::<LittleEndian>(4).unwrap();
    write_offset_entry::<LittleEndian>(&mut buffer, 271, 2, 6, 62);       // Make
    write_inline_entry::<LittleEndian>(&mut buffer, 274, 3, 1, short_field::<LittleEndian>(1)); // Orientation
    write_offset_entry::<LittleEndian>(&mut buffer, 34665, 4, 1, 170);    // ExifOffset
    write_offset_entry::<LittleEndian>(&mut buffer, 34853, 4, 1, 68);     // GPSInfo
    buffer.write_u32::<LittleEndian>(0).unwrap();
    assert_eq!(buffer.len(), 62);

    buffer.extend_from_slice(b"Canon\0");
    assert_eq!(buffer.len(), 68);

    // GPS IFD
    buffer.write_u16::<LittleEndian>(4).unwrap();
    write_inline_entry::<LittleEndian>(&mut buffer, 1, 2, 2, *b"S\0\0\0");  // GPSLatitudeRef
    write_offset_entry::<LittleEndian>(&mut buffer, 2, 5, 3, 122);          // GPSLatitude
    write_inline_entry::<LittleEndian>(&mut buffer, 3, 2, 2, *b"W\0\0\0");  // GPSLongitudeRef
    write_offset_entry::<LittleEndian>(&mut buffer, 4, 5, 3, 146);          // GPSLongitude
    buffer.write_u32::<LittleEndian>(0).unwrap();
    assert_eq!(buffer.len(), 122);

    // 33 deg 51 min 54 sec
    for (num, den) in [(33u32, 1u32), (51, 1), (54, 1)] {
        buffer.write_u32::<LittleEndian>(num).unwrap();
        buffer.write_u32::<LittleEndian>(den).unwrap();
    }
    // 151 deg 30 min 18 sec
    for (num, den) in [(151u32, 1u32), (30, 1), (180, 10)] {
        buffer.write_u32::<LittleEndian>(num).unwrap();
        buffer.write_u32::<LittleEndian>(den).unwrap();
    }
    assert_eq!(buffer.len(), 170);

    // Exif IFD
    buffer.write_u16::<LittleEndian>(1).unwrap();
    write_offset_entry::<LittleEndian>(&mut buffer, 37510, 7, 13, 188);   // UserComment
    buffer.write_u32::<LittleEndian>(0).unwrap();
    assert_eq!(buffer.len(), 188);

    buffer.extend_from_slice(b"ASCII\0\0\0hello");
    buffer
}

/// Big-endian block with ImageWidth (LONG), XResolution (RATIONAL) and an
/// unknown tag 50000 (SHORT)
pub fn create_big_endian_block() -> Vec<u8> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(b"MM");
    buffer.write_u16::<BigEndian>(42).unwrap();
    buffer.write_u32::<BigEndian>(8).unwrap();

    // IFD0 at 8, 3 entries -> ends at 8 + 2 + 36 + 4 = 50
    buffer.write_u16::<BigEndian>(3).unwrap();
    write_inline_entry::<BigEndian>(&mut buffer, 256, 4, 1, long_field::<BigEndian>(640));
    write_offset_entry::<BigEndian>(&mut buffer, 282, 5, 1, 50);
    write_inline_entry::<BigEndian>(&mut buffer, 50000, 3, 1, short_field::<BigEndian>(7));
    buffer.write_u32::<BigEndian>(0).unwrap();

    buffer.write_u32::<BigEndian>(72).unwrap();
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer
}

/// Writes a u16 with the given order, for header corruption tests
pub fn patch_u16_le(buffer: &mut [u8], at: usize, value: u16) {
    LittleEndian::write_u16(&mut buffer[at..at + 2], value);
}
