use std::io::Write;

use crate::analysis::digest::{digest_bytes, digest_file, digest_reader, digest_reader_with_chunk_size};
use crate::exif::errors::MetaError;

#[test]
fn test_known_vectors() {
    let digests = digest_bytes(b"abc");
    assert_eq!(digests.md5, "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(digests.sha256, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");

    let empty = digest_bytes(b"");
    assert_eq!(empty.md5, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(empty.sha256.len(), 64);
}

#[test]
fn test_chunk_size_does_not_change_result() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

    let tiny = digest_reader_with_chunk_size(data.as_slice(), 1).unwrap();
    let odd = digest_reader_with_chunk_size(data.as_slice(), 4097).unwrap();
    let large = digest_reader_with_chunk_size(data.as_slice(), 1 << 20).unwrap();

    assert_eq!(tiny, odd);
    assert_eq!(tiny, large);
    assert_eq!(tiny, digest_bytes(&data));
    assert_eq!(digest_reader(data.as_slice()).unwrap(), digest_reader(data.as_slice()).unwrap());
}

#[test]
fn test_zero_chunk_size_is_rejected() {
    let result = digest_reader_with_chunk_size(&b"abc"[..], 0);
    assert!(matches!(result, Err(MetaError::ConfigError(_))));
}

#[test]
fn test_digest_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"abc").unwrap();

    let digests = digest_file(file.path(), 2).unwrap();
    assert_eq!(digests, digest_bytes(b"abc"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = digest_file(dir.path().join("missing.jpg"), 4096);
    assert!(matches!(result, Err(MetaError::IoError(_))));
}
