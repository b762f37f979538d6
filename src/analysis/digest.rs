//! Content digests
//!
//! MD5 and SHA-256 are fed from the same bounded buffer, so a file is read
//! exactly once and memory use does not depend on its size.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use log::debug;
use md5::Md5;
use sha2::{Digest, Sha256};

use crate::exif::errors::{MetaError, MetaResult};

/// Default read buffer size
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Lowercase hex MD5 and SHA-256 of one byte stream
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigestPair {
    /// 32 hex characters
    pub md5: String,
    /// 64 hex characters
    pub sha256: String,
}

pub fn digest_reader<R: Read>(reader: R) -> MetaResult<DigestPair> {
    digest_reader_with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
}

/// Digests `reader` reading at most `chunk_size` bytes at a time
pub fn digest_reader_with_chunk_size<R: Read>(mut reader: R, chunk_size: usize) -> MetaResult<DigestPair> {
    if chunk_size == 0 {
        return Err(MetaError::ConfigError("digest chunk size must be positive".to_string()));
    }

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        md5.update(&buffer[..n]);
        sha256.update(&buffer[..n]);
        total += n as u64;
    }

    debug!("Digested {} bytes in chunks of {}", total, chunk_size);
    Ok(DigestPair {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    })
}

pub fn digest_file<P: AsRef<Path>>(path: P, chunk_size: usize) -> MetaResult<DigestPair> {
    let file = File::open(path.as_ref())?;
    digest_reader_with_chunk_size(file, chunk_size)
}

pub fn digest_bytes(bytes: &[u8]) -> DigestPair {
    DigestPair {
        md5: format!("{:x}", Md5::digest(bytes)),
        sha256: format!("{:x}", Sha256::digest(bytes)),
    }
}
