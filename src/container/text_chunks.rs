//! PNG textual chunks
//!
//! `tEXt` is Latin-1, `zTXt` is zlib-compressed Latin-1 and `iTXt` is UTF-8
//! with optional zlib compression.

use std::io::Read;

use flate2::read::ZlibDecoder;
use log::debug;

pub const TEXT: [u8; 4] = *b"tEXt";
pub const ZTXT: [u8; 4] = *b"zTXt";
pub const ITXT: [u8; 4] = *b"iTXt";

/// Keyword/text pair of a textual chunk, `None` for any other chunk type
/// or a malformed textual chunk
pub fn parse_text_chunk(kind: &[u8; 4], data: &[u8]) -> Option<(String, String)> {
    match *kind {
        TEXT => {
            let (keyword, text) = split_keyword(data)?;
            Some((keyword, latin1(text)))
        }
        ZTXT => {
            let (keyword, rest) = split_keyword(data)?;
            // first byte is the compression method, 0 = zlib
            let (&method, compressed) = rest.split_first()?;
            if method != 0 {
                return None;
            }
            Some((keyword, latin1(&inflate(compressed)?)))
        }
        ITXT => parse_itxt(data),
        _ => None,
    }
}

/// Builds a `tEXt` payload; the keyword must be 1-79 Latin-1 characters
pub fn encode_text_chunk(keyword: &str, text: &str) -> Option<Vec<u8>> {
    if text.contains('\0') {
        return None;
    }
    let keyword = to_latin1(keyword)?;
    if keyword.is_empty() || keyword.len() > 79 || keyword.contains(&0) {
        return None;
    }
    let mut data = keyword;
    data.push(0);
    data.extend(to_latin1(text)?);
    Some(data)
}

/// Builds an uncompressed `iTXt` payload for text outside Latin-1
pub fn encode_itxt_chunk(keyword: &str, text: &str) -> Option<Vec<u8>> {
    if text.contains('\0') {
        return None;
    }
    let mut data = to_latin1(keyword)?;
    if data.is_empty() || data.len() > 79 || data.contains(&0) {
        return None;
    }
    // NUL, compression flag, compression method, empty language, empty translated keyword
    data.extend_from_slice(&[0, 0, 0, 0, 0]);
    data.extend_from_slice(text.as_bytes());
    Some(data)
}

fn parse_itxt(data: &[u8]) -> Option<(String, String)> {
    let (keyword, rest) = split_keyword(data)?;
    let (&compressed, rest) = rest.split_first()?;
    let (&method, rest) = rest.split_first()?;
    let language_end = rest.iter().position(|&b| b == 0)?;
    let rest = &rest[language_end + 1..];
    let translated_end = rest.iter().position(|&b| b == 0)?;
    let text = &rest[translated_end + 1..];

    let text = if compressed == 1 {
        if method != 0 {
            return None;
        }
        inflate(text)?
    } else {
        text.to_vec()
    };
    Some((keyword, String::from_utf8_lossy(&text).into_owned()))
}

fn split_keyword(data: &[u8]) -> Option<(String, &[u8])> {
    let end = data.iter().position(|&b| b == 0)?;
    Some((latin1(&data[..end]), &data[end + 1..]))
}

fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    match ZlibDecoder::new(data).read_to_end(&mut out) {
        Ok(_) => Some(out),
        Err(e) => {
            debug!("Cannot inflate PNG text chunk: {}", e);
            None
        }
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn to_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}
