//! Response body decoding: content codings and text charsets.

use std::io::{self, Read};

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};

/// Undo the codings listed in `Content-Encoding`, last applied first.
///
/// `identity` and unrecognised codings are passed through untouched. Each
/// decoded stage may produce at most `limit` bytes.
pub(crate) fn decompress(content_encoding: Option<&str>, body: Vec<u8>, limit: u64) -> io::Result<Vec<u8>> {
    let Some(codings) = content_encoding else {
        return Ok(body);
    };
    if body.is_empty() {
        return Ok(body);
    }

    let mut body = body;
    for coding in codings.rsplit(',').map(str::trim) {
        body = match coding.to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => read_limited(GzDecoder::new(body.as_slice()), limit)?,
            // Servers disagree on whether "deflate" means zlib-wrapped or raw.
            "deflate" => match read_limited(ZlibDecoder::new(body.as_slice()), limit) {
                Ok(out) => out,
                Err(_) => read_limited(DeflateDecoder::new(body.as_slice()), limit)?,
            },
            _ => body,
        };
        if body.len() as u64 > limit {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("decompressed body exceeds {limit} bytes"),
            ));
        }
    }
    Ok(body)
}

/// Reads at most `limit + 1` bytes, enough to tell whether `limit` was exceeded.
fn read_limited(reader: impl Read, limit: u64) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut out)?;
    Ok(out)
}

/// The `charset` parameter of a `Content-Type` value, lowercased.
pub(crate) fn charset(content_type: Option<&str>) -> Option<String> {
    let ct = content_type?.to_ascii_lowercase();
    let idx = ct.find("charset=")?;
    let after = &ct[idx + "charset=".len()..];
    let end = after.find([';', ' ', '\t']).unwrap_or(after.len());
    let value = after[..end].trim_matches('"');
    (!value.is_empty()).then(|| value.to_string())
}

/// Decode `body` as text using the charset declared in `content_type`.
///
/// - UTF-8 (or no charset) decodes as UTF-8, replacing invalid sequences
/// - ISO-8859-1 and US-ASCII map each byte to the same code point
/// - anything else falls back to UTF-8
pub(crate) fn decode_text(content_type: Option<&str>, body: &[u8]) -> String {
    match charset(content_type).as_deref() {
        Some("iso-8859-1" | "latin1" | "latin-1" | "us-ascii" | "ascii") => {
            body.iter().map(|&b| char::from(b)).collect()
        }
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}
