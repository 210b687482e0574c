//! Data-URL codec for photo payloads
//!
//! Photos travel through the queue as `data:<mime>;base64,<payload>`
//! strings so the queue file stays one self-contained JSON record.
//! Encoding and decoding are isolated here; the sync engine never
//! touches base64 directly.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// Decoded image bytes with their MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Build a `data:` URL from raw image bytes
#[must_use]
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    let encoded = BASE64_STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Parse a `data:` URL back into bytes and MIME type
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidImageData("missing data: prefix".to_string()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::InvalidImageData("missing base64 marker".to_string()))?;
    if mime.is_empty() {
        return Err(Error::InvalidImageData("empty MIME type".to_string()));
    }
    let bytes = BASE64_STANDARD
        .decode(payload)
        .map_err(|error| Error::InvalidImageData(format!("bad base64 payload: {error}")))?;
    Ok(DecodedImage {
        bytes,
        mime: mime.to_string(),
    })
}
