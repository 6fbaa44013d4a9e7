//! Decoding of inline image payloads.
//!
//! Images arrive as RFC 2397 `data:` URLs, e.g.
//! `data:image/svg+xml;charset=utf-8,%3Csvg...` or
//! `data:image/png;base64,iVBOR...`. The EPUB writer stores the raw bytes as
//! archive entries; the HTML writer embeds the payload untouched.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, percent_encode};

use crate::error::AssetErrorKind;

const SCHEME: &str = "data:";

/// A decoded image: its declared media type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Text encoding used for the data segment of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    Base64,
    Percent,
}

impl DecodedAsset {
    /// File extension matching the media type.
    pub fn extension(&self) -> &str {
        extension_for(&self.media_type)
    }
}

/// Decode a `data:` URL into its media type and raw bytes.
///
/// The data segment is everything after the first `,`. It is always
/// percent-decoded; when the header carries a `;base64` parameter the result
/// is then base64-decoded, ignoring whitespace.
///
/// # Examples
///
/// ```
/// use storybook::asset::decode_payload;
///
/// let asset = decode_payload("data:image/svg+xml;charset=utf-8,%3Csvg%2F%3E").unwrap();
/// assert_eq!(asset.media_type, "image/svg+xml");
/// assert_eq!(asset.data, b"<svg/>");
/// ```
pub fn decode_payload(payload: &str) -> Result<DecodedAsset, AssetErrorKind> {
    let payload = payload.trim();
    let rest = strip_scheme(payload).ok_or(AssetErrorKind::MissingScheme)?;
    let comma = memchr::memchr(b',', rest.as_bytes()).ok_or(AssetErrorKind::MissingSeparator)?;
    let (header, data) = (&rest[..comma], &rest[comma + 1..]);

    let mut params = header.split(';');
    let media_type = params
        .next()
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .ok_or(AssetErrorKind::MissingMediaType)?;
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let data: Vec<u8> = percent_decode_str(data).collect();
    let data = if is_base64 {
        let compact: Vec<u8> = data
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        STANDARD.decode(compact)?
    } else {
        data
    };

    Ok(DecodedAsset { media_type, data })
}

/// Build a `data:` URL for raw bytes.
///
/// [`decode_payload`] maps the result back to exactly `data`.
pub fn encode_payload(media_type: &str, data: &[u8], encoding: PayloadEncoding) -> String {
    match encoding {
        PayloadEncoding::Base64 => format!("{SCHEME}{media_type};base64,{}", STANDARD.encode(data)),
        PayloadEncoding::Percent => {
            format!("{SCHEME}{media_type},{}", percent_encode(data, NON_ALPHANUMERIC))
        }
    }
}

/// Whether `media_type` is one of the EPUB 2 core image types.
pub fn is_core_media_type(media_type: &str) -> bool {
    matches!(
        media_type,
        "image/gif" | "image/jpeg" | "image/png" | "image/svg+xml"
    )
}

/// Guess a file extension from a media type.
pub fn extension_for(media_type: &str) -> &str {
    match media_type {
        "image/svg+xml" => "svg",
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => {
            let subtype = media_type
                .split_once('/')
                .map(|(_, s)| s)
                .unwrap_or("")
                .split('+')
                .next()
                .unwrap_or("");
            if !subtype.is_empty() && subtype.bytes().all(|b| b.is_ascii_alphanumeric()) {
                subtype
            } else {
                "bin"
            }
        }
    }
}

fn strip_scheme(payload: &str) -> Option<&str> {
    let head = payload.get(..SCHEME.len())?;
    head.eq_ignore_ascii_case(SCHEME)
        .then(|| &payload[SCHEME.len()..])
}
