//! Error types for storybook exports.

use std::fmt;

use thiserror::Error;

use crate::story::ImageSlot;

/// Errors that can occur while exporting a story.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    AssetDecode(#[from] AssetError),

    #[error("Invalid story document: {0}")]
    InvalidDocument(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// An image payload that could not be decoded, with the slot it came from.
#[derive(Error, Debug)]
#[error("cannot decode {slot} image: {kind}")]
pub struct AssetError {
    pub slot: ImageSlot,
    #[source]
    pub kind: AssetErrorKind,
}

impl AssetError {
    pub fn new(slot: ImageSlot, kind: AssetErrorKind) -> Self {
        Self { slot, kind }
    }
}

/// Why an image payload was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetErrorKind {
    #[error("payload is not a data URL (missing `data:` scheme)")]
    MissingScheme,

    #[error("payload has no `,` data marker")]
    MissingSeparator,

    #[error("payload does not declare a media type")]
    MissingMediaType,

    #[error("invalid base64 data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("media type `{0}` is not an EPUB 2 core image type")]
    UnsupportedMediaType(String),
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSlot::Cover => f.write_str("cover"),
            ImageSlot::Chapter(n) => write!(f, "chapter {n}"),
        }
    }
}
