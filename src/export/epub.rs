//! EPUB exporter.
//!
//! Creates EPUB 2 packages from stories. Package assembly lives in
//! [`crate::epub`]; this module holds configuration and the [`Exporter`] glue.

use tracing::info;

use crate::archive::DEFAULT_COMPRESSION_LEVEL;
use crate::epub::build_epub;
use crate::error::Result;
use crate::story::StoryDocument;

use super::{ExportFormat, Exporter};

/// Producer recorded as `dc:creator` unless configured otherwise.
pub const DEFAULT_CREATOR: &str = "FLAMES Storybook";

/// Configuration for EPUB export.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// Producer identifier written to the package metadata.
    pub creator: String,
    /// Replaces the built-in content stylesheet when set.
    pub stylesheet: Option<String>,
    /// Package identifier. A fresh `urn:uuid:` token is generated per export
    /// when unset.
    pub identifier: Option<String>,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            creator: DEFAULT_CREATOR.to_string(),
            stylesheet: None,
            identifier: None,
        }
    }
}

/// EPUB format exporter.
///
/// # Example
///
/// ```
/// use storybook::{Chapter, StoryDocument};
/// use storybook::export::{EpubExporter, Exporter};
///
/// let story = StoryDocument::new("The Brave Fox")
///     .with_chapter(Chapter::new("Morning", "The fox woke up.\nIt was cold."));
///
/// let mut out = Vec::new();
/// EpubExporter::new().export(&story, &mut out)?;
/// assert!(out.starts_with(b"PK"));
/// # Ok::<(), storybook::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EpubExporter {
    config: EpubConfig,
}

impl EpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EpubConfig {
        &self.config
    }
}

impl Exporter for EpubExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Epub
    }

    fn render(&self, story: &StoryDocument) -> Result<Vec<u8>> {
        let archive = build_epub(story, &self.config)?;
        let entries = archive.len();
        let bytes = archive.serialize()?;
        info!(
            format = "epub",
            chapters = story.chapters.len(),
            entries,
            bytes = bytes.len(),
            compression_level = self.config.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL),
            "exported story"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_config() {
        let config = EpubConfig::default();
        assert_eq!(config.creator, "FLAMES Storybook");
        assert!(config.identifier.is_none());
        assert!(config.compression_level.is_none());
    }

    #[test]
    fn test_compression_level_applies() {
        use crate::story::Chapter;

        let story = StoryDocument::new("Echo")
            .with_chapter(Chapter::new("One", "echo echo echo ".repeat(400)));
        let render_at = |level: u32| {
            EpubExporter::new()
                .with_config(EpubConfig {
                    compression_level: Some(level),
                    identifier: Some("urn:uuid:fixed".to_string()),
                    ..Default::default()
                })
                .render(&story)
                .unwrap()
        };
        assert!(render_at(0).len() > render_at(9).len());
    }

    #[test]
    fn test_failed_export_writes_nothing() {
        let story = StoryDocument::new("Bad").with_cover_image("data:image/png".into());
        let mut out = Vec::new();
        let result = EpubExporter::new().export(&story, &mut out);
        assert!(matches!(result, Err(Error::AssetDecode(_))));
        assert!(out.is_empty());
    }
}
