//! The story document consumed by the exporters.
//!
//! A [`StoryDocument`] is produced upstream (usually deserialized from the
//! story-generation backend's JSON) and handed to an exporter as a read-only
//! snapshot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Language used when a story does not declare one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A generated story: title, free-text metadata, and ordered chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoryDocument {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub style: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub tone: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub audience: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub language: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub moral: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "cover_image_svg", alias = "cover_image")
    )]
    pub cover_image: Option<ImagePayload>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chapters: Vec<Chapter>,
}

/// One chapter of a story. Reading order is its position in
/// [`StoryDocument::chapters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chapter {
    /// Index reported by the generator. Informational only.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub index: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "nullable"))]
    pub text: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "image_svg", alias = "image")
    )]
    pub image: Option<ImagePayload>,
}

/// A self-describing inline image (a `data:` URL).
///
/// The payload is kept in its encoded form; see [`crate::asset`] for decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ImagePayload(String);

/// Where an image lives in a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Cover,
    /// 1-based chapter position.
    Chapter(usize),
}

impl StoryDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_moral(mut self, moral: impl Into<String>) -> Self {
        self.moral = Some(moral.into());
        self
    }

    pub fn with_cover_image(mut self, image: ImagePayload) -> Self {
        self.cover_image = Some(image);
        self
    }

    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Parse a story from the generator's JSON representation.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// Parse a story from a JSON stream.
    #[cfg(feature = "serde")]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// The declared language, or [`DEFAULT_LANGUAGE`] when blank.
    pub fn language(&self) -> &str {
        let language = self.language.trim();
        if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        }
    }

    /// The moral, if one is present and not blank.
    pub fn moral(&self) -> Option<&str> {
        self.moral.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// The cover image, ignoring empty payloads.
    pub fn cover_image(&self) -> Option<&ImagePayload> {
        self.cover_image.as_ref().filter(|p| !p.is_empty())
    }

    /// Iterate over every present image together with its slot, cover first.
    pub fn images(&self) -> impl Iterator<Item = (ImageSlot, &ImagePayload)> {
        self.cover_image()
            .map(|p| (ImageSlot::Cover, p))
            .into_iter()
            .chain(
                self.chapters
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| c.image().map(|p| (ImageSlot::Chapter(i + 1), p))),
            )
    }

    /// Check that the required fields are present.
    ///
    /// Exporters call this before doing any work.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidDocument("story title is empty".to_string()));
        }
        for (i, chapter) in self.chapters.iter().enumerate() {
            if chapter.title.trim().is_empty() {
                return Err(Error::InvalidDocument(format!(
                    "chapter {} has an empty title",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

impl Chapter {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index: None,
            title: title.into(),
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// The chapter image, ignoring empty payloads.
    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref().filter(|p| !p.is_empty())
    }
}

impl ImagePayload {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for ImagePayload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImagePayload {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ImagePayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Accept `null` wherever the generator may omit a text field.
#[cfg(feature = "serde")]
fn nullable<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_defaults_to_en() {
        assert_eq!(StoryDocument::new("T").language(), "en");
        assert_eq!(StoryDocument::new("T").with_language("  ").language(), "en");
        assert_eq!(StoryDocument::new("T").with_language("fr").language(), "fr");
    }

    #[test]
    fn test_validate_rejects_blank_titles() {
        assert!(matches!(
            StoryDocument::new("   ").validate(),
            Err(Error::InvalidDocument(_))
        ));

        let story = StoryDocument::new("Ok").with_chapter(Chapter::new("", "text"));
        let err = story.validate().unwrap_err();
        assert!(err.to_string().contains("chapter 1"));

        assert!(StoryDocument::new("Ok").validate().is_ok());
    }

    #[test]
    fn test_images_skip_empty_payloads() {
        let story = StoryDocument::new("T")
            .with_cover_image(ImagePayload::new(""))
            .with_chapter(Chapter::new("A", "a"))
            .with_chapter(Chapter::new("B", "b").with_image("data:image/png;base64,AA==".into()));

        let slots: Vec<_> = story.images().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![ImageSlot::Chapter(2)]);
        assert!(story.cover_image().is_none());
    }

    #[test]
    fn test_blank_moral_is_absent() {
        assert_eq!(StoryDocument::new("T").with_moral(" ").moral(), None);
        assert_eq!(StoryDocument::new("T").with_moral("Be kind").moral(), Some("Be kind"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_generator_shape() {
        let json = r#"{
            "title": "The Fox",
            "style": "fable",
            "tone": null,
            "audience": "kids",
            "moral": "Slow and steady",
            "cover_image_svg": "data:image/svg+xml;charset=utf-8,%3Csvg%2F%3E",
            "chapters": [
                {"index": 1, "title": "Start", "text": "Once", "image_svg": null},
                {"index": 2, "title": "End", "text": "Done"}
            ]
        }"#;

        let story = StoryDocument::from_json(json).unwrap();
        assert_eq!(story.title, "The Fox");
        assert_eq!(story.tone, "");
        assert_eq!(story.language(), "en");
        assert!(story.cover_image().is_some());
        assert_eq!(story.chapters.len(), 2);
        assert_eq!(story.chapters[0].index, Some(1));
        assert!(story.chapters[1].image().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(
            StoryDocument::from_json("{not json"),
            Err(Error::InvalidDocument(_))
        ));
    }
}
