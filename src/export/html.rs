//! Single-file HTML exporter.
//!
//! Images are embedded in their original `data:` form, so the document has
//! no external references.

use tracing::{info, warn};

use crate::error::Result;
use crate::escape::{escape_attribute, escape_markup, text_with_breaks};
use crate::story::StoryDocument;

use super::{ExportFormat, Exporter};

/// Typography and responsive-image rules embedded in every document.
pub const DEFAULT_HTML_STYLESHEET: &str = "body{font-family:ui-sans-serif,system-ui,Inter,Arial;margin:2rem;line-height:1.6}img{max-width:100%;height:auto;border-radius:8px;border:1px solid #e5e7eb;margin:0.5rem 0}h1,h2,h3{line-height:1.2}";

/// Configuration for HTML export.
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    /// Replaces [`DEFAULT_HTML_STYLESHEET`] when set.
    pub stylesheet: Option<String>,
}

/// HTML format exporter.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    config: HtmlConfig,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: HtmlConfig) -> Self {
        self.config = config;
        self
    }
}

impl Exporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn render(&self, story: &StoryDocument) -> Result<Vec<u8>> {
        story.validate()?;
        if story.language.trim().is_empty() {
            warn!(title = %story.title, "story has no language, defaulting to en");
        }
        let stylesheet = self
            .config
            .stylesheet
            .as_deref()
            .unwrap_or(DEFAULT_HTML_STYLESHEET);
        let html = synthesize_document(story, stylesheet);
        info!(
            format = "html",
            chapters = story.chapters.len(),
            bytes = html.len(),
            "exported story"
        );
        Ok(html.into_bytes())
    }
}

/// Render a story as HTML with the default configuration.
pub fn render_html(story: &StoryDocument) -> Result<Vec<u8>> {
    HtmlExporter::new().render(story)
}

fn synthesize_document(story: &StoryDocument, stylesheet: &str) -> String {
    let title = escape_markup(&story.title);
    let mut html = String::with_capacity(4096);

    html.push_str(&format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\"/>\n",
        escape_attribute(story.language())
    ));
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>\n",
    );
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str(&format!("<style>{stylesheet}</style>\n</head>\n<body>\n"));

    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str(&format!(
        "<p><em>{}, {} • {} • {}</em></p>\n",
        escape_markup(or_placeholder(&story.style, "style")),
        escape_markup(or_placeholder(&story.tone, "tone")),
        escape_markup(&story.audience),
        escape_markup(story.language())
    ));
    if let Some(moral) = story.moral() {
        html.push_str(&format!(
            "<p><strong>Moral:</strong> {}</p>\n",
            escape_markup(moral)
        ));
    }
    if let Some(cover) = story.cover_image() {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Cover\" />\n",
            escape_attribute(cover.as_str())
        ));
    }

    for chapter in &story.chapters {
        html.push_str(&format!("<h2>{}</h2>\n", escape_markup(&chapter.title)));
        if let Some(image) = chapter.image() {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" />\n",
                escape_attribute(image.as_str()),
                escape_attribute(&chapter.title)
            ));
        }
        html.push_str(&format!("<p>{}</p>\n", text_with_breaks(&chapter.text)));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}
