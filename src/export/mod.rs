//! Export of stories to HTML and EPUB.
//!
//! # Architecture
//!
//! The `Exporter` trait uses a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `render()` produces the complete output in memory
//! - `export()` hands the finished bytes to any `Write` sink
//!
//! Output is only written once it is complete, so a failed export never
//! leaves partial data in the sink.
//!
//! # Example
//!
//! ```no_run
//! use storybook::StoryDocument;
//! use storybook::export::{EpubExporter, Exporter};
//! use std::fs::File;
//!
//! let story = StoryDocument::from_json(&std::fs::read_to_string("story.json")?)?;
//! let mut file = File::create("story.epub")?;
//! EpubExporter::new().export(&story, &mut file)?;
//! # Ok::<(), storybook::Error>(())
//! ```

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::story::StoryDocument;
use crate::util::sanitize_filename;

mod epub;
mod html;

pub use epub::{DEFAULT_CREATOR, EpubConfig, EpubExporter};
pub use html::{DEFAULT_HTML_STYLESHEET, HtmlConfig, HtmlExporter, render_html};

/// File name used when a story has no usable title.
pub const FALLBACK_STEM: &str = "storybook";

/// Trait for exporting stories to a specific format.
pub trait Exporter {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Render the complete output in memory.
    fn render(&self, story: &StoryDocument) -> Result<Vec<u8>>;

    /// Render the story and write the finished bytes to `writer`.
    fn export<W: Write>(&self, story: &StoryDocument, writer: &mut W) -> Result<()> {
        let bytes = self.render(story)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Html,
    Epub,
}

impl ExportFormat {
    /// MIME type to declare when delivering the output.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Epub => "application/epub+zip",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Epub => "epub",
        }
    }

    /// Detect the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "epub" => Some(ExportFormat::Epub),
            _ => None,
        }
    }

    /// Export with the default configuration for this format.
    pub fn export(self, story: &StoryDocument) -> Result<Artifact> {
        let bytes = match self {
            ExportFormat::Html => HtmlExporter::new().render(story)?,
            ExportFormat::Epub => EpubExporter::new().render(story)?,
        };
        Ok(Artifact {
            format: self,
            filename: suggested_filename(&story.title, self),
            bytes,
        })
    }
}

/// A finished export, ready to be handed to whatever saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// `{title}.{ext}`, or `storybook.{ext}` when the title is blank.
pub fn suggested_filename(title: &str, format: ExportFormat) -> String {
    let stem = sanitize_filename(title);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };
    format!("{stem}.{}", format.extension())
}
