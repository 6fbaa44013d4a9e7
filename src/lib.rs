//! # storybook
//!
//! Export generated stories as a single self-contained HTML document or as an
//! EPUB 2 e-book.
//!
//! ## Features
//!
//! - Valid OCF containers: stored `mimetype` first, OPF package, NCX table of
//!   contents, strict XHTML content documents
//! - Inline `data:` images decoded into package resources (base64 or
//!   percent-encoded)
//! - Deterministic output: identical stories give identical archives apart
//!   from the per-export package identifier
//! - Story JSON input (feature `serde`) and a command-line tool (feature `cli`)
//!
//! ## Quick Start
//!
//! ```
//! use storybook::{Chapter, ImagePayload, StoryDocument, render_epub, render_html};
//!
//! let story = StoryDocument::new("The Brave Fox")
//!     .with_style("fable")
//!     .with_audience("children")
//!     .with_cover_image(ImagePayload::new("data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg'/>"))
//!     .with_chapter(Chapter::new("Morning", "The fox woke up.\nIt was cold."));
//!
//! let html = render_html(&story)?;
//! let epub = render_epub(&story)?;
//! assert!(html.starts_with(b"<!doctype html>"));
//! assert_eq!(&epub[30..38], b"mimetype");
//! # Ok::<(), storybook::Error>(())
//! ```

pub mod archive;
pub mod asset;
pub mod epub;
pub mod error;
pub mod escape;
pub mod export;
pub mod story;
pub mod util;

pub use archive::{ArchiveWriter, Compression};
pub use epub::{build_epub, render_epub};
pub use error::{AssetError, AssetErrorKind, Error, Result};
pub use export::{
    Artifact, EpubConfig, EpubExporter, ExportFormat, Exporter, HtmlConfig, HtmlExporter,
    render_html, suggested_filename,
};
pub use story::{Chapter, ImagePayload, ImageSlot, StoryDocument};
