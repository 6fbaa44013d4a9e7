//! EPUB 2 package assembly.
//!
//! Layout of a generated package:
//!
//! ```text
//! mimetype                      (stored, first)
//! META-INF/container.xml
//! OEBPS/content.opf
//! OEBPS/toc.ncx
//! OEBPS/styles/style.css
//! OEBPS/text/cover.xhtml
//! OEBPS/text/chap{N}.xhtml
//! OEBPS/images/cover.{ext}      (only with a cover image)
//! OEBPS/images/chap{N}.{ext}    (only for chapters with an image)
//! ```

pub mod content;
pub mod navigation;
pub mod package;
mod writer;

pub use navigation::{NavPoint, Navigation};
pub use package::{Manifest, ManifestItem, Package, PackageMetadata, Spine};
pub use writer::{MIMETYPE, build_epub, render_epub};
