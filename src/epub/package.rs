//! OPF package document: metadata, manifest and spine.
//!
//! The manifest is keyed by item id. The spine holds the cover id apart from
//! the chapter ids, so reading order is always cover first regardless of the
//! order items were declared in the manifest.


use crate::error::{Error, Result};
use crate::escape::{escape_attribute, escape_markup};

pub const NCX_ID: &str = "ncx";
pub const STYLESHEET_ID: &str = "css";
pub const COVER_ID: &str = "cover";
pub const COVER_IMAGE_ID: &str = "imgcover";

pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
pub const CSS_MEDIA_TYPE: &str = "text/css";

/// Manifest id of the n-th chapter document (1-based).
pub fn chapter_id(n: usize) -> String {
    format!("chap{n}")
}

/// Manifest id of the n-th chapter image (1-based).
pub fn chapter_image_id(n: usize) -> String {
    format!("img{n}")
}

/// One file declared in the manifest. `href` is relative to the OPF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// Every file in the package, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<ManifestItem>,
}

impl Manifest {
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Result<()> {
        let id = id.into();
        if self.contains(&id) {
            return Err(Error::InvalidPackage(format!("duplicate manifest id {id}")));
        }
        self.items.push(ManifestItem {
            id,
            href: href.into(),
            media_type: media_type.into(),
        });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Reading order: the cover document, then chapters in story order.
#[derive(Debug, Clone)]
pub struct Spine {
    cover: String,
    chapters: Vec<String>,
}

impl Spine {
    fn new(cover: impl Into<String>) -> Self {
        Self {
            cover: cover.into(),
            chapters: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.cover.as_str()).chain(self.chapters.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        1 + self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Dublin Core metadata written to the OPF.
#[derive(Debug, Clone, Default)]
pub struct PackageMetadata {
    pub title: String,
    pub language: String,
    pub identifier: String,
    pub creator: String,
    pub description: Option<String>,
    pub subjects: Vec<String>,
}

/// The complete package document.
#[derive(Debug, Clone)]
pub struct Package {
    pub metadata: PackageMetadata,
    manifest: Manifest,
    spine: Spine,
    has_cover_image: bool,
}

impl Package {
    /// Start a package with the NCX, stylesheet and cover document declared.
    pub fn new(metadata: PackageMetadata) -> Result<Self> {
        let mut manifest = Manifest::default();
        manifest.insert(NCX_ID, "toc.ncx", NCX_MEDIA_TYPE)?;
        manifest.insert(STYLESHEET_ID, "styles/style.css", CSS_MEDIA_TYPE)?;
        manifest.insert(COVER_ID, "text/cover.xhtml", XHTML_MEDIA_TYPE)?;

        Ok(Self {
            metadata,
            manifest,
            spine: Spine::new(COVER_ID),
            has_cover_image: false,
        })
    }

    /// Declare the n-th chapter document (and its image) and append it to the
    /// spine. Chapters must be added in order.
    ///
    /// `image` is `(media_type, extension)` of the decoded chapter image.
    pub fn add_chapter(&mut self, n: usize, image: Option<(&str, &str)>) -> Result<()> {
        let id = chapter_id(n);
        self.manifest
            .insert(id.clone(), format!("text/{id}.xhtml"), XHTML_MEDIA_TYPE)?;
        if let Some((media_type, ext)) = image {
            self.manifest.insert(
                chapter_image_id(n),
                format!("images/{id}.{ext}"),
                media_type,
            )?;
        }
        self.spine.chapters.push(id);
        Ok(())
    }

    /// Declare the cover image.
    pub fn set_cover_image(&mut self, media_type: &str, ext: &str) -> Result<()> {
        self.manifest
            .insert(COVER_IMAGE_ID, format!("images/cover.{ext}"), media_type)?;
        self.has_cover_image = true;
        Ok(())
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn spine(&self) -> &Spine {
        &self.spine
    }

    /// Render `content.opf`.
    pub fn to_opf(&self) -> String {
        let meta = &self.metadata;
        let mut opf = String::new();

        opf.push_str(
            r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="bookid" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
        );

        opf.push_str(&format!(
            "    <dc:title>{}</dc:title>\n",
            escape_markup(&meta.title)
        ));
        opf.push_str(&format!(
            "    <dc:language>{}</dc:language>\n",
            escape_markup(&meta.language)
        ));
        opf.push_str(&format!(
            "    <dc:identifier id=\"bookid\">{}</dc:identifier>\n",
            escape_markup(&meta.identifier)
        ));
        opf.push_str(&format!(
            "    <dc:creator>{}</dc:creator>\n",
            escape_markup(&meta.creator)
        ));
        if let Some(ref description) = meta.description {
            opf.push_str(&format!(
                "    <dc:description>{}</dc:description>\n",
                escape_markup(description)
            ));
        }
        for subject in &meta.subjects {
            opf.push_str(&format!(
                "    <dc:subject>{}</dc:subject>\n",
                escape_markup(subject)
            ));
        }
        if self.has_cover_image {
            opf.push_str(&format!(
                "    <meta name=\"cover\" content=\"{COVER_IMAGE_ID}\"/>\n"
            ));
        }

        opf.push_str("  </metadata>\n  <manifest>\n");
        for item in self.manifest.iter() {
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
                escape_attribute(&item.id),
                escape_attribute(&item.href),
                escape_attribute(&item.media_type)
            ));
        }
        opf.push_str("  </manifest>\n");

        opf.push_str(&format!("  <spine toc=\"{NCX_ID}\">\n"));
        for id in self.spine.iter() {
            opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_attribute(id)));
        }
        opf.push_str("  </spine>\n");

        opf.push_str("  <guide>\n");
        opf.push_str(
            "    <reference type=\"cover\" title=\"Cover\" href=\"text/cover.xhtml\"/>\n",
        );
        opf.push_str("  </guide>\n</package>\n");
        opf
    }
}
