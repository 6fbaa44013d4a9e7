use tracing::{debug, warn};

use crate::archive::{ArchiveWriter, Compression, DEFAULT_COMPRESSION_LEVEL};
use crate::asset::{DecodedAsset, decode_payload, is_core_media_type};
use crate::error::{AssetError, AssetErrorKind, Result};
use crate::export::EpubConfig;
use crate::story::{ImagePayload, ImageSlot, StoryDocument};
use crate::util::generate_identifier;

use super::content::{STYLESHEET, chapter_document, cover_document};
use super::navigation::Navigation;
use super::package::{COVER_IMAGE_ID, Package, PackageMetadata, chapter_image_id};

/// Contents of the `mimetype` entry.
pub const MIMETYPE: &[u8] = b"application/epub+zip";

/// Directory holding the package document and all content.
const OEBPS: &str = "OEBPS";

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Assemble every EPUB entry for `story` into an [`ArchiveWriter`].
///
/// The story is validated and every image decoded before the first entry is
/// queued; any failure aborts the build without producing an archive. Images
/// must use a core media type (GIF, JPEG, PNG or SVG).
///
/// The returned writer holds entries in their final order, starting with the
/// stored `mimetype` entry. Call [`ArchiveWriter::serialize`] to get the bytes.
pub fn build_epub(story: &StoryDocument, config: &EpubConfig) -> Result<ArchiveWriter> {
    story.validate()?;

    let cover_image = story
        .cover_image()
        .map(|payload| decode_image(ImageSlot::Cover, payload))
        .transpose()?;
    let chapter_images = story
        .chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| {
            chapter
                .image()
                .map(|payload| decode_image(ImageSlot::Chapter(i + 1), payload))
                .transpose()
        })
        .collect::<Result<Vec<_>>>()?;

    if story.language.trim().is_empty() {
        warn!(title = %story.title, "story has no language, defaulting to en");
    }

    let identifier = config
        .identifier
        .clone()
        .unwrap_or_else(generate_identifier);

    let mut package = Package::new(PackageMetadata {
        title: story.title.clone(),
        language: story.language().to_string(),
        identifier: identifier.clone(),
        creator: config.creator.clone(),
        description: story.moral().map(str::to_string),
        subjects: [&story.style, &story.tone, &story.audience]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })?;
    let mut navigation = Navigation::new(identifier, story.title.as_str(), story.language());

    for (i, (chapter, image)) in story.chapters.iter().zip(&chapter_images).enumerate() {
        let n = i + 1;
        package.add_chapter(
            n,
            image
                .as_ref()
                .map(|asset| (asset.media_type.as_str(), asset.extension())),
        )?;
        navigation.push_chapter(n, chapter.title.as_str());
    }
    if let Some(ref asset) = cover_image {
        package.set_cover_image(&asset.media_type, asset.extension())?;
    }

    let mut archive = ArchiveWriter::new()
        .with_compression_level(config.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL));

    // 1. mimetype (must be first, uncompressed)
    archive.add("mimetype", MIMETYPE, Compression::Stored)?;

    // 2. container, package and navigation documents
    archive.add("META-INF/container.xml", CONTAINER_XML, Compression::Deflated)?;
    archive.add(
        format!("{OEBPS}/content.opf"),
        package.to_opf(),
        Compression::Deflated,
    )?;
    archive.add(
        format!("{OEBPS}/toc.ncx"),
        navigation.to_ncx(),
        Compression::Deflated,
    )?;

    // 3. stylesheet
    let stylesheet = config.stylesheet.as_deref().unwrap_or(STYLESHEET);
    archive.add(
        format!("{OEBPS}/styles/style.css"),
        stylesheet,
        Compression::Deflated,
    )?;

    // 4. content documents, with image links taken from the manifest
    let cover_href = image_href(&package, COVER_IMAGE_ID);
    archive.add(
        format!("{OEBPS}/text/cover.xhtml"),
        cover_document(story, cover_href.as_deref()),
        Compression::Deflated,
    )?;
    for (i, chapter) in story.chapters.iter().enumerate() {
        let n = i + 1;
        let href = image_href(&package, &chapter_image_id(n));
        archive.add(
            format!("{OEBPS}/text/chap{n}.xhtml"),
            chapter_document(chapter, href.as_deref()),
            Compression::Deflated,
        )?;
    }

    // 5. images, cover first
    let images = cover_image
        .map(|asset| (COVER_IMAGE_ID.to_string(), asset))
        .into_iter()
        .chain(
            chapter_images
                .into_iter()
                .enumerate()
                .filter_map(|(i, image)| image.map(|asset| (chapter_image_id(i + 1), asset))),
        );
    for (id, asset) in images {
        if let Some(item) = package.manifest().get(&id) {
            archive.add(
                format!("{OEBPS}/{}", item.href),
                asset.data,
                Compression::Deflated,
            )?;
        }
    }

    debug!(
        entries = archive.len(),
        spine = package.spine().len(),
        "assembled epub package"
    );
    Ok(archive)
}

/// Build and serialize an EPUB with the default configuration.
pub fn render_epub(story: &StoryDocument) -> Result<Vec<u8>> {
    build_epub(story, &EpubConfig::default())?.serialize()
}

fn decode_image(slot: ImageSlot, payload: &ImagePayload) -> Result<DecodedAsset> {
    let asset =
        decode_payload(payload.as_str()).map_err(|kind| AssetError::new(slot, kind))?;
    if !is_core_media_type(&asset.media_type) {
        let kind = AssetErrorKind::UnsupportedMediaType(asset.media_type);
        return Err(AssetError::new(slot, kind).into());
    }
    debug!(%slot, media_type = %asset.media_type, bytes = asset.data.len(), "decoded image");
    Ok(asset)
}

/// Link to a manifest item from a document in `text/`.
fn image_href(package: &Package, id: &str) -> Option<String> {
    package
        .manifest()
        .get(id)
        .map(|item| format!("../{}", item.href))
}
