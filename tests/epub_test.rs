//! EPUB package tests: OPF manifest/spine, NCX navigation and XHTML content.

#![cfg(feature = "serde")]

use std::collections::HashSet;
use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use storybook::{AssetErrorKind, Chapter, Error, ImageSlot, StoryDocument, render_epub};
use zip::ZipArchive;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_story(name: &str) -> StoryDocument {
    let json = std::fs::read_to_string(format!("{}/{}", FIXTURES_DIR, name)).unwrap();
    StoryDocument::from_json(&json).expect("fixture parses")
}

struct Epub {
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl Epub {
    fn new(story: &StoryDocument) -> Self {
        let bytes = render_epub(story).expect("export succeeds");
        Self {
            zip: ZipArchive::new(Cursor::new(bytes)).unwrap(),
        }
    }

    fn text(&mut self, name: &str) -> String {
        let mut file = self.zip.by_name(name).unwrap_or_else(|_| panic!("missing {name}"));
        let mut s = String::new();
        file.read_to_string(&mut s).unwrap();
        s
    }

    fn names(&self) -> HashSet<String> {
        self.zip.file_names().map(str::to_string).collect()
    }
}

/// Collect the attributes of every element named `tag`, in document order.
fn elements(xml: &str, tag: &[u8]) -> Vec<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == tag => {
                let attrs = e
                    .attributes()
                    .map(|a| {
                        let a = a.unwrap();
                        (
                            String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                            String::from_utf8(a.value.to_vec()).unwrap(),
                        )
                    })
                    .collect();
                found.push(attrs);
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("malformed XML: {e}"),
            _ => {}
        }
    }
    found
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> &'a str {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_else(|| panic!("missing attribute {key}"))
}

/// Names of every element in `xml`, in document order.
fn element_names(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap());
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("malformed XML: {e}"),
            _ => {}
        }
    }
    names
}

fn assert_well_formed(xml: &str) {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Err(e) => panic!("malformed XML: {e}\n{xml}"),
            _ => {}
        }
    }
}

// ============================================================================
// Spine and manifest
// ============================================================================

#[test]
fn test_spine_is_cover_then_chapters() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let opf = epub.text("OEBPS/content.opf");

    let spine: Vec<_> = elements(&opf, b"itemref")
        .iter()
        .map(|a| attr(a, "idref").to_string())
        .collect();
    assert_eq!(spine, vec!["cover", "chap1", "chap2", "chap3"]);
}

#[test]
fn test_empty_story_spine_has_only_cover() {
    let mut epub = Epub::new(&StoryDocument::new("Nothing yet"));
    let opf = epub.text("OEBPS/content.opf");

    let spine = elements(&opf, b"itemref");
    assert_eq!(spine.len(), 1);
    assert_eq!(attr(&spine[0], "idref"), "cover");
}

#[test]
fn test_manifest_references_existing_entries() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let opf = epub.text("OEBPS/content.opf");
    let names = epub.names();

    let items = elements(&opf, b"item");
    let ids: HashSet<_> = items.iter().map(|a| attr(a, "id").to_string()).collect();
    assert_eq!(ids.len(), items.len(), "manifest ids must be unique");

    for item in &items {
        let path = format!("OEBPS/{}", attr(item, "href"));
        assert!(names.contains(&path), "manifest references missing {path}");
    }
    for itemref in elements(&opf, b"itemref") {
        assert!(ids.contains(attr(&itemref, "idref")));
    }

    // Every packaged file other than the container plumbing is declared.
    let hrefs: HashSet<_> = items
        .iter()
        .map(|a| format!("OEBPS/{}", attr(a, "href")))
        .collect();
    for name in &names {
        if name.starts_with("OEBPS/") && name != "OEBPS/content.opf" {
            assert!(hrefs.contains(name), "{name} is not in the manifest");
        }
    }
}

#[test]
fn test_chapter_without_image_has_no_image_entry() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let opf = epub.text("OEBPS/content.opf");

    assert!(!epub.names().iter().any(|n| n.starts_with("OEBPS/images/chap2.")));
    let items = elements(&opf, b"item");
    assert!(!items.iter().any(|a| attr(a, "id") == "img2"));
    assert!(!epub.text("OEBPS/text/chap2.xhtml").contains("<img"));
}

#[test]
fn test_image_media_types() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let opf = epub.text("OEBPS/content.opf");
    let items = elements(&opf, b"item");

    let find = |id: &str| items.iter().find(|a| attr(a, "id") == id).unwrap();
    assert_eq!(attr(find("imgcover"), "href"), "images/cover.svg");
    assert_eq!(attr(find("imgcover"), "media-type"), "image/svg+xml");
    assert_eq!(attr(find("img1"), "href"), "images/chap1.svg");
    assert_eq!(attr(find("img3"), "href"), "images/chap3.png");
    assert_eq!(attr(find("img3"), "media-type"), "image/png");
    assert_eq!(attr(find("ncx"), "media-type"), "application/x-dtbncx+xml");
    assert_eq!(attr(find("css"), "media-type"), "text/css");

    let metas = elements(&opf, b"meta");
    assert!(metas.iter().any(|a| attr(a, "name") == "cover" && attr(a, "content") == "imgcover"));
}

#[test]
fn test_package_metadata() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let opf = epub.text("OEBPS/content.opf");

    assert!(opf.contains("<dc:title>The Brave Little Fox</dc:title>"));
    assert!(opf.contains("<dc:language>en</dc:language>"));
    assert!(opf.contains("<dc:creator>FLAMES Storybook</dc:creator>"));
    assert!(opf.contains("<dc:description>Courage grows when you share it.</dc:description>"));
    assert!(opf.contains("<dc:subject>fable</dc:subject>"));
    assert!(opf.contains("version=\"2.0\""));
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_ncx_play_order() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let ncx = epub.text("OEBPS/toc.ncx");

    let points = elements(&ncx, b"navPoint");
    let orders: Vec<_> = points.iter().map(|a| attr(a, "playOrder").to_string()).collect();
    assert_eq!(orders, vec!["1", "2", "3", "4"]);

    let sources: Vec<_> = elements(&ncx, b"content")
        .iter()
        .map(|a| attr(a, "src").to_string())
        .collect();
    assert_eq!(
        sources,
        vec![
            "text/cover.xhtml",
            "text/chap1.xhtml",
            "text/chap2.xhtml",
            "text/chap3.xhtml"
        ]
    );
    assert!(ncx.contains("<text>Friends &amp; Owls</text>"));
}

#[test]
fn test_identifier_shared_between_opf_and_ncx() {
    let mut epub = Epub::new(&StoryDocument::new("Ids"));
    let ncx = epub.text("OEBPS/toc.ncx");
    let opf = epub.text("OEBPS/content.opf");

    let metas = elements(&ncx, b"meta");
    let uid = metas
        .iter()
        .find(|a| attr(a, "name") == "dtb:uid")
        .map(|a| attr(a, "content").to_string())
        .unwrap();
    assert!(uid.starts_with("urn:uuid:"));
    assert!(opf.contains(&format!("<dc:identifier id=\"bookid\">{uid}</dc:identifier>")));
}

// ============================================================================
// Content documents
// ============================================================================

#[test]
fn test_xhtml_documents_well_formed() {
    let story = fixture_story("brave_fox.json");
    let mut epub = Epub::new(&story);

    for name in epub.names() {
        if name.ends_with(".xhtml") || name.ends_with(".opf") || name.ends_with(".ncx") {
            assert_well_formed(&epub.text(&name));
        }
    }
}

#[test]
fn test_content_documents_use_xhtml11_elements() {
    let story = fixture_story("brave_fox.json");
    let mut epub = Epub::new(&story);
    let html5_only = ["section", "article", "nav", "header", "footer", "aside", "main", "figure"];

    let mut documents = 0;
    for name in epub.names() {
        if !name.ends_with(".xhtml") {
            continue;
        }
        documents += 1;
        let names = element_names(&epub.text(&name));
        assert!(names.iter().any(|n| n == "div"), "{name} has no div wrapper");
        for element in &names {
            assert!(
                !html5_only.contains(&element.as_str()),
                "{name} uses <{element}>, which XHTML 1.1 does not define"
            );
        }
    }
    assert_eq!(documents, 4);
}

#[test]
fn test_title_escaped_once() {
    let story = StoryDocument::new("<script>&</script>").with_chapter(Chapter::new("x", "y"));
    let mut epub = Epub::new(&story);

    let escaped = "&lt;script&gt;&amp;&lt;/script&gt;";
    for name in ["OEBPS/text/cover.xhtml", "OEBPS/content.opf", "OEBPS/toc.ncx"] {
        let doc = epub.text(name);
        assert!(doc.contains(escaped), "{name} lacks escaped title");
        assert!(!doc.contains("&amp;lt;"), "{name} double-escaped");
        assert!(!doc.contains("<script>"), "{name} unescaped");
    }
}

#[test]
fn test_newlines_become_breaks() {
    let story = StoryDocument::new("Breaks").with_chapter(Chapter::new("One", "Line one\nLine two"));
    let mut epub = Epub::new(&story);

    assert!(epub.text("OEBPS/text/chap1.xhtml").contains("<p>Line one<br/>Line two</p>"));
}

#[test]
fn test_carriage_returns_become_breaks() {
    let story = StoryDocument::new("Breaks").with_chapter(Chapter::new("One", "a\rb\r\nc"));
    let mut epub = Epub::new(&story);

    let chapter = epub.text("OEBPS/text/chap1.xhtml");
    assert!(chapter.contains("<p>a<br/>b<br/>c</p>"));
    assert!(!chapter.contains('\r'));
}

#[test]
fn test_percent_escaped_base64_image() {
    let story = StoryDocument::new("Escaped")
        .with_chapter(Chapter::new("One", "a").with_image("data:image/svg+xml;base64,PHN2Zy8%2B".into()));
    let bytes = render_epub(&story).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();

    let mut data = Vec::new();
    zip.by_name("OEBPS/images/chap1.svg").unwrap().read_to_end(&mut data).unwrap();
    assert_eq!(data, b"<svg/>");
}

#[test]
fn test_chapter_text_escaped() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));
    let chapter = epub.text("OEBPS/text/chap2.xhtml");

    assert!(chapter.contains("<h2>Friends &amp; Owls</h2>"));
    assert!(chapter.contains("An owl said: \"&lt;Hoo&gt; goes there?\"<br/>Finn answered bravely."));
}

#[test]
fn test_content_links_stylesheet_and_images() {
    let mut epub = Epub::new(&fixture_story("brave_fox.json"));

    let cover = epub.text("OEBPS/text/cover.xhtml");
    assert!(cover.contains("<img src=\"../images/cover.svg\" alt=\"Cover\"/>"));
    let chapter = epub.text("OEBPS/text/chap3.xhtml");
    assert!(chapter.contains("<img src=\"../images/chap3.png\" alt=\"Home Again\"/>"));
    assert!(chapter.contains("<link rel=\"stylesheet\" type=\"text/css\" href=\"../styles/style.css\"/>"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_malformed_cover_aborts_export() {
    let story = StoryDocument::new("Broken")
        .with_cover_image("data:image/svg+xml;charset=utf-8".into())
        .with_chapter(Chapter::new("One", "a"));

    match render_epub(&story) {
        Err(Error::AssetDecode(err)) => {
            assert_eq!(err.slot, ImageSlot::Cover);
            assert_eq!(err.kind, AssetErrorKind::MissingSeparator);
            assert!(err.to_string().contains("cover"));
        }
        other => panic!("expected asset error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_empty_title_is_invalid() {
    let story = StoryDocument::new("").with_chapter(Chapter::new("One", "a"));
    assert!(matches!(render_epub(&story), Err(Error::InvalidDocument(_))));
}

#[test]
fn test_non_core_image_type_aborts_export() {
    let story = StoryDocument::new("Modern")
        .with_chapter(Chapter::new("One", "a").with_image("data:image/webp;base64,AA==".into()));

    match render_epub(&story) {
        Err(Error::AssetDecode(err)) => {
            assert_eq!(err.slot, ImageSlot::Chapter(1));
            assert_eq!(
                err.kind,
                AssetErrorKind::UnsupportedMediaType("image/webp".to_string())
            );
        }
        other => panic!("expected asset error, got {:?}", other.map(|b| b.len())),
    }
}
