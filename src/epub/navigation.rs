//! NCX navigation document (EPUB 2 table of contents).

use crate::escape::{escape_attribute, escape_markup};

/// A table-of-contents entry pointing at one content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub id: String,
    pub label: String,
    pub src: String,
}

/// The NCX document. Play order is the 1-based position of each point, so
/// the cover is always 1 and chapter N is N + 1.
#[derive(Debug, Clone)]
pub struct Navigation {
    uid: String,
    title: String,
    language: String,
    points: Vec<NavPoint>,
}

impl Navigation {
    /// Start a navigation map with the cover entry.
    pub fn new(uid: impl Into<String>, title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            language: language.into(),
            points: vec![NavPoint {
                id: "navCover".to_string(),
                label: "Cover".to_string(),
                src: "text/cover.xhtml".to_string(),
            }],
        }
    }

    /// Append the n-th chapter (1-based).
    pub fn push_chapter(&mut self, n: usize, title: impl Into<String>) {
        self.points.push(NavPoint {
            id: format!("nav{n}"),
            label: title.into(),
            src: format!("text/chap{n}.xhtml"),
        });
    }

    pub fn points(&self) -> &[NavPoint] {
        &self.points
    }

    /// Render `toc.ncx`.
    pub fn to_ncx(&self) -> String {
        let mut ncx = String::new();

        ncx.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
"#,
        );
        ncx.push_str(&format!(
            "<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\" xml:lang=\"{}\">\n",
            escape_attribute(&self.language)
        ));
        ncx.push_str(&format!(
            "  <head>\n    <meta name=\"dtb:uid\" content=\"{}\"/>\n",
            escape_attribute(&self.uid)
        ));
        ncx.push_str(
            r#"    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
"#,
        );
        ncx.push_str(&format!(
            "  <docTitle>\n    <text>{}</text>\n  </docTitle>\n  <navMap>\n",
            escape_markup(&self.title)
        ));

        for (i, point) in self.points.iter().enumerate() {
            ncx.push_str(&format!(
                "    <navPoint id=\"{}\" playOrder=\"{}\">\n",
                escape_attribute(&point.id),
                i + 1
            ));
            ncx.push_str(&format!(
                "      <navLabel><text>{}</text></navLabel>\n",
                escape_markup(&point.label)
            ));
            ncx.push_str(&format!(
                "      <content src=\"{}\"/>\n",
                escape_attribute(&point.src)
            ));
            ncx.push_str("    </navPoint>\n");
        }

        ncx.push_str("  </navMap>\n</ncx>\n");
        ncx
    }
}
