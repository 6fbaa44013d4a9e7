//! XHTML content documents and the shared stylesheet.

use crate::escape::{escape_attribute, escape_markup, text_with_breaks};
use crate::story::{Chapter, StoryDocument};

/// Stylesheet shared by every content document.
pub const STYLESHEET: &str =
    "body{font-family:serif;margin:1rem 1.2rem;line-height:1.5}img{max-width:100%;height:auto}";

/// Wrap body markup in a strict XHTML 1.1 shell linking the stylesheet.
///
/// `title` must already be escaped.
pub fn xhtml_document(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
  <head>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="../styles/style.css"/>
  </head>
  <body>
    {body}
  </body>
</html>
"#
    )
}

/// The cover document: the title and, if present, the cover image.
///
/// `image_href` is relative to the `text/` directory.
pub fn cover_document(story: &StoryDocument, image_href: Option<&str>) -> String {
    let title = escape_markup(&story.title);
    let mut body = format!("<div class=\"cover\">\n      <h1>{title}</h1>\n");
    if let Some(href) = image_href {
        body.push_str(&format!(
            "      <img src=\"{}\" alt=\"Cover\"/>\n",
            escape_attribute(href)
        ));
    }
    body.push_str("    </div>");
    xhtml_document(&title, &body)
}

/// A chapter document: heading, optional image and the prose.
pub fn chapter_document(chapter: &Chapter, image_href: Option<&str>) -> String {
    let title = escape_markup(&chapter.title);
    let mut body = format!("<div class=\"chapter\">\n      <h2>{title}</h2>\n");
    if let Some(href) = image_href {
        body.push_str(&format!(
            "      <img src=\"{}\" alt=\"{}\"/>\n",
            escape_attribute(href),
            escape_attribute(&chapter.title)
        ));
    }
    body.push_str(&format!(
        "      <p>{}</p>\n    </div>",
        text_with_breaks(&chapter.text)
    ));
    xhtml_document(&title, &body)
}
