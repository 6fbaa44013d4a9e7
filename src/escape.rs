//! Escaping of user-supplied text for HTML and XHTML output.
//!
//! Every piece of story text goes through exactly one of these functions at
//! the point where it is emitted.

use std::borrow::Cow;

use quick_xml::escape::{escape, partial_escape};

/// Replace `&`, `<` and `>` with their entity equivalents.
///
/// # Examples
///
/// ```
/// use storybook::escape::escape_markup;
///
/// assert_eq!(escape_markup("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
/// ```
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    partial_escape(text)
}

/// Escape text for a double-quoted attribute value.
///
/// Quotes are escaped in addition to `&`, `<` and `>`.
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Escape prose and turn each line ending into a `<br/>` marker.
///
/// `\r\n`, `\n` and a lone `\r` each count as one line ending.
pub fn text_with_breaks(text: &str) -> String {
    let escaped = escape_markup(text);
    let mut out = String::with_capacity(escaped.len() + escaped.len() / 8);
    let mut chars = escaped.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("<br/>");
            }
            '\n' => out.push_str("<br/>"),
            c => out.push(c),
        }
    }
    out
}
