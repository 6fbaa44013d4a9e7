//! Small helpers shared by the exporters.

use uuid::Uuid;

/// Generate a fresh package identifier (`urn:uuid:` + RFC 4122 v4 token).
///
/// Each call is independent; nothing is cached between exports.
pub fn generate_identifier() -> String {
    format!("urn:uuid:{}", Uuid::new_v4().hyphenated())
}

/// Replace characters that cannot appear in a file name.
pub fn sanitize_filename(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
