//! Photo references stored on a unit.
//!
//! A photo is either an inline `data:<mime>;base64,<payload>` URI or an external URL.

use std::path::Path;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;

static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+);base64,").expect("valid data uri pattern")
});

/// Classification of a unit's `photo` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Photo<'a> {
    None,
    DataUri { mime: &'a str },
    Url(&'a str),
}

impl<'a> Photo<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if raw.trim().is_empty() {
            return Photo::None;
        }
        match DATA_URI.captures(raw).and_then(|caps| caps.get(1)) {
            Some(mime) => Photo::DataUri {
                mime: mime.as_str(),
            },
            None => Photo::Url(raw),
        }
    }
}

/// Encode raw image bytes as an inline data URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Guess an image mime type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
