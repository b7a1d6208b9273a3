//! MIME type table
//!
//! Immutable extension to Content-Type mapping, built once at startup and
//! shared by reference with the request handler.

use std::collections::HashMap;
use std::path::Path;

/// Content type served when the extension is unknown or missing
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Baseline entries for common static assets
const BASELINE_TYPES: &[(&str, &str)] = &[
    (".html", "text/html; charset=utf-8"),
    (".htm", "text/html; charset=utf-8"),
    (".css", "text/css"),
    (".txt", "text/plain; charset=utf-8"),
    (".xml", "application/xml"),
    (".json", "application/json"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
    (".gif", "image/gif"),
    (".webp", "image/webp"),
    (".mp4", "video/mp4"),
    (".pdf", "application/pdf"),
    (".zip", "application/zip"),
    (".gz", "application/gzip"),
];

/// Entries that take precedence over any baseline default. The demo assets
/// (player script, WASM module, fonts, `.cv` scene files) depend on these
/// exact types.
const OVERRIDE_TYPES: &[(&str, &str)] = &[
    (".js", "application/javascript"),
    (".wasm", "application/wasm"),
    (".cv", "application/octet-stream"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".ttf", "font/ttf"),
    (".otf", "font/otf"),
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
];

/// Extension to Content-Type table, keyed with the leading dot.
///
/// The table is never mutated after construction; the handler reads it
/// through shared state.
pub struct MimeTable {
    types: HashMap<&'static str, &'static str>,
}

impl MimeTable {
    pub fn new() -> Self {
        let mut types = HashMap::with_capacity(BASELINE_TYPES.len() + OVERRIDE_TYPES.len());
        for (extension, content_type) in BASELINE_TYPES {
            types.insert(*extension, *content_type);
        }
        for (extension, content_type) in OVERRIDE_TYPES {
            types.insert(*extension, *content_type);
        }
        Self { types }
    }

    /// Look up the Content-Type for a file path by its extension.
    ///
    /// The lookup key includes the dot and is case-sensitive as stored.
    /// Unknown or missing extensions fall back to `application/octet-stream`.
    pub fn content_type(&self, path: &Path) -> &'static str {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(|extension| self.types.get(format!(".{extension}").as_str()).copied())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}
