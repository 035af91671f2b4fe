//! MIME type extractor (extension-based).

use crate::Result;
use crate::plugins::{MetadataExtractor, Plugin};
use crate::types::Metadata;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Guesses a MIME type from the file extension.
///
/// Produces `mime` (e.g. `"image/jpeg"`). The identifier is the lowercased
/// extension rather than the path, so every `.jpg` in the tree shares one
/// cache entry; paths without an extension are not applicable. Unknown
/// extensions yield an empty fragment, which the cache keeps as a negative
/// result.
pub struct MimeExtractor;

impl Default for MimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for MimeExtractor {
    fn name(&self) -> &str {
        "MimeExtractor"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

impl MetadataExtractor for MimeExtractor {
    fn identify(&self, matched_path: &str) -> Option<String> {
        Path::new(matched_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    fn extract(&self, identifier: &str, _matched_path: &str, _current: &Metadata) -> Result<Metadata> {
        let mut fragment = Metadata::new();
        if let Some(mime) = mime_guess::from_ext(identifier).first() {
            fragment.insert("mime", json!(mime.essence_str()));
        }
        Ok(fragment)
    }

    fn cacheable(&self) -> bool {
        true
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(3600)
    }
}
