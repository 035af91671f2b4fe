//! File status extractor (size, modification time).

use crate::Result;
use crate::plugins::{MetadataExtractor, Plugin};
use crate::types::Metadata;
use serde_json::json;
use std::time::UNIX_EPOCH;

/// Extracts basic file status: byte size and modification time.
///
/// Produces `size` (bytes) and `modified` (unix seconds). Not cacheable - a
/// stat call is cheaper than a store round-trip. A path that cannot be
/// stat'ed yields an empty fragment.
pub struct FileStatExtractor;

impl Default for FileStatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStatExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Plugin for FileStatExtractor {
    fn name(&self) -> &str {
        "FileStatExtractor"
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

impl MetadataExtractor for FileStatExtractor {
    fn extract(&self, _identifier: &str, matched_path: &str, _current: &Metadata) -> Result<Metadata> {
        let mut fragment = Metadata::new();

        let stat = match std::fs::metadata(matched_path) {
            Ok(stat) => stat,
            Err(err) => {
                tracing::debug!(path = %matched_path, error = %err, "stat failed, no file metadata");
                return Ok(fragment);
            }
        };

        fragment.insert("size", json!(stat.len()));
        if let Ok(modified) = stat.modified()
            && let Ok(since_epoch) = modified.duration_since(UNIX_EPOCH)
        {
            fragment.insert("modified", json!(since_epoch.as_secs()));
        }
        Ok(fragment)
    }
}
