//! Content digest extractor (sha256).

use crate::Result;
use crate::plugins::{MetadataExtractor, Plugin};
use crate::types::Metadata;
use serde_json::json;
use sha2::{Digest, Sha256};

const DEFAULT_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Extracts a sha256 digest of the file content.
///
/// Produces `sha256` (lowercase hex). Cacheable with the default TTL -
/// hashing is the expensive extraction this pipeline's cache exists for.
///
/// Declares a dependency on `FileStatExtractor`: when the accumulated
/// metadata carries a `size` above the configured limit, hashing is skipped
/// and an empty fragment is returned. Without a `size` entry the file is
/// hashed unconditionally.
pub struct DigestExtractor {
    max_bytes: u64,
}

impl Default for DigestExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestExtractor {
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Skip hashing for files whose reported size exceeds `max_bytes`.
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl Plugin for DigestExtractor {
    fn name(&self) -> &str {
        "DigestExtractor"
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

impl MetadataExtractor for DigestExtractor {
    fn extract(&self, _identifier: &str, matched_path: &str, current: &Metadata) -> Result<Metadata> {
        let mut fragment = Metadata::new();

        if let Some(size) = current.get("size").and_then(|v| v.as_u64())
            && size > self.max_bytes
        {
            tracing::debug!(path = %matched_path, size, "file exceeds digest limit, skipping");
            return Ok(fragment);
        }

        let bytes = match std::fs::read(matched_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %matched_path, error = %err, "read failed, no digest");
                return Ok(fragment);
            }
        };

        fragment.insert("sha256", json!(hex::encode(Sha256::digest(&bytes))));
        Ok(fragment)
    }

    fn depends_on(&self) -> &[&str] {
        &["FileStatExtractor"]
    }

    fn cacheable(&self) -> bool {
        true
    }
}
