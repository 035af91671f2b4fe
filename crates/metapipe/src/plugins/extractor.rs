//! Metadata extractor plugin trait.
//!
//! This module defines the trait for implementing metadata-extraction
//! plugins, plus convenience functions over the global registry.

use crate::Result;
use crate::cache::{DEFAULT_CACHE_TTL, MetadataStore};
use crate::plugins::Plugin;
use crate::types::Metadata;
use std::sync::Arc;
use std::time::Duration;

/// Trait for metadata extractor plugins.
///
/// Each extractor produces a fragment of metadata for a matched file path.
/// An external orchestrator selects the extractors applicable to a path,
/// orders them by their [`depends_on`](MetadataExtractor::depends_on)
/// declarations, and invokes each through an
/// [`ExtractorRunner`](crate::plugins::ExtractorRunner), merging fragments
/// into the accumulated metadata passed to the next extractor.
///
/// Extraction is synchronous; it may block on I/O. Extractors must be
/// thread-safe (`Send + Sync`) and are treated as idempotent: two concurrent
/// evaluations of the same input may both run and both cache, last write
/// wins.
///
/// # Caching
///
/// An extractor opts into caching by returning `true` from
/// [`cacheable`](MetadataExtractor::cacheable). Cached fragments are keyed
/// by the plugin name and the identifier returned by
/// [`identify`](MetadataExtractor::identify), and expire after
/// [`cache_ttl`](MetadataExtractor::cache_ttl) without a read. Every read
/// hit resets the expiry, keeping hot entries alive.
///
/// # Example
///
/// ```rust
/// use metapipe::plugins::{MetadataExtractor, Plugin};
/// use metapipe::{Metadata, Result};
/// use serde_json::json;
/// use std::time::Duration;
///
/// struct Exif;
///
/// impl Plugin for Exif {
///     fn name(&self) -> &str { "Exif" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// impl MetadataExtractor for Exif {
///     fn extract(&self, _identifier: &str, matched_path: &str, _current: &Metadata)
///         -> Result<Metadata> {
///         // Parse EXIF headers from the file at `matched_path` here.
///         let mut fragment = Metadata::new();
///         fragment.insert("width", json!(4000));
///         Ok(fragment)
///     }
///
///     fn cacheable(&self) -> bool { true }
///
///     fn cache_ttl(&self) -> Duration { Duration::from_secs(3600) }
/// }
/// ```
pub trait MetadataExtractor: Plugin {
    /// Derive the cache identifier for a matched path.
    ///
    /// Pure function of the path (plugins may also consult their own state,
    /// e.g. prior lookups). The default returns the path unchanged. Return
    /// `None` to signal "this plugin does not apply to this file": the
    /// runner then short-circuits to an empty fragment without calling
    /// [`extract`](MetadataExtractor::extract) or touching the store.
    ///
    /// The identifier is embedded verbatim in the cache key; identifiers
    /// containing `:` are the plugin author's responsibility.
    fn identify(&self, matched_path: &str) -> Option<String> {
        Some(matched_path.to_string())
    }

    /// Extract metadata for a matched path.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Identifier returned by [`identify`](MetadataExtractor::identify)
    /// * `matched_path` - Matched file path
    /// * `current` - Metadata accumulated so far by dependency plugins, read-only
    ///
    /// # Returns
    ///
    /// The extracted fragment. Return an empty [`Metadata`] when no metadata
    /// can be extracted for this input - that is "no data", not an error.
    /// Note there is exactly one policy for empty results: a cacheable
    /// plugin's empty fragment is stored as a negative result for the full
    /// TTL, whether it means "nothing to say" or "extraction failed softly".
    ///
    /// # Errors
    ///
    /// `MetapipeError::Extraction` for unrecoverable per-file problems
    /// (e.g. malformed content). Extraction errors propagate to the
    /// orchestrator uncaught; nothing is cached on failure.
    fn extract(&self, identifier: &str, matched_path: &str, current: &Metadata) -> Result<Metadata>;

    /// Names of plugins whose output this extractor wants to see in
    /// `current` before it runs.
    ///
    /// An ordering hint for the external orchestrator; not enforced by this
    /// crate. Defaults to none.
    fn depends_on(&self) -> &[&str] {
        &[]
    }

    /// Whether extracted fragments may be cached. Defaults to `false`.
    fn cacheable(&self) -> bool {
        false
    }

    /// Time-to-live for this plugin's cache entries.
    ///
    /// Defaults to [`DEFAULT_CACHE_TTL`] (12 hours).
    fn cache_ttl(&self) -> Duration {
        DEFAULT_CACHE_TTL
    }
}

/// Register a metadata extractor with the global registry.
///
/// Validates the plugin name, calls `initialize()`, and wraps the extractor
/// in an [`ExtractorRunner`](crate::plugins::ExtractorRunner). If a store
/// has been injected via [`set_extractor_store`], the new runner receives it
/// immediately.
///
/// # Errors
///
/// - `MetapipeError::Validation` - Invalid plugin name (empty or contains whitespace)
/// - Any error from the extractor's `initialize()` method
pub fn register_extractor(extractor: Arc<dyn MetadataExtractor>) -> Result<()> {
    let registry = crate::plugins::registry::get_extractor_registry();
    let mut registry = registry.write();
    registry.register(extractor)
}

/// Unregister a metadata extractor by name.
///
/// Removes the extractor from the global registry and calls its
/// `shutdown()` method. Unknown names are a no-op.
pub fn unregister_extractor(name: &str) -> Result<()> {
    let registry = crate::plugins::registry::get_extractor_registry();
    let mut registry = registry.write();
    registry.remove(name)
}

/// List the names of all extractors in the global registry.
pub fn list_extractors() -> Vec<String> {
    let registry = crate::plugins::registry::get_extractor_registry();
    let registry = registry.read();
    registry.list()
}

/// Inject the shared store handle into the global registry.
///
/// All currently registered runners receive the handle, as do runners
/// registered afterwards. Until a store is injected, every runner behaves
/// as if caching were disabled.
pub fn set_extractor_store(store: Arc<dyn MetadataStore>) {
    let registry = crate::plugins::registry::get_extractor_registry();
    let mut registry = registry.write();
    registry.set_store(store);
}

/// Shut down and remove all extractors from the global registry.
pub fn clear_extractors() -> Result<()> {
    let registry = crate::plugins::registry::get_extractor_registry();
    let mut registry = registry.write();
    registry.shutdown_all()
}
