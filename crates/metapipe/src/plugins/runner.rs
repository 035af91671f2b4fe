//! Cache-aware plugin execution.
//!
//! [`ExtractorRunner`] mediates between orchestrator calls and plugin
//! extraction, enforcing the cache policy uniformly regardless of plugin
//! implementation. The store is optional: until a handle is injected the
//! runner behaves exactly like a non-cacheable one, so plugins can be unit
//! tested without a live store.

use crate::cache::{MetadataStore, cache_key};
use crate::plugins::MetadataExtractor;
use crate::types::Metadata;
use crate::{MetapipeError, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Wraps one extractor with identifier resolution and optional cache
/// fetch/store.
///
/// One runner per registered plugin; long-lived, shared via `Arc`, and safe
/// for concurrent `run` calls. No in-process locking is performed around
/// cache fetch/store: two concurrent evaluations of the same
/// (plugin, identifier) pair may both miss and both extract - the last
/// store wins. Extraction is assumed idempotent, so this is acceptable.
///
/// # Example
///
/// ```rust
/// use metapipe::plugins::{ExtractorRunner, MetadataExtractor, Plugin};
/// use metapipe::{InMemoryStore, Metadata, Result};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// struct LineCount;
///
/// impl Plugin for LineCount {
///     fn name(&self) -> &str { "LineCount" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// impl MetadataExtractor for LineCount {
///     fn extract(&self, _id: &str, path: &str, _current: &Metadata) -> Result<Metadata> {
///         let mut fragment = Metadata::new();
///         if let Ok(text) = std::fs::read_to_string(path) {
///             fragment.insert("lines", json!(text.lines().count()));
///         }
///         Ok(fragment)
///     }
///     fn cacheable(&self) -> bool { true }
/// }
///
/// # fn main() -> Result<()> {
/// let runner = ExtractorRunner::new(Arc::new(LineCount));
/// runner.set_store(Arc::new(InMemoryStore::new()));
/// let fragment = runner.run("/etc/hostname", &Metadata::new())?;
/// # let _ = fragment;
/// # Ok(())
/// # }
/// ```
pub struct ExtractorRunner {
    extractor: Arc<dyn MetadataExtractor>,
    store: RwLock<Option<Arc<dyn MetadataStore>>>,
}

impl std::fmt::Debug for ExtractorRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRunner").finish_non_exhaustive()
    }
}

impl ExtractorRunner {
    /// Wrap an extractor. No store is attached; inject one with
    /// [`set_store`](ExtractorRunner::set_store) to enable caching.
    pub fn new(extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self {
            extractor,
            store: RwLock::new(None),
        }
    }

    /// Inject the shared store handle.
    ///
    /// The store is shared read/write across all runners and concurrent
    /// path evaluations; it must be internally thread-safe.
    pub fn set_store(&self, store: Arc<dyn MetadataStore>) {
        *self.store.write() = Some(store);
    }

    /// The wrapped plugin's stable name.
    pub fn name(&self) -> &str {
        self.extractor.name()
    }

    /// The wrapped plugin's declared dependency names.
    pub fn depends_on(&self) -> &[&str] {
        self.extractor.depends_on()
    }

    /// Whether the wrapped plugin opted into caching.
    pub fn cacheable(&self) -> bool {
        self.extractor.cacheable()
    }

    /// The wrapped plugin's cache TTL.
    pub fn cache_ttl(&self) -> Duration {
        self.extractor.cache_ttl()
    }

    /// The wrapped extractor.
    pub fn extractor(&self) -> &Arc<dyn MetadataExtractor> {
        &self.extractor
    }

    /// Run the plugin for a matched path.
    ///
    /// 1. Resolve the identifier via `identify`; `None` returns an empty
    ///    fragment immediately - no cache interaction, no extraction.
    /// 2. If the plugin is cacheable and the store holds a decodable value
    ///    for `cached:<name>:<identifier>`, reset its expiry to the
    ///    plugin's TTL and return it without extracting. A cached empty
    ///    fragment counts: negative results are served from cache too.
    /// 3. Otherwise call `extract(identifier, matched_path, current)`.
    /// 4. If cacheable, store the fragment under the same key with the
    ///    plugin's TTL, overwriting any prior value - empty fragments
    ///    included.
    /// 5. Return the fragment.
    ///
    /// Store failures and undecodable cached values degrade to a miss or a
    /// skipped write (logged at debug level); only extraction errors
    /// propagate.
    ///
    /// # Errors
    ///
    /// `MetapipeError::Extraction` from the plugin's `extract`. Nothing is
    /// cached on failure.
    pub fn run(&self, matched_path: &str, current: &Metadata) -> Result<Metadata> {
        let Some(identifier) = self.extractor.identify(matched_path) else {
            return Ok(Metadata::new());
        };

        let cacheable = self.extractor.cacheable();
        if cacheable && let Some(cached) = self.cache_fetch(&identifier) {
            return Ok(cached);
        }

        let fragment = self.extractor.extract(&identifier, matched_path, current)?;

        if cacheable {
            self.cache_store(&identifier, &fragment);
        }
        Ok(fragment)
    }

    fn store_handle(&self) -> Option<Arc<dyn MetadataStore>> {
        self.store.read().clone()
    }

    /// Fetch and decode this plugin's cached fragment for `identifier`.
    ///
    /// `None` means miss: key absent, store unreachable, or value
    /// undecodable. A present value refreshes its own expiry.
    fn cache_fetch(&self, identifier: &str) -> Option<Metadata> {
        let store = self.store_handle()?;
        let key = cache_key(self.extractor.name(), identifier);

        let bytes = match store.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "cache fetch failed, treating as miss");
                return None;
            }
        };

        let fragment: Metadata = match serde_json::from_slice(&bytes) {
            Ok(fragment) => fragment,
            Err(err) => {
                let err = MetapipeError::from(err);
                tracing::debug!(key = %key, error = %err, "undecodable cache entry, treating as miss");
                return None;
            }
        };

        // Read extends lifetime: keep hot entries alive.
        if let Err(err) = store.refresh_expiry(&key, self.extractor.cache_ttl()) {
            tracing::debug!(key = %key, error = %err, "cache expiry refresh failed");
        }
        Some(fragment)
    }

    fn cache_store(&self, identifier: &str, fragment: &Metadata) {
        let Some(store) = self.store_handle() else {
            return;
        };
        let key = cache_key(self.extractor.name(), identifier);

        let bytes = match serde_json::to_vec(fragment) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "cache encode failed, skipping store");
                return;
            }
        };

        if let Err(err) = store.set_with_expiry(&key, self.extractor.cache_ttl(), &bytes) {
            tracing::debug!(key = %key, error = %err, "cache store failed, continuing without");
        }
    }
}
