//! Store interface and cache-key construction for extracted metadata.
//!
//! The pipeline treats the key-value store as a replaceable backend behind
//! [`MetadataStore`]: get, set-with-expiry, refresh-expiry. Implementations
//! must be safe for concurrent use and safe to call with no live backend
//! (absent result / no-op, not an error) - the runner degrades every store
//! failure to a cache miss or a skipped write, so pipeline correctness never
//! depends on cache availability, only its performance.
//!
//! Cache values are JSON-encoded [`Metadata`](crate::Metadata) fragments.
//! Keys follow the exact format `cached:<PluginName>:<Identifier>`; see
//! [`cache_key`].

use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached fragments: 12 hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 12);

/// Build the store key for a plugin's cached fragment.
///
/// The format is `cached:<PluginName>:<Identifier>` and must be reproduced
/// exactly for compatibility with existing cached data. No escaping is
/// applied; identifiers containing `:` are the plugin author's
/// responsibility. Entries for different plugins or different identifiers
/// never collide because the key is namespaced by both.
pub fn cache_key(plugin_name: &str, identifier: &str) -> String {
    format!("cached:{plugin_name}:{identifier}")
}

/// Key-value store interface consumed by the cache-aware runner.
///
/// Abstracted from any concrete backend. All three operations may fail with
/// `MetapipeError::Cache`; callers in this crate absorb those failures
/// (fail-soft). A disconnected implementation should return `Ok(None)` /
/// `Ok(())` rather than erroring.
pub trait MetadataStore: Send + Sync {
    /// Fetch the raw value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key` with the given time-to-live, overwriting
    /// any prior value and its expiry.
    fn set_with_expiry(&self, key: &str, ttl: Duration, value: &[u8]) -> Result<()>;

    /// Reset the expiry of an existing entry to `ttl` from now.
    ///
    /// A missing or already-expired key is a no-op.
    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<()>;
}

struct StoredEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory [`MetadataStore`] with per-entry expiry.
///
/// Reference store for tests and single-process pipelines. Expired entries
/// are treated as absent and purged lazily on writes. An optional entry cap
/// evicts the entries closest to expiry first once the cap is reached.
///
/// Cloneable handles are not provided; share it as `Arc<InMemoryStore>`.
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
    max_entries: Option<usize>,
}

impl InMemoryStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: None,
        }
    }

    /// Create a store holding at most `max_entries` live entries.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: Some(max_entries),
        }
    }

    /// Number of unexpired entries currently held.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock();
        entries.values().filter(|e| e.expires_at > now).count()
    }

    /// Whether the store holds no unexpired entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge_expired(entries: &mut HashMap<String, StoredEntry>, now: Instant) {
        entries.retain(|_, e| e.expires_at > now);
    }

    fn evict_soonest(entries: &mut HashMap<String, StoredEntry>) {
        if let Some(key) = entries
            .iter()
            .min_by_key(|(_, e)| e.expires_at)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&key);
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set_with_expiry(&self, key: &str, ttl: Duration, value: &[u8]) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        Self::purge_expired(&mut entries, now);

        if let Some(cap) = self.max_entries
            && !entries.contains_key(key)
            && entries.len() >= cap
        {
            Self::evict_soonest(&mut entries);
        }

        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_vec(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            if entry.expires_at > now {
                entry.expires_at = now + ttl;
            } else {
                entries.remove(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("Exif", "photo.jpg"), "cached:Exif:photo.jpg");
        assert_eq!(cache_key("Digest", "sha:abc"), "cached:Digest:sha:abc");
    }

    #[test]
    fn test_cache_key_isolation() {
        assert_ne!(cache_key("Exif", "a"), cache_key("Digest", "a"));
        assert_ne!(cache_key("Exif", "a"), cache_key("Exif", "b"));
    }

    #[test]
    fn test_set_get_round_trip() {
        let store = InMemoryStore::new();
        store
            .set_with_expiry("k", Duration::from_secs(60), b"value")
            .unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_get_missing() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let store = InMemoryStore::new();
        store
            .set_with_expiry("k", Duration::from_secs(60), b"old")
            .unwrap();
        store
            .set_with_expiry("k", Duration::from_secs(60), b"new")
            .unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_entry_expires() {
        let store = InMemoryStore::new();
        store
            .set_with_expiry("k", Duration::from_millis(20), b"value")
            .unwrap();
        sleep(Duration::from_millis(40));
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_refresh_extends_lifetime() {
        let store = InMemoryStore::new();
        store
            .set_with_expiry("k", Duration::from_millis(40), b"value")
            .unwrap();
        store.refresh_expiry("k", Duration::from_secs(60)).unwrap();
        sleep(Duration::from_millis(80));
        assert_eq!(store.get("k").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_refresh_missing_is_noop() {
        let store = InMemoryStore::new();
        store.refresh_expiry("missing", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_refresh_expired_does_not_resurrect() {
        let store = InMemoryStore::new();
        store
            .set_with_expiry("k", Duration::from_millis(10), b"value")
            .unwrap();
        sleep(Duration::from_millis(30));
        store.refresh_expiry("k", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_capacity_evicts_soonest_to_expire() {
        let store = InMemoryStore::with_capacity(2);
        store
            .set_with_expiry("short", Duration::from_secs(10), b"a")
            .unwrap();
        store
            .set_with_expiry("long", Duration::from_secs(600), b"b")
            .unwrap();
        store
            .set_with_expiry("third", Duration::from_secs(60), b"c")
            .unwrap();

        assert_eq!(store.get("short").unwrap(), None);
        assert_eq!(store.get("long").unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.get("third").unwrap(), Some(b"c".to_vec()));
    }

    #[test]
    fn test_capacity_overwrite_does_not_evict() {
        let store = InMemoryStore::with_capacity(2);
        store
            .set_with_expiry("a", Duration::from_secs(60), b"1")
            .unwrap();
        store
            .set_with_expiry("b", Duration::from_secs(60), b"2")
            .unwrap();
        store
            .set_with_expiry("a", Duration::from_secs(60), b"updated")
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap(), Some(b"updated".to_vec()));
        assert_eq!(store.get("b").unwrap(), Some(b"2".to_vec()));
    }
}
