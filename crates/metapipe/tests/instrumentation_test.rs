//! Verifies that cache-layer failures surface as debug events, not errors.

use metapipe::plugins::{ExtractorRunner, MetadataExtractor, Plugin};
use metapipe::{Metadata, MetadataStore, MetapipeError, Result};
use serde_json::json;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

/// Simple event collector for testing.
///
/// This layer records event levels and messages so tests can verify that the
/// runner reports degraded cache operation instead of propagating it.
struct EventCollector {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for EventCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.message));
    }
}

fn collect_events() -> (Arc<Mutex<Vec<(Level, String)>>>, tracing::subscriber::DefaultGuard) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCollector {
        events: Arc::clone(&events),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    (events, guard)
}

fn logged_at_debug(events: &Mutex<Vec<(Level, String)>>, message: &str) -> bool {
    events
        .lock()
        .unwrap()
        .iter()
        .any(|(level, m)| *level == Level::DEBUG && m == message)
}

struct Exif;

impl Plugin for Exif {
    fn name(&self) -> &str {
        "Exif"
    }

    fn version(&self) -> String {
        "1.0.0".to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

impl MetadataExtractor for Exif {
    fn extract(&self, _identifier: &str, _matched_path: &str, _current: &Metadata) -> Result<Metadata> {
        let mut fragment = Metadata::new();
        fragment.insert("width", json!(4000));
        Ok(fragment)
    }

    fn cacheable(&self) -> bool {
        true
    }
}

/// Store whose every operation fails.
struct DownStore;

impl MetadataStore for DownStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(MetapipeError::cache("connection refused"))
    }

    fn set_with_expiry(&self, _key: &str, _ttl: Duration, _value: &[u8]) -> Result<()> {
        Err(MetapipeError::cache("connection refused"))
    }

    fn refresh_expiry(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Err(MetapipeError::cache("connection refused"))
    }
}

/// Store holding one corrupt value; writes and refreshes succeed silently.
struct CorruptStore;

impl MetadataStore for CorruptStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(Some(b"not json".to_vec()))
    }

    fn set_with_expiry(&self, _key: &str, _ttl: Duration, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn refresh_expiry(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}

/// Store that serves a valid cached fragment but cannot refresh its expiry.
struct StaleRefreshStore;

impl MetadataStore for StaleRefreshStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(Some(br#"{"width":1024}"#.to_vec()))
    }

    fn set_with_expiry(&self, _key: &str, _ttl: Duration, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn refresh_expiry(&self, _key: &str, _ttl: Duration) -> Result<()> {
        Err(MetapipeError::cache("refresh rejected"))
    }
}

#[test]
fn unreachable_store_logs_fetch_and_store_failures() {
    let (events, _guard) = collect_events();

    let runner = ExtractorRunner::new(Arc::new(Exif));
    runner.set_store(Arc::new(DownStore));

    let fragment = runner.run("photo.jpg", &Metadata::new()).unwrap();

    assert_eq!(fragment.get("width"), Some(&json!(4000)));
    assert!(logged_at_debug(&events, "cache fetch failed, treating as miss"));
    assert!(logged_at_debug(&events, "cache store failed, continuing without"));
}

#[test]
fn corrupt_entry_logs_decode_miss() {
    let (events, _guard) = collect_events();

    let runner = ExtractorRunner::new(Arc::new(Exif));
    runner.set_store(Arc::new(CorruptStore));

    let fragment = runner.run("photo.jpg", &Metadata::new()).unwrap();

    // Extraction ran despite the stored value being present.
    assert_eq!(fragment.get("width"), Some(&json!(4000)));
    assert!(logged_at_debug(&events, "undecodable cache entry, treating as miss"));
}

#[test]
fn failed_refresh_still_serves_the_hit() {
    let (events, _guard) = collect_events();

    let runner = ExtractorRunner::new(Arc::new(Exif));
    runner.set_store(Arc::new(StaleRefreshStore));

    let fragment = runner.run("photo.jpg", &Metadata::new()).unwrap();

    // Served from cache, not re-extracted.
    assert_eq!(fragment.get("width"), Some(&json!(1024)));
    assert!(logged_at_debug(&events, "cache expiry refresh failed"));
}
