//! Plugin system: the extraction contract and its cache-aware execution.
//!
//! # Plugin types
//!
//! - [`Plugin`] - base trait all plugins implement (identity, lifecycle)
//! - [`MetadataExtractor`] - the extraction contract: identifier derivation,
//!   extraction logic, dependency declarations, cache opt-in
//! - [`ExtractorRunner`] - wraps one extractor with the caching policy
//! - [`ExtractorRegistry`] - registration, lookup, store wiring
//!
//! # Execution model
//!
//! An external orchestrator selects the plugins applicable to a path and
//! topologically sorts them by their [`MetadataExtractor::depends_on`]
//! declarations. It then calls [`ExtractorRunner::run`] for each in order,
//! merging the returned fragments into the accumulated metadata handed to
//! the next plugin. This crate defines the per-plugin execution and caching
//! contract the orchestrator calls into, not the scheduler.
//!
//! Plugins are stored in `Arc<dyn MetadataExtractor>` for thread-safe shared
//! access; all plugins must be `Send + Sync` and use interior mutability for
//! any state.
//!
//! # Example
//!
//! ```rust
//! use metapipe::plugins::{MetadataExtractor, Plugin, ExtractorRegistry};
//! use metapipe::{InMemoryStore, Metadata, Result};
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Exif;
//!
//! impl Plugin for Exif {
//!     fn name(&self) -> &str { "Exif" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//!     fn initialize(&self) -> Result<()> { Ok(()) }
//!     fn shutdown(&self) -> Result<()> { Ok(()) }
//! }
//!
//! impl MetadataExtractor for Exif {
//!     fn extract(&self, _id: &str, _path: &str, _current: &Metadata) -> Result<Metadata> {
//!         let mut fragment = Metadata::new();
//!         fragment.insert("width", json!(4000));
//!         Ok(fragment)
//!     }
//!     fn cacheable(&self) -> bool { true }
//!     fn cache_ttl(&self) -> Duration { Duration::from_secs(3600) }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut registry = ExtractorRegistry::new();
//! registry.set_store(Arc::new(InMemoryStore::new()));
//! registry.register(Arc::new(Exif))?;
//!
//! // First run extracts and caches; the second is served from the store.
//! let runner = registry.get("Exif")?;
//! let fragment = runner.run("photo.jpg", &Metadata::new())?;
//! assert_eq!(fragment.get("width"), Some(&json!(4000)));
//! # Ok(())
//! # }
//! ```

mod extractor;
pub mod registry;
mod runner;
mod traits;

pub use extractor::{
    MetadataExtractor, clear_extractors, list_extractors, register_extractor, set_extractor_store,
    unregister_extractor,
};
pub use registry::{ExtractorRegistry, get_extractor_registry};
pub use runner::ExtractorRunner;
pub use traits::Plugin;
