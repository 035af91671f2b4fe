//! Metapipe - pluggable metadata-extraction pipeline.
//!
//! A set of independently authored extractor plugins, each producing a
//! fragment of metadata for a file path, composed into a single aggregate
//! metadata record. Plugins declare dependencies on other plugins' output
//! and may opt into a caching layer that persists extracted fragments in a
//! shared key-value store with a time-to-live.
//!
//! # Quick Start
//!
//! ```rust
//! use metapipe::plugins::{MetadataExtractor, Plugin};
//! use metapipe::{ExtractorRegistry, InMemoryStore, Metadata, Result};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct WordCount;
//!
//! impl Plugin for WordCount {
//!     fn name(&self) -> &str { "WordCount" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//!     fn initialize(&self) -> Result<()> { Ok(()) }
//!     fn shutdown(&self) -> Result<()> { Ok(()) }
//! }
//!
//! impl MetadataExtractor for WordCount {
//!     fn extract(&self, _id: &str, path: &str, _current: &Metadata) -> Result<Metadata> {
//!         let mut fragment = Metadata::new();
//!         if let Ok(text) = std::fs::read_to_string(path) {
//!             fragment.insert("words", json!(text.split_whitespace().count()));
//!         }
//!         Ok(fragment)
//!     }
//!     fn cacheable(&self) -> bool { true }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut registry = ExtractorRegistry::new();
//! registry.set_store(Arc::new(InMemoryStore::new()));
//! registry.register(Arc::new(WordCount))?;
//!
//! let runner = registry.get("WordCount")?;
//! let fragment = runner.run("README.md", &Metadata::new())?;
//! # let _ = fragment;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Plugin contract** ([`plugins`]): identity, dependency declarations,
//!   cache opt-in, and the `extract` entry point every plugin implements
//! - **Cache-aware runner** ([`plugins::ExtractorRunner`]): wraps each
//!   `extract` call with identifier resolution and cache fetch/store
//! - **Store interface** ([`cache`]): get / set-with-expiry / refresh-expiry
//!   over any key-value backend, plus an in-memory reference store
//! - **Built-in extractors** ([`extractors`]): file stat, content digest,
//!   MIME type
//!
//! Orchestration lives outside this crate: something else selects the
//! plugins applicable to a path and orders them by their dependency
//! declarations, then calls [`plugins::ExtractorRunner::run`] per plugin
//! and merges the fragments with [`Metadata::merge`].
//!
//! # Caching semantics
//!
//! Cache entries are keyed `cached:<PluginName>:<Identifier>` and expire
//! after the plugin's TTL without a read; every read hit resets the expiry.
//! Empty fragments are cached as negative results. All store failures
//! degrade to cache misses or skipped writes - a degraded store slows the
//! pipeline down but never changes its output and never produces an error.

#![deny(unsafe_code)]

pub mod cache;
pub mod error;
pub mod extractors;
pub mod plugins;
pub mod types;

pub use cache::{DEFAULT_CACHE_TTL, InMemoryStore, MetadataStore, cache_key};
pub use error::{MetapipeError, Result};
pub use plugins::{
    ExtractorRegistry, ExtractorRunner, MetadataExtractor, Plugin, clear_extractors, get_extractor_registry,
    list_extractors, register_extractor, set_extractor_store, unregister_extractor,
};
pub use types::Metadata;
