//! Error types for metapipe.
//!
//! All fallible operations return [`Result`], built on [`MetapipeError`]:
//!
//! - Use `thiserror` for automatic `Error` trait implementation
//! - Preserve error chains with `#[source]` attributes
//! - Include context in error messages (plugin names, cache keys, paths)
//!
//! # Propagation policy
//!
//! Only two kinds of failure ever reach a pipeline caller:
//!
//! - `Io` - file system errors bubble up unchanged so users can report them
//! - `Extraction` - a plugin's unrecoverable per-file failure
//!
//! `Cache` and `Serialization` errors raised at the store boundary are
//! absorbed by the runner: a degraded or unreachable store turns into a
//! cache miss or a skipped write, never into a pipeline error. Extraction
//! correctness must not depend on cache availability.
use thiserror::Error;

/// Result type alias using `MetapipeError`.
pub type Result<T> = std::result::Result<T, MetapipeError>;

/// Main error type for all metapipe operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Extraction` - Unrecoverable per-file plugin failures (surface to the orchestrator)
/// - `Cache` - Store operation errors (absorbed by the runner, fail-soft)
/// - `Serialization` - JSON encode/decode errors (decode failures at the cache
///   boundary degrade to a miss)
/// - `Validation` - Invalid plugin names or parameters
/// - `Plugin` - Plugin lookup/lifecycle errors
/// - `LockPoisoned` - Mutex/RwLock poisoning (should not happen in normal operation)
/// - `Other` - Catch-all for uncommon errors
#[derive(Debug, Error)]
pub enum MetapipeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Cache error: {message}")]
    Cache {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for MetapipeError {
    fn from(err: serde_json::Error) -> Self {
        MetapipeError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl MetapipeError {
    /// Create an Extraction error
    pub fn extraction<S: Into<String>>(message: S) -> Self {
        Self::Extraction {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Extraction error with source
    pub fn extraction_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Extraction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Cache error with source
    pub fn cache_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }
}
