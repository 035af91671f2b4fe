//! Plugin registration and discovery.
//!
//! The registry owns one [`ExtractorRunner`] per registered plugin and is
//! where the shared store handle gets wired in: inject it once with
//! [`ExtractorRegistry::set_store`] and every current and future runner
//! receives it. The registry performs no scheduling; an external
//! orchestrator reads each runner's declared dependencies and decides the
//! execution order.

use crate::cache::MetadataStore;
use crate::plugins::{ExtractorRunner, MetadataExtractor};
use crate::{MetapipeError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Validate a plugin name before registration.
///
/// # Rules
///
/// - Name cannot be empty
/// - Name cannot contain whitespace
///
/// # Errors
///
/// Returns `Validation` if the name is invalid.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MetapipeError::validation("Plugin name cannot be empty"));
    }

    if name.contains(char::is_whitespace) {
        return Err(MetapipeError::validation(format!(
            "Plugin name '{}' cannot contain whitespace",
            name
        )));
    }

    Ok(())
}

/// Registry for metadata extractor plugins.
///
/// # Example
///
/// ```rust
/// use metapipe::plugins::{ExtractorRegistry, MetadataExtractor, Plugin};
/// use metapipe::{InMemoryStore, Metadata, Result};
/// use std::sync::Arc;
///
/// # struct Exif;
/// # impl Plugin for Exif {
/// #     fn name(&self) -> &str { "Exif" }
/// #     fn version(&self) -> String { "1.0.0".to_string() }
/// #     fn initialize(&self) -> Result<()> { Ok(()) }
/// #     fn shutdown(&self) -> Result<()> { Ok(()) }
/// # }
/// # impl MetadataExtractor for Exif {
/// #     fn extract(&self, _: &str, _: &str, _: &Metadata) -> Result<Metadata> {
/// #         Ok(Metadata::new())
/// #     }
/// # }
/// # fn main() -> Result<()> {
/// let mut registry = ExtractorRegistry::new();
/// registry.set_store(Arc::new(InMemoryStore::new()));
/// registry.register(Arc::new(Exif))?;
///
/// let runner = registry.get("Exif")?;
/// let fragment = runner.run("photo.jpg", &Metadata::new())?;
/// # Ok(())
/// # }
/// ```
pub struct ExtractorRegistry {
    runners: HashMap<String, Arc<ExtractorRunner>>,
    store: Option<Arc<dyn MetadataStore>>,
}

impl ExtractorRegistry {
    /// Create an empty registry with no store attached.
    pub fn new() -> Self {
        Self {
            runners: HashMap::new(),
            store: None,
        }
    }

    /// Register a metadata extractor.
    ///
    /// Validates the plugin name, calls `initialize()`, and wraps the
    /// extractor in an [`ExtractorRunner`]. If a store handle has been set,
    /// the new runner receives it immediately. Registering a name that
    /// already exists replaces the previous runner.
    ///
    /// # Errors
    ///
    /// - `MetapipeError::Validation` - invalid plugin name
    /// - Any error from the extractor's `initialize()` method
    pub fn register(&mut self, extractor: Arc<dyn MetadataExtractor>) -> Result<()> {
        let name = extractor.name().to_string();

        validate_plugin_name(&name)?;

        extractor.initialize()?;

        let runner = Arc::new(ExtractorRunner::new(extractor));
        if let Some(store) = &self.store {
            runner.set_store(Arc::clone(store));
        }

        self.runners.insert(name, runner);
        Ok(())
    }

    /// Get a plugin's runner by name.
    ///
    /// # Errors
    ///
    /// `MetapipeError::Plugin` if no plugin with that name is registered.
    pub fn get(&self, name: &str) -> Result<Arc<ExtractorRunner>> {
        self.runners.get(name).cloned().ok_or_else(|| MetapipeError::Plugin {
            message: format!("extractor '{}' not registered", name),
            plugin_name: name.to_string(),
        })
    }

    /// List all registered plugin names.
    pub fn list(&self) -> Vec<String> {
        self.runners.keys().cloned().collect()
    }

    /// Inject the shared store handle.
    ///
    /// Broadcast to all registered runners; runners registered afterwards
    /// receive it at registration time.
    pub fn set_store(&mut self, store: Arc<dyn MetadataStore>) {
        for runner in self.runners.values() {
            runner.set_store(Arc::clone(&store));
        }
        self.store = Some(store);
    }

    /// Remove a plugin from the registry.
    ///
    /// Calls `shutdown()` on the plugin before removing. Unknown names are
    /// a no-op.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if let Some(runner) = self.runners.remove(name) {
            runner.extractor().shutdown()?;
        }
        Ok(())
    }

    /// Shutdown all plugins and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        let names: Vec<_> = self.runners.keys().cloned().collect();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static EXTRACTOR_REGISTRY: Lazy<Arc<RwLock<ExtractorRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(ExtractorRegistry::new())));

/// Get the global extractor registry.
///
/// Process-wide singleton used by the convenience functions in
/// [`crate::plugins`]. Hold the lock only briefly; `run` calls should go
/// through a cloned `Arc<ExtractorRunner>` obtained via
/// [`ExtractorRegistry::get`], not through the lock.
pub fn get_extractor_registry() -> Arc<RwLock<ExtractorRegistry>> {
    Arc::clone(&EXTRACTOR_REGISTRY)
}
