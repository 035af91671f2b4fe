//! Base plugin trait definition.
//!
//! All plugins must implement the `Plugin` trait, which provides basic
//! lifecycle management and identity.

use crate::Result;

/// Base trait that all plugins must implement.
///
/// Provides identity and lifecycle hooks; the extraction contract itself
/// lives in [`MetadataExtractor`](crate::plugins::MetadataExtractor).
///
/// # Thread Safety
///
/// All plugins must be `Send + Sync`: they are stored in `Arc<dyn Trait>`
/// and called with `&self` from any thread. Plugins needing mutable state
/// should use interior mutability (Mutex, RwLock, atomics, OnceCell).
///
/// # Example
///
/// ```rust
/// use metapipe::plugins::Plugin;
/// use metapipe::Result;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct ExifPlugin {
///     ready: AtomicBool,
/// }
///
/// impl Plugin for ExifPlugin {
///     fn name(&self) -> &str {
///         "Exif"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         self.ready.store(true, Ordering::Release);
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         self.ready.store(false, Ordering::Release);
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Returns the stable name of this plugin.
    ///
    /// By convention this is the implementing type's name (e.g. `"Exif"` for
    /// an `Exif` struct). The name namespaces the plugin's cache entries
    /// (`cached:<name>:<identifier>`) and is the handle other plugins use in
    /// their dependency lists, so it must not change across versions. Names
    /// cannot be empty or contain whitespace.
    fn name(&self) -> &str;

    /// Returns the semantic version of this plugin (`MAJOR.MINOR.PATCH`).
    fn version(&self) -> String;

    /// Initialize the plugin.
    ///
    /// Called once when the plugin is registered. Use this to load
    /// configuration or validate resources. The plugin is not registered if
    /// this returns an error.
    ///
    /// Takes `&self` to work with `Arc<dyn Plugin>`; use interior mutability
    /// for state set up here.
    fn initialize(&self) -> Result<()>;

    /// Shutdown the plugin.
    ///
    /// Called when the plugin is unregistered or the process is shutting
    /// down. Release resources here.
    fn shutdown(&self) -> Result<()>;

    /// Optional plugin description for debugging and logging.
    ///
    /// Defaults to empty string if not overridden.
    fn description(&self) -> &str {
        ""
    }
}
