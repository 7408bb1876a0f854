//! Plugin registry.
//!
//! The `PluginRegistry` maps unique names to transformation units. A
//! container captures its registry once at creation; nothing mutates it
//! afterwards.

use crate::plugins::base::Plugin;
use crate::plugins::declarative::DeclarativePlugin;
use sk_protocol::plugin_models::PluginDefinition;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of named plugins.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding one declarative plugin per definition.
    ///
    /// Later definitions replace earlier ones with the same name; the config
    /// loader rejects duplicates before this point.
    pub fn from_definitions(definitions: &[PluginDefinition]) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(
                definition.name.clone(),
                Arc::new(DeclarativePlugin::new(definition.clone())),
            );
        }
        registry
    }

    /// Add a plugin, returning the registry for chaining.
    pub fn with_plugin(mut self, name: impl Into<String>, plugin: impl Plugin + 'static) -> Self {
        self.register(name, Arc::new(plugin));
        self
    }

    /// Register a plugin under `name`, returning any plugin it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        plugin: Arc<dyn Plugin>,
    ) -> Option<Arc<dyn Plugin>> {
        self.plugins.insert(name.into(), plugin)
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    /// Check if a plugin with the given name is registered.
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// List all registered plugin names, sorted.
    pub fn list_plugins(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.list_plugins())
            .finish()
    }
}
