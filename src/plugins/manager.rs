use std::collections::HashMap;
use std::sync::Arc;

use crate::config::EnabledPlugins;
use crate::error::{PlaygroundError, Result};

use super::delete_extra_packages::{DeleteExtraPackages, PLUGIN_NAME as DELETE_EXTRA_PACKAGES};
use super::dto::PluginRegistration;
use super::Plugin;

/// Name to implementation table the runner resolves enabled plugins against.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every plugin shipped with the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(DELETE_EXTRA_PACKAGES, Arc::new(DeleteExtraPackages::new()));
        registry
    }

    /// Adds or replaces the implementation registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) {
        let name = name.into();
        tracing::debug!(plugin = %name, "Registered plugin");
        self.plugins.insert(name, plugin);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resolve(&self, name: &str) -> Result<PluginRegistration> {
        self.plugins
            .get(name)
            .map(|plugin| PluginRegistration {
                name: name.to_string(),
                plugin: Arc::clone(plugin),
            })
            .ok_or_else(|| PlaygroundError::plugin_not_found(name))
    }

    /// Resolves every enabled entry, in configuration order. Disabled entries
    /// are never looked up; the first unknown name fails the whole set.
    pub fn resolve_enabled(&self, enabled: &EnabledPlugins) -> Result<Vec<PluginRegistration>> {
        enabled.enabled_names().map(|name| self.resolve(name)).collect()
    }
}
