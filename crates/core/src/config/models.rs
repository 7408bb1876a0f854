//! The aggregated project configuration.

use crate::container::{ContainerConfig, ContainerInit};
use crate::plugins::PluginRegistry;
use sk_protocol::config_models::GlobalConfig;
use sk_protocol::plugin_models::PluginDefinition;
use sk_protocol::Snapshot;

/// Everything loaded from a `.statekit/` directory.
///
/// - `config.toml`: global settings and named pipelines
/// - `initial.yaml` or `initial.json`: the initial snapshot
/// - `plugins/*.md`: declarative plugin definitions
///
/// # Example
///
/// ```rust,no_run
/// use sk_core::config::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_config(Path::new(".")).await?;
/// println!("Loaded {} plugins", project.plugins.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub global: GlobalConfig,
    pub plugins: Vec<PluginDefinition>,
    pub initial_values: Snapshot,
}

impl ProjectConfig {
    pub fn plugin(&self, name: &str) -> Option<&PluginDefinition> {
        self.plugins.iter().find(|p| p.name == name)
    }

    /// Replace named pipelines with their plugin lists. Other names pass
    /// through unchanged.
    pub fn expand<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .flat_map(|name| {
                let name = name.as_ref();
                match self.global.pipelines.get(name) {
                    Some(steps) => steps.clone(),
                    None => vec![name.to_string()],
                }
            })
            .collect()
    }

    pub fn container_config(&self) -> ContainerConfig {
        ContainerConfig::from_global(&self.global)
    }

    /// Initial values and a registry of every declarative plugin.
    pub fn container_init(&self) -> ContainerInit {
        ContainerInit::new(self.initial_values.clone())
            .with_plugins(PluginRegistry::from_definitions(&self.plugins))
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            plugins: Vec::new(),
            initial_values: Snapshot::Object(Default::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_project() -> ProjectConfig {
        let mut project = ProjectConfig::default();
        project
            .global
            .pipelines
            .insert("publish".to_string(), vec!["trim".to_string(), "stamp".to_string()]);
        project
    }

    #[test]
    fn test_expand_named_pipeline() {
        let project = create_project();
        assert_eq!(
            project.expand(&["publish", "extra"]),
            vec!["trim", "stamp", "extra"]
        );
    }

    #[test]
    fn test_default_initial_values_is_empty_object() {
        assert_eq!(ProjectConfig::default().initial_values, json!({}));
    }
}
