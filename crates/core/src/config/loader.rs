//! Loader for the `.statekit/` directory.
//!
//! Reads:
//! - `config.toml`: global settings and named pipelines
//! - `initial.yaml`, `initial.yml` or `initial.json`: initial values
//! - `plugins/*.md`: declarative plugins with YAML front matter

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::ProjectConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use sk_protocol::config_models::GlobalConfig;
use sk_protocol::plugin_models::PluginDefinition;
use sk_protocol::Snapshot;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const PROJECT_DIR: &str = ".statekit";

/// Loads the project configuration under `root`.
///
/// A missing `.statekit/` directory, or missing files inside it, yield
/// defaults rather than errors.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, JSON or Markdown front matter)
/// - Two plugins share a name, or a named pipeline references a plugin
///   that does not exist
pub async fn load_config(root: &Path) -> ConfigResult<ProjectConfig> {
    let project_dir = root.join(PROJECT_DIR);

    if !project_dir.exists() {
        debug!(path = %project_dir.display(), "no project directory, using defaults");
        return Ok(ProjectConfig::default());
    }

    let global = load_global_config(&project_dir)?;
    let initial_values = load_initial_values(&project_dir)?;
    let plugins = load_plugins(&project_dir)?;

    let project = ProjectConfig {
        global,
        plugins,
        initial_values,
    };
    validate(&project_dir, &project)?;

    debug!(
        plugins = project.plugins.len(),
        pipelines = project.global.pipelines.len(),
        "loaded project configuration"
    );
    Ok(project)
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn load_global_config(project_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = project_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content = read(&config_path)?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path,
        source,
    })
}

/// First of `initial.yaml`, `initial.yml`, `initial.json` that exists.
fn load_initial_values(project_dir: &Path) -> ConfigResult<Snapshot> {
    for name in ["initial.yaml", "initial.yml"] {
        let path = project_dir.join(name);
        if path.exists() {
            let content = read(&path)?;
            return serde_yaml::from_str(&content)
                .map_err(|source| ConfigError::YamlParse { path, source });
        }
    }

    let path = project_dir.join("initial.json");
    if path.exists() {
        let content = read(&path)?;
        return serde_json::from_str(&content)
            .map_err(|source| ConfigError::JsonParse { path, source });
    }

    Ok(ProjectConfig::default().initial_values)
}

/// Loads declarative plugins from `plugins/*.md`, sorted by file name.
fn load_plugins(project_dir: &Path) -> ConfigResult<Vec<PluginDefinition>> {
    let plugins_dir = project_dir.join("plugins");

    if !plugins_dir.exists() {
        return Ok(Vec::new());
    }

    let mut plugins = Vec::new();

    for entry in WalkDir::new(&plugins_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: plugins_dir.clone(),
            source,
        })?;

        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }

        plugins.push(parse_plugin(path, &read(path)?)?);
    }

    Ok(plugins)
}

fn parse_plugin(path: &Path, content: &str) -> ConfigResult<PluginDefinition> {
    let matter = Matter::<YAML>::new();
    let result = matter.parse(content);

    let mut plugin: PluginDefinition = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {e}"),
        })?;

    plugin.documentation = result.content.trim().to_string();
    Ok(plugin)
}

fn validate(project_dir: &Path, project: &ProjectConfig) -> ConfigResult<()> {
    let invalid = |path: PathBuf, reason: String| ConfigError::InvalidConfig { path, reason };

    let mut seen = HashSet::new();
    for plugin in &project.plugins {
        if !seen.insert(plugin.name.as_str()) {
            return Err(invalid(
                project_dir.join("plugins"),
                format!("duplicate plugin name '{}'", plugin.name),
            ));
        }
    }

    for (pipeline, steps) in &project.global.pipelines {
        if steps.is_empty() {
            return Err(invalid(
                project_dir.join("config.toml"),
                format!("pipeline '{pipeline}' has no plugins"),
            ));
        }
        if let Some(unknown) = steps.iter().find(|step| !seen.contains(step.as_str())) {
            return Err(invalid(
                project_dir.join("config.toml"),
                format!("pipeline '{pipeline}' references unknown plugin '{unknown}'"),
            ));
        }
    }

    Ok(())
}
