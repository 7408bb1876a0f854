//! Error types for `.statekit/` project loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a project. Every variant carries the
/// offending path.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has mistyped settings.
    #[error("Invalid settings in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// `initial.yaml` is not valid YAML.
    #[error("Invalid initial values in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// `initial.json` is not valid JSON.
    #[error("Invalid initial values in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A plugin file has no front matter, or it does not describe a plugin.
    #[error("Invalid plugin definition in {path}: {reason}")]
    MarkdownParse { path: PathBuf, reason: String },

    #[error("Cannot scan plugin directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Files parsed but disagree with each other, e.g. duplicate plugin
    /// names or a pipeline naming an unknown plugin.
    #[error("Inconsistent configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
