//! Declarative plugin models for `.statekit/plugins/*.md`.
//!
//! Plugins are usually code, but simple field rewrites can be declared as
//! Markdown files whose YAML front matter lists the operations to apply.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single field operation applied by a declarative plugin.
///
/// Paths use the dotted/indexed syntax understood by the field accessor,
/// e.g. `user.tags[0]`.
///
/// ```yaml
/// steps:
///   - set: { path: status, value: "published" }
///   - increment: { path: revision }
///   - remove: { path: draft }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
pub enum FieldOp {
    /// Write a literal value at `path`, creating intermediate containers.
    Set {
        path: String,
        value: serde_json::Value,
    },

    /// Delete the value at `path`. Missing paths are ignored.
    Remove { path: String },

    /// Copy the value at `from` to `to`. Missing sources are ignored.
    Copy { from: String, to: String },

    /// Move the value at `from` to `to`. Missing sources are ignored.
    Rename { from: String, to: String },

    /// Add `by` to the number at `path`. A missing value counts as zero.
    Increment {
        path: String,
        #[serde(default = "default_increment")]
        by: f64,
    },

    /// Fail the plugin unless a value exists at `path`.
    Require { path: String },
}

fn default_increment() -> f64 {
    1.0
}

/// Represents a declarative plugin's metadata and operations.
///
/// # Example
///
/// ```markdown
/// ---
/// name: publish
/// description: Marks the document as published
/// steps:
///   - require: { path: title }
///   - set: { path: status, value: published }
/// ---
///
/// Sets the status flag once a title is present.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct PluginDefinition {
    /// Unique name used to reference the plugin in a pipeline.
    pub name: String,

    /// Human-readable description of the plugin's purpose.
    #[serde(default)]
    pub description: String,

    /// Operations applied in order to the incoming snapshot.
    #[serde(default)]
    pub steps: Vec<FieldOp>,

    /// The Markdown body of the definition file.
    ///
    /// Skipped during serialization as it is not part of the front matter.
    #[serde(skip)]
    pub documentation: String,
}
