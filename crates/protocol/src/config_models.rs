//! Global configuration models for `.statekit/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide settings for a statekit container.

use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// Default quiescence window for debounced field updates, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default capacity of the container event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Represents global settings from `.statekit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .statekit/config.toml
/// debounce_ms = 300
/// event_capacity = 64
///
/// [pipelines]
/// publish = ["normalize", "bump-version"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GlobalConfig {
    /// Quiescence window used to coalesce debounced field updates.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Number of buffered events kept for slow observers.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Named plugin sequences.
    ///
    /// A pipeline name can be used anywhere a plugin name is accepted on the
    /// command line; it expands to the listed plugins in order.
    #[serde(default)]
    pub pipelines: BTreeMap<String, Vec<String>>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            pipelines: BTreeMap::new(),
        }
    }
}
