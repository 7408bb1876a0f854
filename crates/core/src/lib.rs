//! # sk-core
//!
//! Ordered async plugin pipelines over a state container.
//!
//! This crate provides:
//! - Path-addressed field access over `serde_json::Value`
//! - A state store with substitutable storage
//! - A sequential pipeline engine over named plugins
//! - Commit coordination that resolves callers once their write is applied
//! - Containers with provider scoping and debounced updates
//! - Configuration loading from the `.statekit/` directory
//!
//! ## Modules
//!
//! - [`field`]: Field paths, accessors and deep equality
//! - [`store`]: Snapshot storage
//! - [`plugins`]: Plugin trait, adapters and registry
//! - [`engine`]: Pipeline execution engine and invocation lifecycle
//! - [`commit`]: Commit coordination
//! - [`container`]: Consumer-facing container
//! - [`config`]: Project configuration loading
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use sk_core::container::{ContainerFactory, ContainerInit};
//! use sk_core::plugins::{sync_plugin, PluginRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = PluginRegistry::new().with_plugin(
//!     "double",
//!     sync_plugin(|mut s| {
//!         s["a"] = json!(s["a"].as_i64().unwrap_or_default() * 2);
//!         Ok(s)
//!     }),
//! );
//! let container = ContainerFactory::default()
//!     .provide(ContainerInit::new(json!({"a": 1})).with_plugins(registry));
//!
//! let value = container.run(["double"]).await?;
//! assert_eq!(value, json!({"a": 2}));
//! assert!(container.changed(Some("a"))?);
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod config;
pub mod container;
pub mod engine;
pub mod field;
pub mod plugins;
pub mod store;

pub use container::{Container, ContainerFactory, ContainerInit, RunOptions, UsageError};
pub use engine::{PipelineError, PipelineResult};
pub use sk_protocol::Snapshot;
