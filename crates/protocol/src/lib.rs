//! # sk-protocol
//!
//! Core protocol definitions and data models for statekit.
//!
//! This crate defines all shared data structures used for:
//! - Configuration file parsing (TOML config, Markdown plugin definitions)
//! - Runtime invocation records
//! - Events emitted by a container to its observers
//!
//! ## Modules
//!
//! - [`config_models`]: Global configuration from config.toml
//! - [`plugin_models`]: Declarative plugin definitions and field operations
//! - [`invocation_models`]: Pipeline invocation state and status
//! - [`events`]: Events broadcast by a running container
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other statekit crates

pub mod config_models;
pub mod events;
pub mod invocation_models;
pub mod plugin_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use events::*;
pub use invocation_models::*;
pub use plugin_models::*;

/// A full state value held by a container.
///
/// Snapshots are arbitrary structured records. They are treated as
/// immutable by convention: every write replaces the whole value.
pub type Snapshot = serde_json::Value;
