//! Plugin abstraction and registry.
//!
//! This module provides the `Plugin` trait, closure adapters, declarative
//! plugins loaded from configuration, and the `PluginRegistry` that maps
//! names to units.

pub mod base;
pub mod declarative;
pub mod registry;

pub use base::{plugin_fn, sync_plugin, FnPlugin, Plugin, PluginError, SyncPlugin};
pub use declarative::DeclarativePlugin;
pub use registry::PluginRegistry;
