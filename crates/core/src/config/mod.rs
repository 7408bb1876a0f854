//! Project configuration.
//!
//! Loads the `.statekit/` directory: global settings, initial values and
//! declarative plugins.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;
pub use models::ProjectConfig;
