//! Shared helpers for the sk-core integration suites.
//!
//! - Plugin fixtures with side-effect counters
//! - Event assertions
//! - On-disk `.statekit/` projects

pub mod assertions;
pub mod fixtures;
pub mod plugins;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use plugins::*;
