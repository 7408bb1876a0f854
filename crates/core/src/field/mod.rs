//! Path-addressed access to nested snapshot values.
//!
//! This module provides:
//! - [`FieldPath`] parsing for dotted/indexed paths
//! - `get`, `set`, `remove` over owned copies of a snapshot
//! - `deep_equal` for structural comparison

pub mod access;
pub mod error;
pub mod path;

pub use access::{deep_equal, get, remove, remove_in_place, set, set_in_place};
pub use error::{FieldError, FieldResult};
pub use path::{FieldPath, IntoFieldPath, Segment};
