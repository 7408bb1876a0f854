//! Snapshot storage.
//!
//! This module provides:
//! - The substitutable `StateCell` primitive and its `WatchCell` default
//! - The `StateStore` holding current and initial snapshots

pub mod cell;
#[allow(clippy::module_inception)]
pub mod store;

pub use cell::{Revision, RevisionStream, StateCell, WatchCell};
pub use store::{FieldUpdate, StateStore};
