//! The state store: current and initial snapshots plus field access.

use crate::field::{self, FieldResult, IntoFieldPath};
use crate::store::cell::{Revision, RevisionStream, StateCell, WatchCell};
use sk_protocol::Snapshot;
use std::fmt;
use std::sync::Arc;

/// New value for a field: a literal, or a function of the prior value.
pub enum FieldUpdate {
    Value(Snapshot),
    Updater(Box<dyn FnOnce(Option<&Snapshot>) -> Snapshot + Send>),
}

impl FieldUpdate {
    /// Compute the new value from the value currently at the path.
    ///
    /// ```
    /// use sk_core::store::FieldUpdate;
    /// use serde_json::json;
    ///
    /// let bump = FieldUpdate::with(|prev| json!(prev.and_then(|v| v.as_i64()).unwrap_or(0) + 1));
    /// # let _ = bump;
    /// ```
    pub fn with(f: impl FnOnce(Option<&Snapshot>) -> Snapshot + Send + 'static) -> Self {
        FieldUpdate::Updater(Box::new(f))
    }

    fn resolve(self, prev: Option<&Snapshot>) -> Snapshot {
        match self {
            FieldUpdate::Value(value) => value,
            FieldUpdate::Updater(f) => f(prev),
        }
    }
}

impl From<Snapshot> for FieldUpdate {
    fn from(value: Snapshot) -> Self {
        FieldUpdate::Value(value)
    }
}

impl fmt::Debug for FieldUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldUpdate::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldUpdate::Updater(_) => f.write_str("Updater(..)"),
        }
    }
}

/// Holds the current and initial snapshots of a container.
///
/// The initial snapshot is captured once and never changes. Every write
/// replaces the current snapshot wholesale and produces a new [`Revision`].
pub struct StateStore {
    cell: Box<dyn StateCell>,
    initial: Arc<Snapshot>,
}

impl StateStore {
    /// Create a store backed by the default [`WatchCell`].
    pub fn new(initial: Snapshot) -> Self {
        let cell = Box::new(WatchCell::new(initial.clone()));
        Self::with_cell(Arc::new(initial), cell)
    }

    /// Create a store over a caller-supplied cell.
    ///
    /// `cell` must start out holding the same value as `initial`.
    pub fn with_cell(initial: Arc<Snapshot>, cell: Box<dyn StateCell>) -> Self {
        Self { cell, initial }
    }

    /// The current snapshot.
    pub fn read(&self) -> Snapshot {
        self.cell.current().snapshot
    }

    /// The current snapshot with its version.
    pub fn revision(&self) -> Revision {
        self.cell.current()
    }

    /// A copy of the snapshot captured at construction.
    pub fn read_initial(&self) -> Snapshot {
        self.initial.as_ref().clone()
    }

    pub fn initial(&self) -> &Snapshot {
        &self.initial
    }

    /// Replace the current snapshot.
    pub fn write(&self, next: Snapshot) -> Revision {
        self.cell
            .modify(Box::new(move |_| Some(next)))
            .unwrap_or_else(|| self.revision())
    }

    /// Whether the current snapshot differs from the initial one.
    ///
    /// With a key, only the values at that path are compared; a path absent
    /// from both snapshots counts as unchanged.
    pub fn changed(&self, key: Option<&str>) -> FieldResult<bool> {
        let current = self.read();
        let equal = match key {
            Some(key) => {
                let path = key.into_field_path()?;
                match (field::get(&current, &path), field::get(&self.initial, &path)) {
                    (Some(a), Some(b)) => field::deep_equal(a, b),
                    (None, None) => true,
                    _ => false,
                }
            }
            None => field::deep_equal(&current, &self.initial),
        };
        Ok(!equal)
    }

    /// Read the value at `key`.
    pub fn get(&self, key: impl IntoFieldPath) -> FieldResult<Option<Snapshot>> {
        let path = key.into_field_path()?;
        Ok(field::get(&self.read(), &path).cloned())
    }

    /// Write the value at `key`, as one atomic read-modify-write.
    ///
    /// A write the path cannot take (see [`field::set`]) leaves the store
    /// untouched.
    pub fn set(
        &self,
        key: impl IntoFieldPath,
        update: impl Into<FieldUpdate>,
    ) -> FieldResult<Revision> {
        let path = key.into_field_path()?;
        let update = update.into();
        let mut failure = None;
        let revision = self.cell.modify(Box::new(|prev| {
            let value = update.resolve(field::get(prev, &path));
            match field::set(prev, &path, value) {
                Ok(next) => Some(next),
                Err(e) => {
                    failure = Some(e);
                    None
                }
            }
        }));
        match failure {
            Some(e) => Err(e),
            None => Ok(revision.unwrap_or_else(|| self.revision())),
        }
    }

    /// Delete the value at `key`.
    pub fn remove(&self, key: impl IntoFieldPath) -> FieldResult<Revision> {
        let path = key.into_field_path()?;
        Ok(self
            .cell
            .modify(Box::new(move |prev| Some(field::remove(prev, &path))))
            .unwrap_or_else(|| self.revision()))
    }

    /// Stream of revisions written after this call.
    pub fn subscribe(&self) -> RevisionStream {
        self.cell.subscribe()
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("revision", &self.revision())
            .field("initial", &self.initial)
            .finish()
    }
}
