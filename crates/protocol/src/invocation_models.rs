//! Runtime invocation state models.
//!
//! This module defines the structures for tracking a single pipeline
//! invocation from name resolution through commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Represents the lifecycle status of a pipeline invocation.
///
/// A committing invocation progresses through:
/// Created -> Resolving -> Transformed -> Committing -> Applied -> Resolved
///
/// An invocation that does not update state skips straight from
/// Transformed to Resolved. Failed and Resolved are terminal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationStatus {
    /// Invocation has been created but nothing has run yet.
    Created,

    /// Plugin names are being resolved and units are executing.
    Resolving,

    /// All units finished and produced a final value.
    Transformed,

    /// The final value has been written and awaits the apply cycle.
    Committing,

    /// The apply cycle has observed the written value.
    Applied,

    /// The caller has received the final value.
    Resolved,

    /// Resolution or a unit failed; nothing was written.
    Failed,
}

impl InvocationStatus {
    /// Whether no further transitions can happen from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, InvocationStatus::Resolved | InvocationStatus::Failed)
    }
}

/// Represents the runtime state of a single pipeline invocation.
#[derive(Serialize, Deserialize, Debug, Clone, TS)]
pub struct Invocation {
    /// Unique identifier for this invocation.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Plugin names, in execution order.
    pub plugins: Vec<String>,

    /// Whether the final value is committed to the store.
    pub update_state: bool,

    /// Current lifecycle status.
    pub status: InvocationStatus,

    /// Zero-based index of the unit currently executing.
    pub current_step: usize,

    /// When the invocation was created.
    #[ts(type = "string")]
    pub started_at: DateTime<Utc>,

    /// When the invocation reached a terminal status.
    #[ts(type = "string | null")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Failure message, set when the status is Failed.
    pub error: Option<String>,
}
