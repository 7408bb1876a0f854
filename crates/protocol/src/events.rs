//! Container event protocol.
//!
//! Events are broadcast by a container to any number of observers (a UI, a
//! logger, a test). They describe invocation progress and store commits.
//!
//! Uses tagged enum serialization for TypeScript compatibility:
//! ```json
//! {
//!   "type": "invocationStatusUpdate",
//!   "payload": {
//!     "invocation_id": "uuid-here",
//!     "status": "COMMITTING",
//!     "step_index": 1
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::invocation_models::InvocationStatus;

/// Events sent from a container to its observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ContainerEvent {
    /// A new pipeline invocation has been created.
    InvocationStarted {
        #[ts(type = "string")]
        invocation_id: Uuid,
        plugins: Vec<String>,
    },

    /// An invocation's status has changed.
    InvocationStatusUpdate {
        #[ts(type = "string")]
        invocation_id: Uuid,
        status: InvocationStatus,
        step_index: usize,
    },

    /// A unit finished and handed its output to the next one.
    StepCompleted {
        #[ts(type = "string")]
        invocation_id: Uuid,
        step_index: usize,
        plugin: String,
    },

    /// An invocation's final value was written to the store.
    Committed {
        #[ts(type = "string")]
        invocation_id: Uuid,
        version: u64,
    },

    /// The apply cycle observed a store revision.
    Applied { version: u64 },

    /// An invocation failed before committing.
    InvocationFailed {
        #[ts(type = "string")]
        invocation_id: Uuid,
        error: String,
    },

    /// An invocation handed its final value back to the caller.
    InvocationResolved {
        #[ts(type = "string")]
        invocation_id: Uuid,
    },
}
