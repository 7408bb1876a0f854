//! Trailing-edge debounce for field updates.
//!
//! Calls are queued to a background task. A burst of calls separated by
//! less than the window collapses into its last call, which is applied once
//! the burst has been quiet for a full window.

use crate::field::{FieldPath, FieldResult};
use crate::store::{FieldUpdate, StateStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{trace, warn};

struct PendingSet {
    path: FieldPath,
    update: FieldUpdate,
}

/// Handle to a debounce task writing into one store.
#[derive(Debug)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<PendingSet>,
    store: Arc<StateStore>,
}

impl Debouncer {
    /// Spawn the debounce task. Must be called from within a tokio runtime.
    ///
    /// When the handle is dropped, a pending trailing call is applied
    /// immediately and the task exits.
    pub fn spawn(store: Arc<StateStore>, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(rx, Arc::clone(&store), window));
        Self { tx, store }
    }

    /// Queue a set; only the last call of a burst is applied.
    ///
    /// If the debounce task is gone the set is applied immediately, and its
    /// error, if any, is returned.
    pub fn push(&self, path: FieldPath, update: FieldUpdate) -> FieldResult<()> {
        if let Err(mpsc::error::SendError(pending)) = self.tx.send(PendingSet { path, update }) {
            warn!(path = %pending.path, "debounce task stopped, applying set immediately");
            self.store.set(&pending.path, pending.update)?;
        }
        Ok(())
    }
}

async fn debounce_loop(
    mut rx: mpsc::UnboundedReceiver<PendingSet>,
    store: Arc<StateStore>,
    window: Duration,
) {
    while let Some(first) = rx.recv().await {
        let mut latest = first;

        loop {
            match tokio::time::timeout(window, rx.recv()).await {
                Ok(Some(next)) => {
                    trace!(superseded = %latest.path, "debounced set superseded");
                    latest = next;
                }
                // closed or quiet: apply what we have
                Ok(None) | Err(_) => break,
            }
        }

        if let Err(e) = store.set(&latest.path, latest.update) {
            warn!(path = %latest.path, error = %e, "debounced set failed");
        }
    }
}
