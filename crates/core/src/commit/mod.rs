//! Commit coordination.
//!
//! The `CommitCoordinator` turns "the pipeline produced V" into "the store
//! holds V and the caller knows it has been applied". Each commit is
//! correlated with the store revision its write produced; an apply loop
//! watching the store completes every pending commit whose revision it has
//! observed.

use crate::engine::lifecycle::{fail_invocation, mark_applied, mark_committing};
use crate::engine::{PipelineError, PipelineResult};
use crate::store::StateStore;
use sk_protocol::events::ContainerEvent;
use sk_protocol::invocation_models::Invocation;
use sk_protocol::Snapshot;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::Sender;
use tokio::sync::oneshot;
use tokio_stream::StreamExt;
use tracing::{debug, trace};

struct PendingCommit {
    value: Snapshot,
    tx: oneshot::Sender<Snapshot>,
}

/// Pending commits keyed by the revision version their write produced.
type PendingTable = Arc<Mutex<BTreeMap<u64, Vec<PendingCommit>>>>;

fn lock(table: &PendingTable) -> MutexGuard<'_, BTreeMap<u64, Vec<PendingCommit>>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes pipeline results and waits for them to be applied.
pub struct CommitCoordinator {
    store: Arc<StateStore>,
    pending: PendingTable,
}

impl CommitCoordinator {
    /// Create a coordinator and spawn its apply loop.
    ///
    /// Must be called from within a tokio runtime. The loop ends when the
    /// store is dropped; commits still pending then fail with
    /// `CommitAbandoned`.
    pub fn new(store: Arc<StateStore>, events: Sender<ContainerEvent>) -> Self {
        let pending: PendingTable = Arc::default();
        tokio::spawn(apply_loop(&store, Arc::clone(&pending), events));
        Self { store, pending }
    }

    /// Write `value` to the store and wait until the apply loop has
    /// observed it. Resolves with the committed value.
    pub async fn commit(
        &self,
        invocation: &mut Invocation,
        value: Snapshot,
        events: &Sender<ContainerEvent>,
    ) -> PipelineResult<Snapshot> {
        let (tx, rx) = oneshot::channel();

        // Registering under the same lock as the write keeps the apply loop
        // from draining this version before the entry exists.
        let version = {
            let mut table = lock(&self.pending);
            let revision = self.store.write(value.clone());
            table
                .entry(revision.version)
                .or_default()
                .push(PendingCommit { value, tx });
            revision.version
        };
        debug!(invocation_id = %invocation.id, version, "committed pipeline result");
        mark_committing(invocation, events, version);

        match rx.await {
            Ok(applied) => {
                mark_applied(invocation, events);
                Ok(applied)
            }
            Err(_) => {
                let error = PipelineError::CommitAbandoned;
                fail_invocation(invocation, events, error.to_string());
                Err(error)
            }
        }
    }

    /// Number of commits written but not yet applied.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).values().map(Vec::len).sum()
    }
}

fn apply_loop(
    store: &StateStore,
    pending: PendingTable,
    events: Sender<ContainerEvent>,
) -> impl std::future::Future<Output = ()> + Send + 'static {
    let mut revisions = store.subscribe();

    async move {
        while let Some(revision) = revisions.next().await {
            // Let consumers woken by the same write observe it first.
            tokio::task::yield_now().await;

            let ready = {
                let mut table = lock(&pending);
                let later = table.split_off(&(revision.version + 1));
                std::mem::replace(&mut *table, later)
            };

            trace!(version = revision.version, "revision applied");
            let _ = events.send(ContainerEvent::Applied {
                version: revision.version,
            });

            for commit in ready.into_values().flatten() {
                let _ = commit.tx.send(commit.value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lifecycle::create_invocation;
    use serde_json::json;
    use sk_protocol::invocation_models::InvocationStatus;
    use tokio::sync::broadcast;

    #[tokio::test]
    async fn test_commit_resolves_after_write() {
        let store = Arc::new(StateStore::new(json!({"a": 1})));
        let (tx, _rx) = broadcast::channel(32);
        let coordinator = CommitCoordinator::new(Arc::clone(&store), tx.clone());
        let mut invocation = create_invocation(vec!["double".to_string()], true);

        let applied = coordinator
            .commit(&mut invocation, json!({"a": 2}), &tx)
            .await
            .unwrap();

        assert_eq!(applied, json!({"a": 2}));
        assert_eq!(store.read(), json!({"a": 2}));
        assert_eq!(invocation.status, InvocationStatus::Applied);
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_emits_committed_and_applied() {
        let store = Arc::new(StateStore::new(json!({})));
        let (tx, mut rx) = broadcast::channel(32);
        let coordinator = CommitCoordinator::new(Arc::clone(&store), tx.clone());
        let mut invocation = create_invocation(vec!["noop".to_string()], true);

        coordinator
            .commit(&mut invocation, json!({"x": 1}), &tx)
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events
            .iter()
            .any(|e| matches!(e, ContainerEvent::Committed { version: 1, .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, ContainerEvent::Applied { version: 1 })));
    }

    #[tokio::test]
    async fn test_overlapping_commits_all_resolve() {
        let store = Arc::new(StateStore::new(json!(0)));
        let (tx, _rx) = broadcast::channel(32);
        let coordinator = Arc::new(CommitCoordinator::new(Arc::clone(&store), tx.clone()));

        let mut first = create_invocation(vec!["a".to_string()], true);
        let mut second = create_invocation(vec!["b".to_string()], true);

        let (a, b) = tokio::join!(
            coordinator.commit(&mut first, json!(1), &tx),
            coordinator.commit(&mut second, json!(2), &tx),
        );

        // Each caller gets its own value back.
        assert_eq!(a.unwrap(), json!(1));
        assert_eq!(b.unwrap(), json!(2));
        assert_eq!(store.read(), json!(2));
    }
}
