//! Storage primitives behind the state store.
//!
//! A [`StateCell`] holds the current [`Revision`] and tells subscribers when
//! it changes. The default [`WatchCell`] is a `tokio::sync::watch` channel;
//! containers can substitute their own through `ContainerConfig`.

use sk_protocol::Snapshot;
use std::pin::Pin;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

/// A snapshot together with the write that produced it.
///
/// Version 0 is the initial snapshot; every write increments the version.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub version: u64,
    pub snapshot: Snapshot,
}

/// Stream of revisions observed after subscribing.
pub type RevisionStream = Pin<Box<dyn Stream<Item = Revision> + Send>>;

/// A substitutable storage primitive.
///
/// Implementations must:
/// - apply `modify` atomically with respect to other writers
/// - bump the version by exactly one per `modify` that produces a snapshot,
///   and leave the cell untouched when it produces none
/// - eventually yield the latest revision to every subscriber after a write
///   (intermediate revisions may be skipped)
pub trait StateCell: Send + Sync {
    fn current(&self) -> Revision;

    /// Replace the snapshot with `f(current)` and return the new revision.
    ///
    /// If `f` returns `None` nothing is written and subscribers are not
    /// woken.
    fn modify(&self, f: Box<dyn FnOnce(&Snapshot) -> Option<Snapshot> + '_>) -> Option<Revision>;

    fn subscribe(&self) -> RevisionStream;
}

/// Default cell built on a `tokio::sync::watch` channel.
#[derive(Debug)]
pub struct WatchCell {
    tx: watch::Sender<Revision>,
}

impl WatchCell {
    pub fn new(initial: Snapshot) -> Self {
        let (tx, _rx) = watch::channel(Revision {
            version: 0,
            snapshot: initial,
        });
        Self { tx }
    }
}

impl StateCell for WatchCell {
    fn current(&self) -> Revision {
        self.tx.borrow().clone()
    }

    fn modify(&self, f: Box<dyn FnOnce(&Snapshot) -> Option<Snapshot> + '_>) -> Option<Revision> {
        let mut committed = None;
        self.tx.send_if_modified(|revision| {
            let Some(next) = f(&revision.snapshot) else {
                return false;
            };
            revision.snapshot = next;
            revision.version += 1;
            committed = Some(revision.clone());
            true
        });
        committed
    }

    fn subscribe(&self) -> RevisionStream {
        Box::pin(WatchStream::from_changes(self.tx.subscribe()))
    }
}
