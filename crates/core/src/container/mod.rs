//! The consumer-facing state container.
//!
//! A [`Container`] ties a [`StateStore`] to a [`PipelineEngine`] and a
//! [`CommitCoordinator`]. Containers are cheap to clone; clones share the
//! same store, registry and event channel.

pub mod config;
pub mod context;
pub mod debounce;

use crate::commit::CommitCoordinator;
use crate::engine::lifecycle::{announce_invocation, create_invocation, resolve_invocation};
use crate::engine::{PipelineEngine, PipelineError, PipelineResult};
use crate::field::{FieldResult, IntoFieldPath};
use crate::plugins::PluginRegistry;
use crate::store::{FieldUpdate, Revision, RevisionStream, StateStore};
use debounce::Debouncer;
use serde::de::DeserializeOwned;
use sk_protocol::events::ContainerEvent;
use sk_protocol::invocation_models::Invocation;
use sk_protocol::Snapshot;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

pub use config::{ContainerConfig, StateFactory};
pub use context::{ContainerFactory, UsageError};

/// What a container is created with.
///
/// Both fields are captured once by [`ContainerFactory::provide`]; there is
/// no way to swap them afterwards.
#[derive(Debug, Default)]
pub struct ContainerInit {
    pub plugins: Option<PluginRegistry>,
    pub initial_values: Snapshot,
}

impl ContainerInit {
    pub fn new(initial_values: Snapshot) -> Self {
        Self {
            plugins: None,
            initial_values,
        }
    }

    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = Some(plugins);
        self
    }
}

/// Per-call options for [`Container::run_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Commit the result and wait for it to be applied. When false the
    /// store is left untouched.
    pub update_state: bool,
}

impl RunOptions {
    pub fn dry_run() -> Self {
        Self {
            update_state: false,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { update_state: true }
    }
}

struct Inner {
    factory_id: u64,
    store: Arc<StateStore>,
    engine: PipelineEngine,
    commits: CommitCoordinator,
    events: broadcast::Sender<ContainerEvent>,
    debouncer: Debouncer,
}

#[derive(Clone)]
pub struct Container {
    inner: Arc<Inner>,
}

impl Container {
    fn create(factory_id: u64, config: &ContainerConfig, init: ContainerInit) -> Self {
        let initial = Arc::new(init.initial_values);
        let cell = (config.state_implementation)(Snapshot::clone(&initial));
        let store = Arc::new(StateStore::with_cell(initial, cell));

        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let registry = Arc::new(init.plugins.unwrap_or_default());

        Self {
            inner: Arc::new(Inner {
                factory_id,
                engine: PipelineEngine::new(registry),
                commits: CommitCoordinator::new(Arc::clone(&store), events.clone()),
                debouncer: Debouncer::spawn(Arc::clone(&store), config.debounce_window),
                store,
                events,
            }),
        }
    }

    pub(crate) fn factory_id(&self) -> u64 {
        self.inner.factory_id
    }

    /// The current snapshot.
    pub fn current(&self) -> Snapshot {
        self.inner.store.read()
    }

    /// The current snapshot deserialized into `T`.
    pub fn current_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.current())
    }

    pub fn revision(&self) -> Revision {
        self.inner.store.revision()
    }

    /// The snapshot the container was created with.
    pub fn initial(&self) -> &Snapshot {
        self.inner.store.initial()
    }

    /// Whether the value at `key` (or the whole snapshot) differs from the
    /// initial values.
    pub fn changed(&self, key: Option<&str>) -> FieldResult<bool> {
        self.inner.store.changed(key)
    }

    pub fn get(&self, key: impl IntoFieldPath) -> FieldResult<Option<Snapshot>> {
        self.inner.store.get(key)
    }

    pub fn set(&self, key: impl IntoFieldPath, update: impl Into<FieldUpdate>) -> FieldResult<Revision> {
        self.inner.store.set(key, update)
    }

    /// Like [`set`](Self::set), but only the trailing call of a burst is
    /// applied once the debounce window has passed without another call.
    ///
    /// The path is validated immediately.
    pub fn debounced_set(&self, key: impl IntoFieldPath, update: impl Into<FieldUpdate>) -> FieldResult<()> {
        let path = key.into_field_path()?;
        self.inner.debouncer.push(path, update.into())
    }

    pub fn remove(&self, key: impl IntoFieldPath) -> FieldResult<Revision> {
        self.inner.store.remove(key)
    }

    /// Run the named plugins and commit the result.
    ///
    /// See [`run_with`](Self::run_with).
    pub fn run<I, S>(&self, names: I) -> impl Future<Output = PipelineResult<Snapshot>> + Send + 'static
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_with(names, RunOptions::default())
    }

    /// Run the named plugins over the current snapshot.
    ///
    /// The snapshot is read when this is called, not when the returned
    /// future is first polled, and the invocation is spawned right away.
    /// Dropping the future does not cancel it: the units still run and, with
    /// `update_state`, the result is still committed.
    ///
    /// Two runs started back to back both read the same snapshot; the later
    /// commit overwrites the earlier one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run_with<I, S>(
        &self,
        names: I,
        options: RunOptions,
    ) -> impl Future<Output = PipelineResult<Snapshot>> + Send + 'static
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let plugins = names.into_iter().map(Into::into).collect();
        let invocation = create_invocation(plugins, options.update_state);
        let snapshot = self.current();

        announce_invocation(&invocation, &self.inner.events);
        let handle = tokio::spawn(self.clone().invoke(invocation, snapshot));

        async move {
            handle
                .await
                .map_err(|e| PipelineError::TaskFailed(e.to_string()))?
        }
    }

    async fn invoke(self, mut invocation: Invocation, snapshot: Snapshot) -> PipelineResult<Snapshot> {
        let inner = &self.inner;
        info!(
            invocation_id = %invocation.id,
            plugins = ?invocation.plugins,
            update_state = invocation.update_state,
            "running pipeline"
        );

        let value = inner.engine.run(&mut invocation, snapshot, &inner.events).await?;
        let value = if invocation.update_state {
            inner.commits.commit(&mut invocation, value, &inner.events).await?
        } else {
            value
        };

        resolve_invocation(&mut invocation, &inner.events);
        info!(invocation_id = %invocation.id, "pipeline resolved");
        Ok(value)
    }

    /// Revisions written after this call.
    pub fn subscribe(&self) -> RevisionStream {
        self.inner.store.subscribe()
    }

    /// Lifecycle events for every invocation on this container.
    pub fn events(&self) -> broadcast::Receiver<ContainerEvent> {
        self.inner.events.subscribe()
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.inner.engine.registry().list_plugins()
    }

    /// Run `fut` with this container in scope for
    /// [`ContainerFactory::use_container`].
    pub async fn scope<F: Future>(&self, fut: F) -> F::Output {
        context::enter(self.clone(), fut).await
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("store", &self.inner.store)
            .field("plugins", &self.plugin_names())
            .finish_non_exhaustive()
    }
}
