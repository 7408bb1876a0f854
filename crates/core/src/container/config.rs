//! Container creation options.

use crate::store::{StateCell, WatchCell};
use sk_protocol::config_models::GlobalConfig;
use sk_protocol::config_models::{DEFAULT_DEBOUNCE_MS, DEFAULT_EVENT_CAPACITY};
use sk_protocol::Snapshot;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Builds the storage cell for a new container from its initial snapshot.
pub type StateFactory = Arc<dyn Fn(Snapshot) -> Box<dyn StateCell> + Send + Sync>;

/// Options shared by every container a factory creates.
#[derive(Clone)]
pub struct ContainerConfig {
    /// Storage primitive. Defaults to [`WatchCell`].
    pub state_implementation: StateFactory,

    /// Quiescence window for `debounced_set`.
    pub debounce_window: Duration,

    /// Buffered events per observer before the slowest one starts lagging.
    pub event_capacity: usize,
}

impl ContainerConfig {
    /// Map project settings from `.statekit/config.toml`.
    pub fn from_global(global: &GlobalConfig) -> Self {
        Self {
            debounce_window: Duration::from_millis(global.debounce_ms),
            event_capacity: global.event_capacity.max(1),
            ..Self::default()
        }
    }

    /// Substitute the storage primitive.
    pub fn with_state_implementation(
        mut self,
        factory: impl Fn(Snapshot) -> Box<dyn StateCell> + Send + Sync + 'static,
    ) -> Self {
        self.state_implementation = Arc::new(factory);
        self
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            state_implementation: Arc::new(|initial| Box::new(WatchCell::new(initial))),
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("debounce_window", &self.debounce_window)
            .field("event_capacity", &self.event_capacity)
            .finish_non_exhaustive()
    }
}
