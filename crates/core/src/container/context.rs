//! Provider scoping.
//!
//! A [`ContainerFactory`] creates containers and finds the one in scope for
//! the current task. Scopes are task-local and nest; lookups return the
//! innermost container created by the asking factory.

use super::config::ContainerConfig;
use super::{Container, ContainerInit};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

tokio::task_local! {
    static SCOPE: Vec<Container>;
}

static NEXT_FACTORY_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("container used outside provider")]
    OutsideProvider,
}

/// Creates containers sharing one [`ContainerConfig`].
#[derive(Debug, Clone)]
pub struct ContainerFactory {
    id: u64,
    config: Arc<ContainerConfig>,
}

impl ContainerFactory {
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            id: NEXT_FACTORY_ID.fetch_add(1, Ordering::Relaxed),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Create a container, capturing the plugins and initial values once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn provide(&self, init: ContainerInit) -> Container {
        Container::create(self.id, &self.config, init)
    }

    /// The innermost container in scope that this factory created.
    ///
    /// # Errors
    ///
    /// `UsageError::OutsideProvider` when the current task is not running
    /// inside [`Container::scope`] for one of this factory's containers.
    pub fn use_container(&self) -> Result<Container, UsageError> {
        SCOPE
            .try_with(|stack| {
                stack
                    .iter()
                    .rev()
                    .find(|container| container.factory_id() == self.id)
                    .cloned()
            })
            .ok()
            .flatten()
            .ok_or(UsageError::OutsideProvider)
    }
}

impl Default for ContainerFactory {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

/// Run `fut` with `container` pushed onto the task-local scope.
pub(super) async fn enter<F: Future>(container: Container, fut: F) -> F::Output {
    let mut stack = SCOPE.try_with(Clone::clone).unwrap_or_default();
    stack.push(container);
    SCOPE.scope(stack, fut).await
}
