//! Pipeline execution engine.
//!
//! The PipelineEngine resolves plugin names against the registry, then
//! executes the units strictly in sequence, feeding each unit the previous
//! unit's output.

pub mod error;
pub mod lifecycle;

use crate::plugins::{Plugin, PluginRegistry};
use lifecycle::{advance_step, complete_step, fail_invocation, mark_transformed, start_resolving};
use sk_protocol::events::ContainerEvent;
use sk_protocol::invocation_models::Invocation;
use sk_protocol::Snapshot;
use std::sync::Arc;
use tokio::sync::broadcast::Sender;
use tracing::{debug, warn};

pub use error::{PipelineError, PipelineResult};

/// A plugin name paired with the unit it resolved to.
pub type ResolvedStep = (String, Arc<dyn Plugin>);

/// The pipeline execution engine.
///
/// Holds the registry captured when the owning container was created.
pub struct PipelineEngine {
    registry: Arc<PluginRegistry>,
}

impl PipelineEngine {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Resolve every name up front.
    ///
    /// # Errors
    ///
    /// - `EmptyPipeline` if `names` is empty
    /// - `UnregisteredPlugin` for the first name with no registered unit
    pub fn resolve(&self, names: &[String]) -> PipelineResult<Vec<ResolvedStep>> {
        if names.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }

        names
            .iter()
            .map(|name| {
                self.registry
                    .get(name)
                    .map(|plugin| (name.clone(), plugin))
                    .ok_or_else(|| PipelineError::UnregisteredPlugin { name: name.clone() })
            })
            .collect()
    }

    /// Fold `snapshot` through the named plugins and return the result.
    ///
    /// Nothing runs unless every name resolves. The first failing unit ends
    /// the fold.
    pub async fn transform(&self, names: &[String], snapshot: Snapshot) -> PipelineResult<Snapshot> {
        let steps = self.resolve(names)?;
        execute(&steps, snapshot, |_, _| {}).await
    }

    /// Execute an invocation, recording its lifecycle.
    ///
    /// This is the entry point used by containers. It:
    /// 1. Transitions the invocation to Resolving
    /// 2. Resolves every plugin name before running anything
    /// 3. Runs each unit in order, emitting StepCompleted after each
    /// 4. Transitions to Transformed, or Failed on the first error
    ///
    /// Committing the result is the caller's job.
    pub async fn run(
        &self,
        invocation: &mut Invocation,
        snapshot: Snapshot,
        events: &Sender<ContainerEvent>,
    ) -> PipelineResult<Snapshot> {
        start_resolving(invocation, events);

        let steps = match self.resolve(&invocation.plugins) {
            Ok(steps) => steps,
            Err(e) => {
                warn!(invocation_id = %invocation.id, error = %e, "pipeline resolution failed");
                fail_invocation(invocation, events, e.to_string());
                return Err(e);
            }
        };

        let result = execute(&steps, snapshot, |index, name| {
            if index > 0 {
                advance_step(invocation);
            }
            complete_step(invocation, events, name);
        })
        .await;

        match result {
            Ok(value) => {
                mark_transformed(invocation, events);
                Ok(value)
            }
            Err(e) => {
                warn!(invocation_id = %invocation.id, error = %e, "pipeline step failed");
                fail_invocation(invocation, events, e.to_string());
                Err(e)
            }
        }
    }
}

/// Run resolved units in order, calling `on_step` after each one succeeds.
async fn execute(
    steps: &[ResolvedStep],
    snapshot: Snapshot,
    mut on_step: impl FnMut(usize, &str),
) -> PipelineResult<Snapshot> {
    let mut value = snapshot;

    for (index, (name, plugin)) in steps.iter().enumerate() {
        debug!(step = index, plugin = %name, "applying plugin");

        value = plugin
            .apply(value)
            .await
            .map_err(|source| PipelineError::PluginFailed {
                plugin: name.clone(),
                step: index,
                source,
            })?;

        on_step(index, name);
    }

    Ok(value)
}
