//! Error types for pipeline invocations.

use crate::plugins::PluginError;
use thiserror::Error;

/// Errors that can occur while running a pipeline invocation.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The invocation named no plugins.
    #[error("Pipeline has no plugins to run")]
    EmptyPipeline,

    /// A requested name has no registered plugin. No plugin ran.
    #[error("Plugin '{name}' is not registered")]
    UnregisteredPlugin { name: String },

    /// A plugin failed. Nothing was committed.
    #[error("Plugin '{plugin}' failed at step {step}: {source}")]
    PluginFailed {
        plugin: String,
        step: usize,
        source: PluginError,
    },

    /// The store went away before the commit was applied.
    #[error("Commit was abandoned before it was applied")]
    CommitAbandoned,

    /// The task running the invocation panicked or was cancelled.
    #[error("Invocation task failed: {0}")]
    TaskFailed(String),
}

/// Type alias for Result with PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
