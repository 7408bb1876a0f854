//! Base Plugin trait and supporting types.

use crate::field::FieldError;
use async_trait::async_trait;
use sk_protocol::Snapshot;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Required field '{path}' is missing")]
    MissingField { path: String },
    #[error("Field '{path}' is not a number")]
    NotANumber { path: String },
    #[error("Invalid field path: {0}")]
    Field(#[from] FieldError),
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl PluginError {
    /// Build a failure from a plain message.
    pub fn msg(message: impl std::fmt::Display) -> Self {
        PluginError::Failed(anyhow::anyhow!("{message}"))
    }
}

/// A transformation unit: maps one snapshot to the next.
///
/// Implementations must not rely on shared mutable state between calls; the
/// engine may run the same plugin in several invocations concurrently.
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn apply(&self, snapshot: Snapshot) -> Result<Snapshot, PluginError>;

    /// Short human-readable description, shown by listings.
    fn description(&self) -> &str {
        ""
    }
}

/// A plugin backed by an async closure. Build one with [`plugin_fn`].
pub struct FnPlugin<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Plugin for FnPlugin<F>
where
    F: Fn(Snapshot) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Snapshot, PluginError>> + Send + 'static,
{
    async fn apply(&self, snapshot: Snapshot) -> Result<Snapshot, PluginError> {
        (self.f)(snapshot).await
    }
}

/// Wrap an async closure as a plugin.
///
/// ```
/// use sk_core::plugins::plugin_fn;
///
/// let touch = plugin_fn(|mut snapshot| async move {
///     snapshot["touched"] = true.into();
///     Ok(snapshot)
/// });
/// # let _ = touch;
/// ```
pub fn plugin_fn<F, Fut>(f: F) -> FnPlugin<F>
where
    F: Fn(Snapshot) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Snapshot, PluginError>> + Send + 'static,
{
    FnPlugin { f }
}

/// A plugin backed by a synchronous closure. Build one with [`sync_plugin`].
pub struct SyncPlugin<F> {
    f: F,
}

#[async_trait]
impl<F> Plugin for SyncPlugin<F>
where
    F: Fn(Snapshot) -> Result<Snapshot, PluginError> + Send + Sync + 'static,
{
    async fn apply(&self, snapshot: Snapshot) -> Result<Snapshot, PluginError> {
        (self.f)(snapshot)
    }
}

/// Wrap a synchronous closure as a plugin.
pub fn sync_plugin<F>(f: F) -> SyncPlugin<F>
where
    F: Fn(Snapshot) -> Result<Snapshot, PluginError> + Send + Sync + 'static,
{
    SyncPlugin { f }
}
