//! Invocation state machine implementation.
//!
//! This module provides functions for moving an [`Invocation`] through its
//! lifecycle and broadcasting each transition as a [`ContainerEvent`].
//! Sending never blocks; events are dropped when nobody is listening.

use chrono::Utc;
use sk_protocol::events::ContainerEvent;
use sk_protocol::invocation_models::{Invocation, InvocationStatus};
use tokio::sync::broadcast::Sender;
use uuid::Uuid;

/// Create a new Invocation with Created status.
pub fn create_invocation(plugins: Vec<String>, update_state: bool) -> Invocation {
    Invocation {
        id: Uuid::new_v4(),
        plugins,
        update_state,
        status: InvocationStatus::Created,
        current_step: 0,
        started_at: Utc::now(),
        completed_at: None,
        error: None,
    }
}

/// Announce a freshly created invocation.
pub fn announce_invocation(invocation: &Invocation, events: &Sender<ContainerEvent>) {
    let _ = events.send(ContainerEvent::InvocationStarted {
        invocation_id: invocation.id,
        plugins: invocation.plugins.clone(),
    });
}

fn transition(invocation: &mut Invocation, events: &Sender<ContainerEvent>, status: InvocationStatus) {
    invocation.status = status;
    if status.is_terminal() {
        invocation.completed_at = Some(Utc::now());
    }
    let _ = events.send(ContainerEvent::InvocationStatusUpdate {
        invocation_id: invocation.id,
        status,
        step_index: invocation.current_step,
    });
}

/// Transition to Resolving: names are being resolved and units run.
pub fn start_resolving(invocation: &mut Invocation, events: &Sender<ContainerEvent>) {
    transition(invocation, events, InvocationStatus::Resolving);
}

/// Move to the next step in the pipeline.
pub fn advance_step(invocation: &mut Invocation) {
    invocation.current_step += 1;
}

/// Report that the unit at the current step finished.
pub fn complete_step(invocation: &Invocation, events: &Sender<ContainerEvent>, plugin: &str) {
    let _ = events.send(ContainerEvent::StepCompleted {
        invocation_id: invocation.id,
        step_index: invocation.current_step,
        plugin: plugin.to_string(),
    });
}

/// Transition to Transformed: every unit produced its output.
pub fn mark_transformed(invocation: &mut Invocation, events: &Sender<ContainerEvent>) {
    transition(invocation, events, InvocationStatus::Transformed);
}

/// Transition to Committing after the final value was written as `version`.
pub fn mark_committing(invocation: &mut Invocation, events: &Sender<ContainerEvent>, version: u64) {
    let _ = events.send(ContainerEvent::Committed {
        invocation_id: invocation.id,
        version,
    });
    transition(invocation, events, InvocationStatus::Committing);
}

/// Transition to Applied: the apply cycle observed the commit.
pub fn mark_applied(invocation: &mut Invocation, events: &Sender<ContainerEvent>) {
    transition(invocation, events, InvocationStatus::Applied);
}

/// Transition to Resolved and emit the resolution event.
pub fn resolve_invocation(invocation: &mut Invocation, events: &Sender<ContainerEvent>) {
    transition(invocation, events, InvocationStatus::Resolved);
    let _ = events.send(ContainerEvent::InvocationResolved {
        invocation_id: invocation.id,
    });
}

/// Mark the invocation as failed and emit error event.
pub fn fail_invocation(invocation: &mut Invocation, events: &Sender<ContainerEvent>, error: String) {
    invocation.error = Some(error.clone());
    transition(invocation, events, InvocationStatus::Failed);
    let _ = events.send(ContainerEvent::InvocationFailed {
        invocation_id: invocation.id,
        error,
    });
}
