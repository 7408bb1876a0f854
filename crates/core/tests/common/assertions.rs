//! Event assertion helpers.

use sk_protocol::events::ContainerEvent;
use sk_protocol::invocation_models::InvocationStatus;
use tokio::sync::broadcast;

/// Drain whatever is buffered on an event receiver.
#[allow(dead_code)]
pub fn drain(rx: &mut broadcast::Receiver<ContainerEvent>) -> Vec<ContainerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Statuses reported through `InvocationStatusUpdate`, in order.
#[allow(dead_code)]
pub fn statuses(events: &[ContainerEvent]) -> Vec<InvocationStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            ContainerEvent::InvocationStatusUpdate { status, .. } => Some(*status),
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn has_applied(events: &[ContainerEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, ContainerEvent::Applied { .. }))
}

/// The first event must announce the invocation and the last must end it.
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[ContainerEvent]) {
    assert!(!events.is_empty(), "Event sequence is empty");

    assert!(
        matches!(events[0], ContainerEvent::InvocationStarted { .. }),
        "First event should be InvocationStarted, got: {:?}",
        events[0]
    );

    let last = &events[events.len() - 1];
    assert!(
        matches!(
            last,
            ContainerEvent::InvocationResolved { .. } | ContainerEvent::InvocationFailed { .. }
        ),
        "Last event should be InvocationResolved or InvocationFailed, got: {last:?}"
    );
}
