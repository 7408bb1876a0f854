//! Plugin fixtures.

use serde_json::json;
use sk_core::plugins::{plugin_fn, sync_plugin, Plugin, PluginError, PluginRegistry};
use sk_core::Snapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// `{a: n}` → `{a: 2n}`, other fields kept.
pub fn double() -> impl Plugin {
    sync_plugin(|mut s| {
        let a = s["a"]
            .as_i64()
            .ok_or_else(|| PluginError::NotANumber { path: "a".to_string() })?;
        s["a"] = json!(a * 2);
        Ok(s)
    })
}

/// `{a: n}` → `{a: n + 1}`.
#[allow(dead_code)]
pub fn add_one() -> impl Plugin {
    sync_plugin(|mut s| {
        let a = s["a"]
            .as_i64()
            .ok_or_else(|| PluginError::NotANumber { path: "a".to_string() })?;
        s["a"] = json!(a + 1);
        Ok(s)
    })
}

/// `{a: n}` → `{a: "n"}`. Fails `double` if it runs first.
#[allow(dead_code)]
pub fn to_string() -> impl Plugin {
    sync_plugin(|mut s| {
        s["a"] = json!(s["a"].to_string());
        Ok(s)
    })
}

/// Sleeps before passing the snapshot through unchanged.
#[allow(dead_code)]
pub fn slow(delay: Duration) -> impl Plugin {
    plugin_fn(move |s| async move {
        tokio::time::sleep(delay).await;
        Ok(s)
    })
}

#[allow(dead_code)]
pub fn failing(message: &'static str) -> impl Plugin {
    sync_plugin(move |_| Err(PluginError::msg(message)))
}

/// Passes the snapshot through and counts calls.
#[allow(dead_code)]
pub fn counting(calls: &Arc<AtomicUsize>) -> impl Plugin {
    let calls = Arc::clone(calls);
    sync_plugin(move |s: Snapshot| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(s)
    })
}

/// `double`, `add-one` and `to-string`.
#[allow(dead_code)]
pub fn arithmetic_registry() -> PluginRegistry {
    PluginRegistry::new()
        .with_plugin("double", double())
        .with_plugin("add-one", add_one())
        .with_plugin("to-string", to_string())
}
