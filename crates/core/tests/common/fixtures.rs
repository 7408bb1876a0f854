//! On-disk project fixtures.

use std::path::Path;
use tempfile::TempDir;

/// Create a temporary project with a `.statekit/` directory.
///
/// Contains two declarative plugins (`normalize`, `publish`), a `release`
/// pipeline chaining them, and YAML initial values.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path().join(".statekit");
    std::fs::create_dir_all(root.join("plugins"))?;

    std::fs::write(
        root.join("config.toml"),
        r#"debounce_ms = 20
event_capacity = 16

[pipelines]
release = ["normalize", "publish"]
"#,
    )?;

    std::fs::write(
        root.join("initial.yaml"),
        r#"title: Draft
meta:
  revision: 1
  tags: [a, b]
"#,
    )?;

    write_plugin(
        &root,
        "normalize",
        r#"---
name: normalize
description: Moves the title under meta
steps:
  - rename: { from: title, to: meta.title }
  - remove: { path: "meta.tags[0]" }
---

Normalizes the document layout."#,
    )?;

    write_plugin(
        &root,
        "publish",
        r#"---
name: publish
description: Marks the document as published
steps:
  - require: { path: meta.title }
  - set: { path: status, value: published }
  - increment: { path: meta.revision }
---
"#,
    )?;

    Ok(temp_dir)
}

#[allow(dead_code)]
pub fn write_plugin(project_dir: &Path, name: &str, content: &str) -> std::io::Result<()> {
    std::fs::write(project_dir.join("plugins").join(format!("{name}.md")), content)
}
