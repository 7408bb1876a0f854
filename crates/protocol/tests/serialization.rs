use chrono::Utc;
use sk_protocol::*;
use uuid::Uuid;

#[test]
fn test_plugin_definition_deserialization_from_yaml() {
    let yaml_str = r#"
name: publish
description: Marks the document as published
steps:
  - require: { path: title }
  - set: { path: status, value: "published" }
  - increment: { path: revision }
  - increment: { path: score, by: 2.5 }
  - copy: { from: title, to: meta.title }
  - rename: { from: draft_notes, to: notes }
  - remove: { path: "tags[0]" }
"#;

    let plugin: PluginDefinition =
        serde_yaml::from_str(yaml_str).expect("Failed to deserialize PluginDefinition");

    assert_eq!(plugin.name, "publish");
    assert_eq!(plugin.description, "Marks the document as published");
    assert_eq!(plugin.steps.len(), 7);
    assert_eq!(
        plugin.steps[0],
        FieldOp::Require {
            path: "title".to_string()
        }
    );
    assert_eq!(
        plugin.steps[1],
        FieldOp::Set {
            path: "status".to_string(),
            value: serde_json::json!("published"),
        }
    );
    // `by` defaults to one
    assert_eq!(
        plugin.steps[2],
        FieldOp::Increment {
            path: "revision".to_string(),
            by: 1.0,
        }
    );
    assert!(matches!(plugin.steps[3], FieldOp::Increment { by, .. } if by == 2.5));
    assert!(plugin.documentation.is_empty());
}

#[test]
fn test_plugin_definition_without_steps() {
    let plugin: PluginDefinition =
        serde_yaml::from_str("name: noop").expect("Failed to deserialize PluginDefinition");

    assert_eq!(plugin.name, "noop");
    assert!(plugin.description.is_empty());
    assert!(plugin.steps.is_empty());
}

#[test]
fn test_field_op_unknown_variant_is_rejected() {
    let result: Result<FieldOp, _> = serde_yaml::from_str("explode: { path: a }");
    assert!(result.is_err());
}

#[test]
fn test_plugin_documentation_is_not_serialized() {
    let plugin = PluginDefinition {
        name: "noop".to_string(),
        description: "Does nothing".to_string(),
        steps: vec![],
        documentation: "Long form docs".to_string(),
    };

    let json = serde_json::to_string(&plugin).expect("Failed to serialize PluginDefinition");
    let deserialized: PluginDefinition =
        serde_json::from_str(&json).expect("Failed to deserialize PluginDefinition");

    assert_eq!(deserialized.name, plugin.name);
    assert_eq!(deserialized.description, plugin.description);
    assert_eq!(deserialized.documentation, "");
}

#[test]
fn test_global_config_defaults() {
    let config: GlobalConfig = toml::from_str("").expect("Failed to parse empty config");
    assert_eq!(config, GlobalConfig::default());
    assert_eq!(config.debounce_ms, 300);
    assert_eq!(config.event_capacity, 64);
    assert!(config.pipelines.is_empty());
}

#[test]
fn test_global_config_with_pipelines() {
    let toml_str = r#"
debounce_ms = 50

[pipelines]
publish = ["normalize", "bump"]
"#;
    let config: GlobalConfig = toml::from_str(toml_str).expect("Failed to parse config");

    assert_eq!(config.debounce_ms, 50);
    assert_eq!(config.event_capacity, 64);
    assert_eq!(
        config.pipelines.get("publish"),
        Some(&vec!["normalize".to_string(), "bump".to_string()])
    );
}

#[test]
fn test_invocation_status_serialization() {
    let status = InvocationStatus::Committing;
    let json = serde_json::to_value(status).expect("Failed to serialize InvocationStatus");

    assert_eq!(json, "COMMITTING");

    let deserialized: InvocationStatus =
        serde_json::from_value(json).expect("Failed to deserialize InvocationStatus");
    assert_eq!(deserialized, InvocationStatus::Committing);
}

#[test]
fn test_invocation_status_terminal() {
    assert!(InvocationStatus::Resolved.is_terminal());
    assert!(InvocationStatus::Failed.is_terminal());
    assert!(!InvocationStatus::Created.is_terminal());
    assert!(!InvocationStatus::Committing.is_terminal());
}

#[test]
fn test_invocation_serialization() {
    let invocation = Invocation {
        id: Uuid::new_v4(),
        plugins: vec!["double".to_string(), "add-one".to_string()],
        update_state: true,
        status: InvocationStatus::Transformed,
        current_step: 1,
        started_at: Utc::now(),
        completed_at: None,
        error: None,
    };

    let json = serde_json::to_string(&invocation).expect("Failed to serialize Invocation");
    let deserialized: Invocation =
        serde_json::from_str(&json).expect("Failed to deserialize Invocation");

    assert_eq!(deserialized.id, invocation.id);
    assert_eq!(deserialized.plugins, invocation.plugins);
    assert_eq!(deserialized.status, InvocationStatus::Transformed);
    assert_eq!(deserialized.current_step, 1);
    assert_eq!(deserialized.started_at, invocation.started_at);
}

#[test]
fn test_container_event_serialization() {
    let invocation_id = Uuid::new_v4();
    let event = ContainerEvent::InvocationStatusUpdate {
        invocation_id,
        status: InvocationStatus::Applied,
        step_index: 2,
    };

    let json = serde_json::to_value(&event).expect("Failed to serialize ContainerEvent");

    assert_eq!(json["type"], "invocationStatusUpdate");
    assert_eq!(json["payload"]["status"], "APPLIED");
    assert_eq!(json["payload"]["step_index"], 2);

    let deserialized: ContainerEvent =
        serde_json::from_value(json).expect("Failed to deserialize ContainerEvent");
    assert_eq!(deserialized, event);
}

#[test]
fn test_applied_event_serialization() {
    let json = serde_json::to_value(ContainerEvent::Applied { version: 7 })
        .expect("Failed to serialize ContainerEvent");

    assert_eq!(json["type"], "applied");
    assert_eq!(json["payload"]["version"], 7);
}
