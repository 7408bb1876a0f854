//! Plugins declared as data in `.statekit/plugins/*.md`.

use crate::field::{self, FieldPath};
use crate::plugins::base::{Plugin, PluginError};
use async_trait::async_trait;
use serde_json::{Number, Value};
use sk_protocol::plugin_models::{FieldOp, PluginDefinition};
use sk_protocol::Snapshot;

/// A plugin that applies a fixed list of [`FieldOp`]s in order.
#[derive(Debug, Clone)]
pub struct DeclarativePlugin {
    definition: PluginDefinition,
}

impl DeclarativePlugin {
    pub fn new(definition: PluginDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &PluginDefinition {
        &self.definition
    }
}

#[async_trait]
impl Plugin for DeclarativePlugin {
    async fn apply(&self, mut snapshot: Snapshot) -> Result<Snapshot, PluginError> {
        for op in &self.definition.steps {
            apply_op(&mut snapshot, op)?;
        }
        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.definition.description
    }
}

/// Apply one operation to a snapshot the caller owns.
pub fn apply_op(target: &mut Value, op: &FieldOp) -> Result<(), PluginError> {
    match op {
        FieldOp::Set { path, value } => {
            field::set_in_place(target, &FieldPath::parse(path)?, value.clone())?;
        }
        FieldOp::Remove { path } => {
            field::remove_in_place(target, &FieldPath::parse(path)?);
        }
        FieldOp::Copy { from, to } => {
            let to = FieldPath::parse(to)?;
            if let Some(value) = field::get(target, &FieldPath::parse(from)?).cloned() {
                field::set_in_place(target, &to, value)?;
            }
        }
        FieldOp::Rename { from, to } => {
            let to = FieldPath::parse(to)?;
            if let Some(value) = field::remove_in_place(target, &FieldPath::parse(from)?) {
                field::set_in_place(target, &to, value)?;
            }
        }
        FieldOp::Increment { path, by } => {
            let parsed = FieldPath::parse(path)?;
            let next = match field::get(target, &parsed) {
                None | Some(Value::Null) => add(&Number::from(0), *by),
                Some(Value::Number(current)) => add(current, *by),
                Some(_) => None,
            }
            .ok_or_else(|| PluginError::NotANumber { path: path.clone() })?;
            field::set_in_place(target, &parsed, Value::Number(next))?;
        }
        FieldOp::Require { path } => {
            if field::get(target, &FieldPath::parse(path)?).is_none() {
                return Err(PluginError::MissingField { path: path.clone() });
            }
        }
    }
    Ok(())
}

/// Integer arithmetic when both sides are whole, float otherwise.
fn add(current: &Number, by: f64) -> Option<Number> {
    let whole_step = by.fract() == 0.0 && by.abs() < i64::MAX as f64;
    if let (Some(current), true) = (current.as_i64(), whole_step) {
        if let Some(sum) = current.checked_add(by as i64) {
            return Some(Number::from(sum));
        }
    }
    Number::from_f64(current.as_f64()? + by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldError;
    use serde_json::json;

    fn plugin(steps: Vec<FieldOp>) -> DeclarativePlugin {
        DeclarativePlugin::new(PluginDefinition {
            name: "test".to_string(),
            description: "Test plugin".to_string(),
            steps,
            documentation: String::new(),
        })
    }

    #[tokio::test]
    async fn test_set_and_remove() {
        let p = plugin(vec![
            FieldOp::Set {
                path: "meta.status".to_string(),
                value: json!("published"),
            },
            FieldOp::Remove {
                path: "draft".to_string(),
            },
        ]);

        let result = p.apply(json!({"draft": true, "title": "x"})).await.unwrap();
        assert_eq!(result, json!({"title": "x", "meta": {"status": "published"}}));
        assert_eq!(p.description(), "Test plugin");
    }

    #[tokio::test]
    async fn test_copy_and_rename() {
        let p = plugin(vec![
            FieldOp::Copy {
                from: "title".to_string(),
                to: "meta.title".to_string(),
            },
            FieldOp::Rename {
                from: "notes".to_string(),
                to: "meta.notes".to_string(),
            },
            FieldOp::Rename {
                from: "missing".to_string(),
                to: "elsewhere".to_string(),
            },
        ]);

        let result = p.apply(json!({"title": "x", "notes": [1]})).await.unwrap();
        assert_eq!(
            result,
            json!({"title": "x", "meta": {"title": "x", "notes": [1]}})
        );
    }

    #[tokio::test]
    async fn test_increment_keeps_integers_whole() {
        let p = plugin(vec![
            FieldOp::Increment {
                path: "count".to_string(),
                by: 1.0,
            },
            FieldOp::Increment {
                path: "fresh".to_string(),
                by: 2.0,
            },
            FieldOp::Increment {
                path: "ratio".to_string(),
                by: 0.5,
            },
        ]);

        let result = p.apply(json!({"count": 41, "ratio": 1})).await.unwrap();
        assert_eq!(result["count"], json!(42));
        assert!(result["count"].is_i64());
        assert_eq!(result["fresh"], json!(2));
        assert_eq!(result["ratio"], json!(1.5));
    }

    #[tokio::test]
    async fn test_increment_rejects_non_numbers() {
        let p = plugin(vec![FieldOp::Increment {
            path: "name".to_string(),
            by: 1.0,
        }]);

        let result = p.apply(json!({"name": "ada"})).await;
        assert!(matches!(result, Err(PluginError::NotANumber { path }) if path == "name"));
    }

    #[tokio::test]
    async fn test_require_missing_field_fails() {
        let p = plugin(vec![
            FieldOp::Require {
                path: "title".to_string(),
            },
            FieldOp::Set {
                path: "ok".to_string(),
                value: json!(true),
            },
        ]);

        let result = p.apply(json!({})).await;
        assert!(matches!(result, Err(PluginError::MissingField { path }) if path == "title"));

        let result = p.apply(json!({"title": null})).await.unwrap();
        assert_eq!(result["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_malformed_path_fails() {
        let p = plugin(vec![FieldOp::Remove {
            path: "a..b".to_string(),
        }]);

        let result = p.apply(json!({})).await;
        assert!(matches!(result, Err(PluginError::Field(_))));
    }

    #[tokio::test]
    async fn test_set_far_past_array_end_fails() {
        let p = plugin(vec![FieldOp::Set {
            path: format!("items[{}]", usize::MAX),
            value: json!(1),
        }]);

        let result = p.apply(json!({"items": []})).await;
        assert!(matches!(
            result,
            Err(PluginError::Field(FieldError::IndexOutOfRange { len: 0, .. }))
        ));
    }
}
