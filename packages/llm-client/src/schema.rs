//! JSON-schema rendering for JSON-only replies.
//!
//! Reply types derive `schemars::JsonSchema`; the schema is embedded in the
//! system prompt so the model knows the exact shape to return, and the reply
//! is parsed back with [`StructuredOutput::parse_reply`].
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Facts {
//!     facts: Vec<String>,
//! }
//!
//! let system = format!("Reply only with JSON matching:\n{}", Facts::schema_prompt());
//! let facts = Facts::parse_reply(&response.content)?;
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::types::strip_code_blocks;

/// Types that can be requested from the model as a JSON reply.
///
/// Implemented for any type that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict JSON schema for this type.
    ///
    /// Every object gets `additionalProperties: false`, lists all of its
    /// properties as required, and `$ref`s are inlined.
    fn json_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        close_object_schemas(&mut value);
        inline_refs(&mut value);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    /// Pretty-printed schema for inclusion in a prompt.
    fn schema_prompt() -> String {
        serde_json::to_string_pretty(&<Self as StructuredOutput>::json_schema()).unwrap_or_default()
    }

    /// Parse a model reply, tolerating a fenced code block around the JSON.
    fn parse_reply(reply: &str) -> Result<Self> {
        let body = strip_code_blocks(reply);
        if body.is_empty() {
            return Err(LlmError::Parse("empty reply".into()));
        }
        serde_json::from_str(body).map_err(|e| {
            LlmError::Parse(format!(
                "{} reply did not match schema: {}",
                <Self as JsonSchema>::schema_name(),
                e
            ))
        })
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn close_object_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));

                if let Some(Value::Object(props)) = map.get("properties") {
                    let keys: Vec<Value> = props.keys().cloned().map(Value::String).collect();
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }

            for (_, v) in map.iter_mut() {
                close_object_schemas(v);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                close_object_schemas(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut Value) {
    let definitions = match value {
        Value::Object(map) => map.get("definitions").cloned(),
        _ => None,
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
