//! Shared value types and JSON helpers.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! structured data (tags) or operate on `serde_json::Value` documents the way
//! every tool in the workspace needs: rendering scalars for command lines,
//! pretty-printing with four-space indentation, and key sorting for dumps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, ToolkitError};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// A CloudFormation resource tag.
///
/// Serialises as `{"Key": "...", "Value": "..."}`, the shape CloudFormation
/// expects inside `Properties.Tags`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key; unique within one resource.
    #[serde(rename = "Key")]
    pub key: String,
    /// Tag value.
    #[serde(rename = "Value")]
    pub value: String,
}

impl Tag {
    /// Creates a new [`Tag`].
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the tag as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("Key".to_string(), Value::String(self.key.clone()));
        obj.insert("Value".to_string(), Value::String(self.value.clone()));
        Value::Object(obj)
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    /// Parses `KEY=VALUE`. The value may itself contain `=`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self::new(key, value)),
            _ => Err(format!("expected KEY=VALUE, got '{s}'")),
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

// ---------------------------------------------------------------------------
// JSON rendering
// ---------------------------------------------------------------------------

/// Renders a value for use on a command line or inside a text template.
///
/// Strings are emitted raw (no quotes); every other value is emitted as
/// compact JSON (`42`, `true`, `null`, `["a"]`).
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serialises `value` as pretty JSON with a four-space indent.
pub fn to_pretty_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| ToolkitError::invalid_json("<serialize>", &e))?;
    String::from_utf8(buf).map_err(|e| ToolkitError::InvalidJson {
        source_name: "<serialize>".to_string(),
        message: e.to_string(),
    })
}

/// Returns a copy of `value` with the keys of every nested object sorted.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}
