//! Dotted-path lookups into JSON documents.
//!
//! The notation is the small subset of JSONPath that shell scripts need to pull
//! one setting out of a config file: an optional `$.` prefix followed by
//! `.`-separated segments. Segments are matched literally, so keys containing
//! spaces or dashes (`profile.first name`, `profile.phone-number`) work without
//! quoting. A segment applied to an array must be a decimal index.

use std::path::Path;

use serde_json::Value;

use crate::errors::{Result, ToolkitError};
use crate::store::{read_jsonc, FileStore};

/// A parsed dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<String>,
}

impl JsonPath {
    /// Parses `$.a.b`, `a.b`, or the root forms `$` and the empty string.
    pub fn parse(path: &str) -> Self {
        let body = path.strip_prefix("$.").unwrap_or(path);
        if body.is_empty() || body == "$" {
            return Self {
                segments: Vec::new(),
            };
        }
        Self {
            segments: body.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` if the path addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Follows the path from `root`.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl std::fmt::Display for JsonPath {
    /// Formats the path without the `$.` prefix.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Reads `file` (comments allowed) and returns the value at `path`.
pub fn read_json_value(store: &dyn FileStore, file: &Path, path: &str) -> Result<Value> {
    let resolved = store.resolve(file);
    let document = read_jsonc(store, &resolved)?;
    let json_path = JsonPath::parse(path);

    match json_path.lookup(&document) {
        Some(value) => {
            tracing::debug!(file = %resolved.display(), path = %json_path, "json value found");
            Ok(value.clone())
        }
        None => Err(ToolkitError::JsonPathNotFound {
            path: json_path.to_string(),
            file: resolved,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFileStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "name": "alice",
            "profile": {
                "ssn": "123-45-6789",
                "first name": "obama",
                "phone-number": "999-888-7777"
            },
            "servers": [{"host": "a"}, {"host": "b"}]
        })
    }

    #[test]
    fn test_prefix_is_optional() {
        assert_eq!(JsonPath::parse("$.profile.ssn"), JsonPath::parse("profile.ssn"));
        assert_eq!(JsonPath::parse("profile.ssn").segments(), ["profile", "ssn"]);
    }

    #[test]
    fn test_root_forms() {
        assert!(JsonPath::parse("$").is_root());
        assert!(JsonPath::parse("").is_root());
        assert_eq!(JsonPath::parse("$").lookup(&document()), Some(&document()));
    }

    #[test]
    fn test_lookup_literal_segments() {
        let doc = document();
        assert_eq!(JsonPath::parse("name").lookup(&doc), Some(&json!("alice")));
        assert_eq!(
            JsonPath::parse("$.profile.first name").lookup(&doc),
            Some(&json!("obama"))
        );
        assert_eq!(
            JsonPath::parse("profile.phone-number").lookup(&doc),
            Some(&json!("999-888-7777"))
        );
    }

    #[test]
    fn test_lookup_array_indices() {
        let doc = document();
        assert_eq!(JsonPath::parse("servers.1.host").lookup(&doc), Some(&json!("b")));
        assert_eq!(JsonPath::parse("servers.2.host").lookup(&doc), None);
        assert_eq!(JsonPath::parse("servers.first").lookup(&doc), None);
    }

    #[test]
    fn test_lookup_through_scalar_misses() {
        assert_eq!(JsonPath::parse("name.length").lookup(&document()), None);
    }

    #[test]
    fn test_read_json_value_reports_missing_path() {
        let store = MemoryFileStore::with_base("/work")
            .with_file("data.json", "{\"name\": \"alice\"} // who");

        assert_eq!(
            read_json_value(&store, Path::new("data.json"), "$.name").unwrap(),
            json!("alice")
        );

        let err = read_json_value(&store, Path::new("data.json"), "$.profile.ssn").unwrap_err();
        assert_eq!(err.to_string(), "'$.profile.ssn' not found in /work/data.json");
    }
}
