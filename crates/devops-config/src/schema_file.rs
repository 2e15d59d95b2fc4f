//! Declarative schemas loaded from JSON.
//!
//! Projects that drive the config library from the command line describe their
//! fields in a schema file instead of code:
//!
//! ```json
//! {
//!     "fields": [
//!         {"name": "PROJECT_NAME", "kind": "constant", "required": true},
//!         {"name": "STAGE", "kind": "constant", "default": "dev"},
//!         {"name": "DB_PASSWORD", "kind": "constant", "dont_dump": true, "printable": false},
//!         {"name": "ENVIRONMENT_NAME", "kind": "derivable", "template": "{{ PROJECT_NAME }}-{{ STAGE }}"}
//!     ]
//! }
//! ```
//!
//! A derivable's `template` is filled from the current values of the fields it
//! names, so derivables may build on other derivables.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use toolkit::{inject_variables, placeholders, read_jsonc, FileStore};

use crate::config::Config;
use crate::errors::{ConfigError, Result};
use crate::field::{required, Field};
use crate::schema::ConfigSchema;

/// Top-level schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Field declarations in order.
    pub fields: Vec<FieldSpec>,
}

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,

    /// Constant or derivable, with the derivable's template.
    #[serde(flatten)]
    pub kind: FieldSpecKind,

    /// Initial value of a constant.
    #[serde(default)]
    pub default: Option<Value>,

    /// Keep the field out of dumped files.
    #[serde(default)]
    pub dont_dump: bool,

    /// Show the field when printing the config.
    #[serde(default = "printable_by_default")]
    pub printable: bool,

    /// Reject `null` and empty strings on validation.
    #[serde(default)]
    pub required: bool,
}

fn printable_by_default() -> bool {
    true
}

/// Field kind tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpecKind {
    /// Stored value.
    Constant,
    /// Value computed from `template`.
    Derivable {
        /// Text with `{{ FIELD }}` placeholders.
        template: String,
    },
}

impl SchemaFile {
    /// Parses a schema document.
    pub fn from_value(value: Value, source_name: &str) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidSchema {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Reads a schema file (comments allowed) through `store`.
    pub fn load(store: &dyn FileStore, path: &Path) -> Result<Self> {
        let resolved = store.resolve(path);
        let value = read_jsonc(store, &resolved)?;
        Self::from_value(value, &resolved.display().to_string())
    }

    /// Builds the [`ConfigSchema`] described by this document.
    pub fn into_schema(self) -> ConfigSchema {
        self.fields
            .into_iter()
            .fold(ConfigSchema::new(), |schema, spec| {
                let name = spec.name.clone();
                schema.field(name, spec.into_field())
            })
    }
}

impl FieldSpec {
    fn into_field(self) -> Field {
        let mut field = match self.kind {
            FieldSpecKind::Constant => {
                Field::constant().default(self.default.unwrap_or(Value::Null))
            }
            FieldSpecKind::Derivable { template } => {
                Field::derivable(move |config| render_template(config, &template))
            }
        };
        if self.dont_dump {
            field = field.dont_dump();
        }
        if !self.printable {
            field = field.hidden();
        }
        if self.required {
            field = field.validator(required);
        }
        field
    }
}

fn render_template(config: &Config, template: &str) -> Result<Value> {
    let mut values = Map::new();
    for name in placeholders(template) {
        if !values.contains_key(&name) {
            let value = config.value_of(&name)?;
            values.insert(name, value);
        }
    }
    Ok(Value::String(inject_variables(template, &values)?))
}
