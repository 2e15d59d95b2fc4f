//! Config instances: values for a schema, rendering, and dumping.

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use toolkit::{parse_jsonc, read_jsonc, render_scalar, sort_keys, to_pretty_json, FileStore};

use crate::errors::{ConfigError, Result};
use crate::field::{FieldKind, HIDDEN};
use crate::schema::ConfigSchema;
use crate::tool::{to_big_camel_case, DeployTool, RAW_CONFIG_FILE};

/// Values for every constant field of a [`ConfigSchema`].
///
/// Constants start at their declared default. Derivable fields are computed on
/// each read through their getter, which receives this config.
pub struct Config {
    schema: Arc<ConfigSchema>,
    values: IndexMap<String, Value>,
    config_dir: Option<PathBuf>,
    resolving: RefCell<Vec<String>>,
}

impl Config {
    // -----------------------------------------------------------------------
    // Construction and updates
    // -----------------------------------------------------------------------

    /// Creates a config holding each constant's default.
    pub fn new(schema: impl Into<Arc<ConfigSchema>>) -> Self {
        let schema = schema.into();
        let values = schema
            .constants()
            .map(|(name, field)| (name.to_string(), field.default_value().clone()))
            .collect();
        Self {
            schema,
            values,
            config_dir: None,
            resolving: RefCell::new(Vec::new()),
        }
    }

    /// Creates a config and assigns the declared fields found in `values`.
    ///
    /// Assigning a derivable field is an error; names the schema does not
    /// declare are ignored.
    pub fn with_values(
        schema: impl Into<Arc<ConfigSchema>>,
        values: &Map<String, Value>,
    ) -> Result<Self> {
        let mut config = Self::new(schema);
        for (name, value) in values {
            if config.schema.get(name).is_some() {
                config.set(name, value.clone())?;
            } else {
                tracing::warn!(field = %name, "ignoring undeclared config value");
            }
        }
        Ok(config)
    }

    /// Creates a config from loaded data, reading constant fields only.
    pub fn from_map(schema: impl Into<Arc<ConfigSchema>>, data: &Map<String, Value>) -> Self {
        let mut config = Self::new(schema);
        config.update(data);
        config
    }

    /// Creates a config from JSON text with line comments.
    pub fn from_jsonc(schema: impl Into<Arc<ConfigSchema>>, text: &str) -> Result<Self> {
        let data = object(parse_jsonc(text, "<inline>")?, "<inline>")?;
        Ok(Self::from_map(schema, &data))
    }

    /// Sets the value of a constant field.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.schema.get(name).map(|f| f.kind()) {
            Some(FieldKind::Constant) => {
                self.values.insert(name.to_string(), value);
                Ok(())
            }
            Some(FieldKind::Derivable(_)) => Err(ConfigError::DerivableSetValue {
                name: name.to_string(),
            }),
            None => Err(ConfigError::UnknownField {
                name: name.to_string(),
            }),
        }
    }

    /// Copies every constant field found in `data`; other keys are ignored.
    pub fn update(&mut self, data: &Map<String, Value>) {
        for (name, value) in data {
            match self.schema.get(name) {
                Some(field) if field.is_constant() => {
                    self.values.insert(name.clone(), value.clone());
                }
                _ => tracing::warn!(field = %name, "skipping non-constant config key"),
            }
        }
    }

    /// Updates constants from `config-raw.json` in the config dir.
    pub fn update_from_raw_file(&mut self, store: &dyn FileStore) -> Result<()> {
        let path = self.config_file(store, RAW_CONFIG_FILE)?;
        let label = path.display().to_string();
        let data = object(read_jsonc(store, &path)?, &label)?;
        self.update(&data);
        tracing::debug!(path = %label, "config updated from raw file");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading values
    // -----------------------------------------------------------------------

    /// Returns the schema this config was built from.
    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Returns the current value of a field, computing derivables.
    ///
    /// `dont_dump` and `printable` are not applied here; getters use this to
    /// read the fields they derive from.
    pub fn value_of(&self, name: &str) -> Result<Value> {
        let field = self.schema.get(name).ok_or_else(|| ConfigError::UnknownField {
            name: name.to_string(),
        })?;

        let getter = match field.kind() {
            FieldKind::Constant => {
                return Ok(self.values.get(name).cloned().unwrap_or(Value::Null));
            }
            FieldKind::Derivable(getter) => getter,
        };

        {
            let mut stack = self.resolving.borrow_mut();
            if let Some(start) = stack.iter().position(|n| n == name) {
                let mut chain = stack[start..].to_vec();
                chain.push(name.to_string());
                return Err(ConfigError::DerivationCycle { chain });
            }
            stack.push(name.to_string());
        }
        let value = getter(self);
        self.resolving.borrow_mut().pop();
        value
    }

    /// Returns a field value rendered as text (strings raw, others as JSON).
    pub fn str_of(&self, name: &str) -> Result<String> {
        self.value_of(name).map(|v| render_scalar(&v))
    }

    /// Collects all field values in declaration order.
    ///
    /// With `check_dont_dump`, `dont_dump` fields are left out. With
    /// `check_printable`, non-printable fields are replaced by [`HIDDEN`].
    pub fn to_map(
        &self,
        check_dont_dump: bool,
        check_printable: bool,
    ) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        for (name, field) in self.schema.fields() {
            if check_dont_dump && field.is_dont_dump() {
                continue;
            }
            let value = if check_printable && !field.is_printable() {
                Value::String(HIDDEN.to_string())
            } else {
                self.value_of(name)?
            };
            map.insert(name.to_string(), value);
        }
        Ok(map)
    }

    /// Serialises [`Config::to_map`] as four-space indented JSON, in field order.
    pub fn to_json(&self, check_dont_dump: bool, check_printable: bool) -> Result<String> {
        let map = self.to_map(check_dont_dump, check_printable)?;
        Ok(to_pretty_json(&Value::Object(map))?)
    }

    /// Runs the validators of constant fields, then of derivable fields.
    pub fn validate(&self) -> Result<()> {
        for (name, field) in self.schema.constants().chain(self.schema.derivables()) {
            let value = self.value_of(name)?;
            field.check(&value).map_err(|message| ConfigError::Validation {
                field: name.to_string(),
                message,
            })?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Config dir and per-tool files
    // -----------------------------------------------------------------------

    /// Sets the directory holding the raw and final config files.
    pub fn set_config_dir(&mut self, dir: impl Into<PathBuf>) {
        self.config_dir = Some(dir.into());
    }

    /// Builder form of [`Config::set_config_dir`].
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.set_config_dir(dir);
        self
    }

    /// Returns the configured directory, if any.
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// Resolves `file_name` inside the config dir, which must exist.
    pub fn config_file(&self, store: &dyn FileStore, file_name: &str) -> Result<PathBuf> {
        let dir = self.config_dir.as_deref().ok_or(ConfigError::ConfigDirUnset)?;
        let dir = store.resolve(dir);
        if !store.is_dir(&dir) {
            return Err(ConfigError::ConfigDirMissing { path: dir });
        }
        Ok(dir.join(file_name))
    }

    /// Resolves the final config file for `tool`.
    pub fn final_file(&self, store: &dyn FileStore, tool: DeployTool) -> Result<PathBuf> {
        self.config_file(store, &tool.file_name())
    }

    /// Renders the data `tool` receives.
    ///
    /// A renderer registered on the schema wins. Otherwise every tool gets
    /// [`Config::to_map`] without `dont_dump` fields, and CloudFormation gets
    /// the same data with BigCamelCase keys.
    pub fn render(&self, tool: DeployTool) -> Result<Map<String, Value>> {
        if let Some(render) = self.schema.renderer_for(tool) {
            return render(self);
        }
        let data = self.to_map(true, false)?;
        Ok(match tool {
            DeployTool::CloudFormation => data
                .into_iter()
                .map(|(key, value)| (to_big_camel_case(&key), value))
                .collect(),
            _ => data,
        })
    }

    /// Writes the final config file for `tool` with keys sorted.
    pub fn dump(&self, store: &dyn FileStore, tool: DeployTool) -> Result<PathBuf> {
        let path = self.final_file(store, tool)?;
        let data = sort_keys(&Value::Object(self.render(tool)?));
        store.write_text(&path, &to_pretty_json(&data)?)?;
        tracing::info!(tool = %tool, path = %path.display(), "config file written");
        Ok(path)
    }

    /// Writes the final config file of every tool.
    pub fn dump_all(&self, store: &dyn FileStore) -> Result<Vec<PathBuf>> {
        DeployTool::ALL
            .into_iter()
            .map(|tool| self.dump(store, tool))
            .collect()
    }
}

fn object(value: Value, source_name: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject {
            source_name: source_name.to_string(),
        }),
    }
}

impl fmt::Display for Config {
    /// Shows every field, including `dont_dump` ones, with hidden values masked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_json(false, true) {
            Ok(json) => write!(f, "Config({json})"),
            Err(e) => write!(f, "Config(<error: {e}>)"),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
