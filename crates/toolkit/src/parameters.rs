//! CloudFormation parameter overrides.
//!
//! `aws cloudformation deploy` takes template parameters as
//! `--parameter-overrides Key1=Value1 Key2=Value2`. The keys are exactly the
//! ones a template declares under `Parameters`; the values come from the
//! centralised config file rendered for CloudFormation. Every declared
//! parameter must be present in the config, otherwise the deploy would fall
//! back to template defaults silently.

use std::path::Path;

use serde_json::{Map, Value};

use crate::errors::{Result, ToolkitError};
use crate::store::{read_jsonc, FileStore};
use crate::types::render_scalar;

/// Selects, in template declaration order, the config values for every
/// parameter `template` declares.
///
/// `template_path` and `config_path` only label the error.
pub fn parameter_overrides(
    template: &Value,
    config: &Value,
    template_path: &Path,
    config_path: &Path,
) -> Result<Map<String, Value>> {
    let Some(declared) = template.get("Parameters").and_then(Value::as_object) else {
        return Ok(Map::new());
    };

    let mut overrides = Map::new();
    for key in declared.keys() {
        match config.get(key) {
            Some(value) => {
                overrides.insert(key.clone(), value.clone());
            }
            None => {
                return Err(ToolkitError::MissingParameter {
                    parameter: key.clone(),
                    template: template_path.to_path_buf(),
                    config: config_path.to_path_buf(),
                })
            }
        }
    }
    Ok(overrides)
}

/// Reads both files through `store` and computes the overrides.
pub fn load_parameter_overrides(
    store: &dyn FileStore,
    template_path: &Path,
    config_path: &Path,
) -> Result<Map<String, Value>> {
    let template_path = store.resolve(template_path);
    let config_path = store.resolve(config_path);

    let template = read_jsonc(store, &template_path)?;
    let config = read_jsonc(store, &config_path)?;

    let overrides = parameter_overrides(&template, &config, &template_path, &config_path)?;
    tracing::debug!(
        template = %template_path.display(),
        count = overrides.len(),
        "parameter overrides resolved"
    );
    Ok(overrides)
}

/// Formats overrides as `Key1=Value1 Key2=Value2`.
pub fn format_overrides(overrides: &Map<String, Value>) -> String {
    overrides
        .iter()
        .map(|(key, value)| format!("{key}={}", render_scalar(value)))
        .collect::<Vec<_>>()
        .join(" ")
}
