//! Ordered collections of field declarations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::errors::Result;
use crate::field::Field;
use crate::tool::DeployTool;

/// Replaces the default rendering of a config for one [`DeployTool`].
pub type Renderer = Arc<dyn Fn(&Config) -> Result<Map<String, Value>> + Send + Sync>;

/// The declared fields of a config, in declaration order.
///
/// A schema can extend another with [`ConfigSchema::inherit`]: the parent's
/// fields come first, and redeclaring a name replaces that field in place.
#[derive(Clone, Default)]
pub struct ConfigSchema {
    fields: IndexMap<String, Field>,
    renderers: HashMap<DeployTool, Renderer>,
}

impl ConfigSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema starting with every field and renderer of `base`.
    pub fn inherit(base: &ConfigSchema) -> Self {
        base.clone()
    }

    /// Declares a field. Redeclaring keeps the original position.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Overrides how the config is rendered for `tool`.
    pub fn renderer<F>(mut self, tool: DeployTool, render: F) -> Self
    where
        F: Fn(&Config) -> Result<Map<String, Value>> + Send + Sync + 'static,
    {
        self.renderers.insert(tool, Arc::new(render));
        self
    }

    /// Looks up a field.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Iterates over all fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Iterates over constant fields in declaration order.
    pub fn constants(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields().filter(|(_, field)| field.is_constant())
    }

    /// Iterates over derivable fields in declaration order.
    pub fn derivables(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields().filter(|(_, field)| field.is_derivable())
    }

    /// Returns the custom renderer for `tool`, if any.
    pub fn renderer_for(&self, tool: DeployTool) -> Option<&Renderer> {
        self.renderers.get(&tool)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for ConfigSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tools: Vec<&DeployTool> = self.renderers.keys().collect();
        tools.sort();
        f.debug_struct("ConfigSchema")
            .field("fields", &self.fields)
            .field("renderers", &tools)
            .finish()
    }
}
