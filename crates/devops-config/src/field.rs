//! Config field definitions.
//!
//! A field is either a **constant**, whose value is loaded from the raw config
//! file or set in code, or a **derivable**, whose value is computed from other
//! fields every time it is read. Two flags control what leaves the process:
//!
//! - `dont_dump` keeps secrets out of every dumped file and rendered map;
//! - `printable = false` masks the value as [`HIDDEN`] when the config is
//!   printed for humans.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::errors::Result;

/// Replacement text for non-printable values.
pub const HIDDEN: &str = "***HIDDEN***";

/// Computes a derivable field from the rest of the config.
pub type Getter = Arc<dyn Fn(&Config) -> Result<Value> + Send + Sync>;

/// Checks a field value; the error string becomes the validation message.
pub type Validator = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

/// Whether a field stores its value or computes it.
#[derive(Clone)]
pub enum FieldKind {
    /// Stored value.
    Constant,
    /// Computed value.
    Derivable(Getter),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "Constant"),
            Self::Derivable(_) => write!(f, "Derivable(<getter>)"),
        }
    }
}

/// A field declaration within a [`crate::ConfigSchema`].
#[derive(Clone)]
pub struct Field {
    kind: FieldKind,
    default: Value,
    dont_dump: bool,
    printable: bool,
    validator: Option<Validator>,
}

impl Field {
    /// Declares a constant field whose initial value is `null`.
    pub fn constant() -> Self {
        Self::with_kind(FieldKind::Constant)
    }

    /// Declares a field computed by `getter`.
    pub fn derivable<F>(getter: F) -> Self
    where
        F: Fn(&Config) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_kind(FieldKind::Derivable(Arc::new(getter)))
    }

    fn with_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            default: Value::Null,
            dont_dump: false,
            printable: true,
            validator: None,
        }
    }

    /// Sets the initial value of a constant. Ignored for derivables.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Excludes the field from rendered maps and dumped files.
    pub fn dont_dump(mut self) -> Self {
        self.dont_dump = true;
        self
    }

    /// Masks the field when the config is printed.
    pub fn hidden(mut self) -> Self {
        self.printable = false;
        self
    }

    /// Attaches a validator run by [`Config::validate`].
    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(check));
        self
    }

    /// Returns the field kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns `true` for constant fields.
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, FieldKind::Constant)
    }

    /// Returns `true` for derivable fields.
    pub fn is_derivable(&self) -> bool {
        matches!(self.kind, FieldKind::Derivable(_))
    }

    /// Returns the initial value of a constant.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Returns `true` if the field is kept out of dumps.
    pub fn is_dont_dump(&self) -> bool {
        self.dont_dump
    }

    /// Returns `true` if the field may be printed.
    pub fn is_printable(&self) -> bool {
        self.printable
    }

    pub(crate) fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match &self.validator {
            Some(check) => check(value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("dont_dump", &self.dont_dump)
            .field("printable", &self.printable)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Validator rejecting `null` and empty strings.
pub fn required(value: &Value) -> std::result::Result<(), String> {
    match value {
        Value::Null => Err("value is required".to_string()),
        Value::String(s) if s.is_empty() => Err("value must not be empty".to_string()),
        _ => Ok(()),
    }
}
