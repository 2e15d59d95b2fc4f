//! Errors raised while building, reading, or dumping a config.

use std::path::PathBuf;

use thiserror::Error;
use toolkit::ToolkitError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Errors produced by the config library.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The schema declares no field with this name.
    #[error("unknown config field '{name}'")]
    UnknownField {
        /// Requested field name.
        name: String,
    },

    /// Derivable fields are computed; they cannot be assigned.
    #[error("can't set value for derivable field '{name}'")]
    DerivableSetValue {
        /// Name of the derivable field.
        name: String,
    },

    /// A derivable field depends on itself, directly or through other fields.
    #[error("derivable fields form a cycle: {}", chain.join(" -> "))]
    DerivationCycle {
        /// Field names from the first repeated field back to itself.
        chain: Vec<String>,
    },

    /// A field validator rejected the current value.
    #[error("invalid value for '{field}': {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validator message.
        message: String,
    },

    /// No config directory was set before a config file was requested.
    #[error("You have to specify the config dir!")]
    ConfigDirUnset,

    /// The config directory does not exist.
    #[error("config dir '{}' doesn't exist!", path.display())]
    ConfigDirMissing {
        /// Resolved config directory.
        path: PathBuf,
    },

    /// A config document is valid JSON but not an object.
    #[error("config data in '{source_name}' is not a JSON object")]
    NotAnObject {
        /// File path or label.
        source_name: String,
    },

    /// A schema file does not describe a valid schema.
    #[error("invalid schema '{source_name}': {message}")]
    InvalidSchema {
        /// File path or label.
        source_name: String,
        /// Deserialisation message.
        message: String,
    },

    /// Error from a toolkit operation (file access, JSON parsing, templates).
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),
}
