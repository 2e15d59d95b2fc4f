//! Error type for the devops-tools domain.
//!
//! [`ToolkitError`] covers every failure the toolkit operations can produce:
//! file access reported by a [`crate::FileStore`], JSON that fails to parse
//! after comment stripping, path lookups that miss, and template or parameter
//! data that cannot be resolved.
//!
//! Configuration-library errors live in the `devops-config` crate and wrap
//! this type.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the toolkit.
pub type Result<T, E = ToolkitError> = std::result::Result<T, E>;

/// Errors produced by toolkit operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolkitError {
    /// The file does not exist.
    #[error("'{}' doesn't exist", path.display())]
    FileNotFound {
        /// Resolved path of the missing file.
        path: PathBuf,
    },

    /// Reading or writing a file failed for a reason other than absence.
    #[error("I/O error on '{}': {message}", path.display())]
    Io {
        /// Resolved path of the file.
        path: PathBuf,
        /// Message of the underlying I/O error.
        message: String,
    },

    /// The content is not valid JSON once comments are stripped.
    ///
    /// `source_name` is a file path or a label such as `"<inline>"`.
    #[error("failed to load json from '{source_name}': {message}")]
    InvalidJson {
        /// Where the JSON came from.
        source_name: String,
        /// Parser message, including line and column.
        message: String,
    },

    /// A JSON path lookup found nothing.
    #[error("'$.{path}' not found in {}", file.display())]
    JsonPathNotFound {
        /// The path with any `$.` prefix removed.
        path: String,
        /// File that was searched.
        file: PathBuf,
    },

    /// A template declares a parameter the config file does not define.
    #[error("Parameter '{parameter}' from {} not found in {}", template.display(), config.display())]
    MissingParameter {
        /// Name of the template parameter.
        parameter: String,
        /// Template that declares it.
        template: PathBuf,
        /// Config file that lacks it.
        config: PathBuf,
    },

    /// A `{{ NAME }}` placeholder has no value in the variable data.
    #[error("`{name}` not found in config data")]
    UndefinedVariable {
        /// Trimmed placeholder name.
        name: String,
    },

    /// Placeholders remain after substitution (e.g. introduced by a value).
    #[error("several VARIABLEs are not evaluated {names:?}")]
    UnresolvedVariables {
        /// Raw text of each remaining placeholder.
        names: Vec<String>,
    },

    /// A template document does not have the shape an operation needs.
    #[error("malformed template '{source_name}': {reason}")]
    MalformedTemplate {
        /// File path or label of the template.
        source_name: String,
        /// What was wrong.
        reason: String,
    },
}

impl ToolkitError {
    /// Builds an [`ToolkitError::InvalidJson`] from a `serde_json` error.
    pub fn invalid_json(source_name: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::InvalidJson {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    /// Builds an [`ToolkitError::MalformedTemplate`].
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
