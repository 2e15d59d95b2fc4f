//! Core domain for devops-tools.
//!
//! This crate holds the operations that let infrastructure-as-code projects
//! share one centralised configuration between deployment tools through JSON
//! files that may contain line comments. The `storage` crate supplies the
//! filesystem; the `devops-config` crate builds the config library on top of
//! these primitives; the `cli` crate exposes them as commands.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** Nothing here touches the filesystem
//! directly; file access goes through [`FileStore`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ResourceType`, `InvocationId`) |
//! | [`types`] | `Tag` and JSON rendering helpers |
//! | [`errors`] | [`ToolkitError`] |
//! | [`comments`] | Line-comment stripping and JSONC parsing |
//! | [`json_path`] | Dotted-path value lookup |
//! | [`parameters`] | CloudFormation `--parameter-overrides` |
//! | [`template`] | Placeholder injection, common tags, stack rendering |
//! | [`store`] | [`FileStore`] port and [`MemoryFileStore`] |

pub mod comments;
pub mod errors;
pub mod identifiers;
pub mod json_path;
pub mod parameters;
pub mod store;
pub mod template;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use comments::{parse_jsonc, strip_comments, strip_comments_with, DEFAULT_COMMENT_SYMBOLS};
pub use errors::{Result, ToolkitError};
pub use identifiers::{InvocationId, ResourceType};
pub use json_path::{read_json_value, JsonPath};
pub use parameters::{format_overrides, load_parameter_overrides, parameter_overrides};
pub use store::{normalize_path, read_jsonc, FileStore, MemoryFileStore};
pub use template::{
    apply_common_tags, default_taggable_resource_types, inject_variables, placeholders,
    render_stack_templates, stack_template_paths, DEFAULT_TAGGABLE_RESOURCE_TYPES,
    NESTED_STACK_TYPE,
};
pub use types::{render_scalar, sort_keys, to_pretty_json, Tag};
