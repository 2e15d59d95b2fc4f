//! Centralised config management for devops projects.
//!
//! One hand-edited `config-raw.json` holds the project's constant settings.
//! A [`ConfigSchema`] declares which fields exist, how derivable fields are
//! computed from the constants, and which values are secret. A [`Config`]
//! loads the raw file and renders one final JSON file per [`DeployTool`], so
//! Python code, shell scripts, CloudFormation, SAM, Serverless, and Terraform
//! all read the same values.
//!
//! ```
//! use devops_config::{Config, ConfigSchema, Field};
//! use serde_json::json;
//!
//! let schema = ConfigSchema::new()
//!     .field("PROJECT_NAME", Field::constant())
//!     .field("STAGE", Field::constant().default("dev"))
//!     .field(
//!         "ENVIRONMENT_NAME",
//!         Field::derivable(|c| {
//!             Ok(json!(format!("{}-{}", c.str_of("PROJECT_NAME")?, c.str_of("STAGE")?)))
//!         }),
//!     );
//!
//! let mut config = Config::new(schema);
//! config.set("PROJECT_NAME", json!("demo")).unwrap();
//! assert_eq!(config.value_of("ENVIRONMENT_NAME").unwrap(), json!("demo-dev"));
//! ```
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`field`] | [`Field`] declarations, validators, the `HIDDEN` mask |
//! | [`schema`] | Ordered [`ConfigSchema`] with inheritance and per-tool renderers |
//! | [`config`] | [`Config`] values, rendering, config-dir files |
//! | [`tool`] | [`DeployTool`] and file naming |
//! | [`schema_file`] | Declarative [`SchemaFile`] loaded from JSON |
//! | [`errors`] | [`ConfigError`] |

pub mod config;
pub mod errors;
pub mod field;
pub mod schema;
pub mod schema_file;
pub mod tool;

pub use config::Config;
pub use errors::{ConfigError, Result};
pub use field::{required, Field, FieldKind, Getter, Validator, HIDDEN};
pub use schema::{ConfigSchema, Renderer};
pub use schema_file::{FieldSpec, FieldSpecKind, SchemaFile};
pub use tool::{to_big_camel_case, DeployTool, RAW_CONFIG_FILE, SCHEMA_FILE};
