//! Command definitions and their execution against a [`FileStore`].

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use devops_config::{Config, DeployTool, SchemaFile, SCHEMA_FILE};
use serde_json::{Map, Value};
use toolkit::{
    default_taggable_resource_types, format_overrides, load_parameter_overrides, read_json_value,
    read_jsonc, render_scalar, render_stack_templates, to_pretty_json, FileStore, ResourceType,
    Tag,
};

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the value at a dotted path (`a.b` or `$.a.b`) in a JSON file with comments.
    JsonValue {
        /// JSON file to read.
        file: PathBuf,
        /// Dotted path to the value.
        path: String,
    },

    /// Print `Key=Value` pairs for `aws cloudformation deploy --parameter-overrides`.
    CfParameterOverrides {
        /// CloudFormation template declaring `Parameters`.
        template: PathBuf,
        /// Config JSON holding a value for every parameter.
        config: PathBuf,
    },

    /// Inject config variables and common tags into a master template and its nested stacks.
    RenderTemplates {
        /// Master template; nested stacks are found through their TemplateURL.
        #[arg(long)]
        master: PathBuf,

        /// Directory receiving the processed templates.
        #[arg(long)]
        out_dir: PathBuf,

        /// JSON object supplying `{{ NAME }}` values.
        #[arg(long)]
        vars: PathBuf,

        /// Common tag applied to taggable resources. Repeatable.
        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<Tag>,

        /// Resource type receiving common tags. Repeatable; defaults to the standard list.
        #[arg(long = "resource-type", value_name = "TYPE")]
        resource_types: Vec<ResourceType>,
    },

    /// Inspect or dump the centralised config.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// `config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config with hidden values masked.
    Show(ConfigArgs),

    /// Validate the config and write the final file of each tool.
    Dump {
        #[command(flatten)]
        args: ConfigArgs,

        /// Tool to dump for. Repeatable; defaults to every tool.
        #[arg(long = "tool", value_name = "TOOL")]
        tools: Vec<DeployTool>,
    },
}

/// Location of the config dir and its schema.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Directory holding config-raw.json and the final config files.
    #[arg(long, env = "DEVOPS_CONFIG_DIR")]
    pub config_dir: PathBuf,

    /// Schema file; defaults to config-schema.json in the config dir.
    #[arg(long, env = "DEVOPS_CONFIG_SCHEMA")]
    pub schema: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self, store: &dyn FileStore) -> anyhow::Result<Config> {
        let schema_path = self
            .schema
            .clone()
            .unwrap_or_else(|| self.config_dir.join(SCHEMA_FILE));
        let schema = SchemaFile::load(store, &schema_path)
            .with_context(|| format!("loading schema {}", schema_path.display()))?
            .into_schema();

        let mut config = Config::new(schema).with_config_dir(&self.config_dir);
        config
            .update_from_raw_file(store)
            .with_context(|| format!("loading raw config from {}", self.config_dir.display()))?;
        Ok(config)
    }
}

/// Executes `command`, writing its output to `out`.
pub fn run(command: Command, store: &dyn FileStore, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::JsonValue { file, path } => {
            let value = read_json_value(store, &file, &path)?;
            writeln!(out, "{}", display_value(&value)?)?;
        }
        Command::CfParameterOverrides { template, config } => {
            let overrides = load_parameter_overrides(store, &template, &config)?;
            writeln!(out, "{}", format_overrides(&overrides))?;
        }
        Command::RenderTemplates {
            master,
            out_dir,
            vars,
            tags,
            resource_types,
        } => {
            let variables = load_variables(store, &vars)?;
            let resource_types = if resource_types.is_empty() {
                default_taggable_resource_types()
            } else {
                resource_types
            };
            let written = render_stack_templates(
                store,
                &master,
                &out_dir,
                &variables,
                &tags,
                &resource_types,
            )
            .with_context(|| format!("rendering templates from {}", master.display()))?;
            for path in written {
                writeln!(out, "{}", path.display())?;
            }
        }
        Command::Config { action } => run_config(action, store, out)?,
    }
    Ok(())
}

fn run_config(
    action: ConfigCommand,
    store: &dyn FileStore,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        ConfigCommand::Show(args) => {
            let config = args.load(store)?;
            writeln!(out, "{config}")?;
        }
        ConfigCommand::Dump { args, tools } => {
            let config = args.load(store)?;
            config.validate()?;
            let tools = if tools.is_empty() {
                DeployTool::ALL.to_vec()
            } else {
                tools
            };
            for tool in tools {
                let path = config.dump(store, tool)?;
                writeln!(out, "{}", path.display())?;
            }
        }
    }
    Ok(())
}

fn load_variables(store: &dyn FileStore, path: &Path) -> anyhow::Result<Map<String, Value>> {
    match read_jsonc(store, path)? {
        Value::Object(map) => Ok(map),
        _ => bail!("variables file {} must contain a JSON object", path.display()),
    }
}

/// Strings and scalars print raw; objects and arrays print as indented JSON.
fn display_value(value: &Value) -> anyhow::Result<String> {
    Ok(match value {
        Value::Object(_) | Value::Array(_) => to_pretty_json(value)?,
        scalar => render_scalar(scalar),
    })
}
