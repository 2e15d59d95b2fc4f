//! devops-tools CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse arguments** — clap derive definitions in [`commands`].
//! 2. **Wire observability** — install a `tracing-subscriber` writing plain or
//!    JSON lines to stderr; every crate's spans and events flow through it.
//! 3. **Construct infrastructure** — a [`storage::LocalFileStore`] rooted at the
//!    working directory, injected into every command.
//! 4. **Dispatch** — run the selected command and print its result to stdout;
//!    a failure is reported once, by `main` returning the error chain.

mod commands;
mod logging;

use clap::Parser;
use storage::LocalFileStore;
use toolkit::InvocationId;

use crate::commands::Command;
use crate::logging::LogFormat;

/// Devops helpers for centralised config and CloudFormation templates.
#[derive(Debug, Parser)]
#[command(name = "devops-tools", version)]
struct Cli {
    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose)?;

    let invocation = InvocationId::new_random();
    let span = tracing::info_span!("invocation", id = %invocation);
    let _entered = span.enter();

    let store = LocalFileStore::new()?;
    tracing::debug!(base = %store.base().display(), "file store ready");

    let stdout = std::io::stdout();
    commands::run(cli.command, &store, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ConfigCommand;
    use clap::CommandFactory;
    use devops_config::DeployTool;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_templates() {
        let cli = Cli::try_parse_from([
            "devops-tools",
            "-vv",
            "render-templates",
            "--master",
            "cf/99-master.json",
            "--out-dir",
            "build",
            "--vars",
            "config-final-for-shell-script.json",
            "--tag",
            "Stage=dev",
            "--tag",
            "Project=demo",
            "--resource-type",
            "AWS::EC2::VPC",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::RenderTemplates {
                tags,
                resource_types,
                ..
            } => {
                assert_eq!(tags.len(), 2);
                assert_eq!(tags[1].key, "Project");
                assert_eq!(resource_types[0].as_str(), "AWS::EC2::VPC");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_dump() {
        let cli = Cli::try_parse_from([
            "devops-tools",
            "config",
            "dump",
            "--config-dir",
            "devops",
            "--tool",
            "cloudformation",
            "--tool",
            "shell-script",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Config {
                action: ConfigCommand::Dump { args, tools },
            } => {
                assert_eq!(args.config_dir, std::path::PathBuf::from("devops"));
                assert_eq!(tools, [DeployTool::CloudFormation, DeployTool::ShellScript]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_tags() {
        let parsed = Cli::try_parse_from([
            "devops-tools",
            "render-templates",
            "--master",
            "m.json",
            "--out-dir",
            "out",
            "--vars",
            "v.json",
            "--tag",
            "no-equals-sign",
        ]);
        assert!(parsed.is_err());
    }
}
