// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;
mod config;
mod errors;
mod logging;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing::{debug, error};

use crate::commands::OutputFormat;
use crate::config::GoLiveConfig;
use crate::errors::{CliError, ExitCode};

#[derive(Parser)]
#[command(name = "wasla-golive")]
#[command(about = "Wasla go-live readiness checks")]
#[command(version)]
struct Cli {
    /// SQLite database path; overrides WASLA_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Probe catalog TOML; overrides WASLA_GO_LIVE_CATALOG.
    #[arg(long = "probe-catalog", global = true)]
    probe_catalog: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply schema migrations, then run the startup check.
    Migrate,
    /// Run the post-migration startup check; never fails the process.
    Startup,
    /// Check one tenant or every tenant for launch readiness.
    Check {
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        tenant: Option<String>,
        #[arg(long, default_value_t = false)]
        all: bool,
        #[arg(long, value_enum, default_value_t = FormatCli::Text)]
        format: FormatCli,
    },
    Probes {
        #[command(subcommand)]
        command: ProbesCommand,
    },
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    Tenant {
        #[command(subcommand)]
        command: TenantCommand,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatCli {
    Text,
    Json,
    Jsonl,
}

impl From<FormatCli> for OutputFormat {
    fn from(value: FormatCli) -> Self {
        match value {
            FormatCli::Text => Self::Text,
            FormatCli::Json => Self::Json,
            FormatCli::Jsonl => Self::Jsonl,
        }
    }
}

#[derive(Subcommand)]
enum ProbesCommand {
    List,
    Explain { id: String },
}

#[derive(Subcommand)]
enum CatalogCommand {
    Validate { path: PathBuf },
    /// Validate and report entries without a builtin probe.
    Doctor { path: PathBuf },
}

#[derive(Subcommand)]
enum TenantCommand {
    /// Import or replace a tenant from a JSON fixture.
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    List,
}

fn main() -> ProcessExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = parse_error_exit_code(err.use_stderr(), err.print());
            return ProcessExitCode::from(code as u8);
        }
    };

    let mut config = GoLiveConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(path) = cli.probe_catalog {
        config.catalog_path = Some(path);
    }
    config.log_json |= cli.log_json;
    logging::init_tracing(config.log_json);

    let code = match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            error!(error_code = code.as_str(), detail = %err, "wasla_golive_command_failed");
            eprintln!("{err}");
            code
        }
    };
    debug!(exit_code = code.as_str(), "wasla_golive_exit");
    ProcessExitCode::from(code as u8)
}

/// `--help` and `--version` exit 0; real parse errors and failed writes do not.
fn parse_error_exit_code(use_stderr: bool, printed: std::io::Result<()>) -> ExitCode {
    match printed {
        Err(_) => ExitCode::Internal,
        Ok(()) if use_stderr => ExitCode::Usage,
        Ok(()) => ExitCode::Success,
    }
}

fn run(command: Commands, config: &GoLiveConfig) -> Result<ExitCode, CliError> {
    match command {
        Commands::Migrate => commands::migrate(config),
        Commands::Startup => commands::startup(config),
        Commands::Check {
            tenant,
            all,
            format,
        } => commands::check(config, tenant.as_deref(), all, format.into()),
        Commands::Probes { command } => match command {
            ProbesCommand::List => commands::probes_list(config),
            ProbesCommand::Explain { id } => commands::probes_explain(config, &id),
        },
        Commands::Catalog { command } => match command {
            CatalogCommand::Validate { path } => commands::catalog_validate(&path),
            CatalogCommand::Doctor { path } => commands::catalog_doctor_cmd(&path),
        },
        Commands::Tenant { command } => match command {
            TenantCommand::Import { file } => commands::tenant_import(config, &file),
            TenantCommand::List => commands::tenant_list(config),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn parse_errors_map_to_exit_codes() {
        assert_eq!(parse_error_exit_code(false, Ok(())), ExitCode::Success);
        assert_eq!(parse_error_exit_code(true, Ok(())), ExitCode::Usage);
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(parse_error_exit_code(false, Err(broken)), ExitCode::Internal);
    }

    #[test]
    fn help_request_is_not_a_usage_error() {
        let err = match Cli::try_parse_from(["wasla-golive", "--help"]) {
            Ok(_) => panic!("help should short-circuit parsing"),
            Err(err) => err,
        };
        assert!(!err.use_stderr());
        let err = match Cli::try_parse_from(["wasla-golive", "--bogus"]) {
            Ok(_) => panic!("unknown flag should fail"),
            Err(err) => err,
        };
        assert!(err.use_stderr());
    }
}
