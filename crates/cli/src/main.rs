// notcore-dedup - duplicate check for individual registration batches

mod check;
mod exit_codes;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{dedup_exit_code, EXIT_MALFORMED_INPUT, EXIT_SUCCESS, EXIT_USAGE};
use notcore_dedup::DedupError;

#[derive(Parser)]
#[command(name = "notcore-dedup")]
#[command(about = "Find duplicate individuals in a registration batch")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a batch for duplicates within itself and against existing records
    #[command(after_help = "\
Examples:
  notcore-dedup check registration.dedup.toml --input batch.csv
  notcore-dedup check registration.dedup.toml --input batch.csv --existing individuals.csv
  notcore-dedup check registration.dedup.toml --input batch.csv --json
  notcore-dedup check registration.dedup.toml --input batch.csv --locale fr --output report.json")]
    Check {
        /// Path to the .dedup.toml config file
        config: PathBuf,

        /// Batch CSV; first line is the header
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Already-registered individuals as CSV, keyed by the `id` column
        #[arg(long)]
        existing: Option<PathBuf>,

        /// Output the JSON report to stdout instead of the diagnostics
        #[arg(long)]
        json: bool,

        /// Write the JSON report to file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Message language, overriding report.locale
        #[arg(long, env = "NOTCORE_LOCALE")]
        locale: Option<String>,

        /// Message catalog TOML to use instead of a built-in language
        #[arg(long, conflicts_with = "locale")]
        catalog: Option<PathBuf>,
    },

    /// Validate a dedup config without running
    #[command(after_help = "\
Examples:
  notcore-dedup validate registration.dedup.toml")]
    Validate {
        /// Path to the .dedup.toml config file
        config: PathBuf,
    },

    /// List the deduplication types a config may name
    Types {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check { config, input, existing, json, output, locale, catalog } => {
            check::cmd_check(check::CheckArgs {
                config,
                input,
                existing,
                json,
                output,
                locale,
                catalog,
            })
        }
        Commands::Validate { config } => check::cmd_validate(config),
        Commands::Types { json } => check::cmd_types(json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::new(EXIT_MALFORMED_INPUT, msg)
    }

    /// Engine error with the exit code its kind maps to.
    pub fn dedup(err: DedupError) -> Self {
        let hint = match &err {
            DedupError::UnknownDeduplicationType(_) => {
                Some("run `notcore-dedup types` to list valid names".to_string())
            }
            DedupError::UnknownColumn(column) | DedupError::UnknownField(column) => {
                Some(format!("add a '{column}' column to the input"))
            }
            _ => None,
        };
        Self { code: dedup_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
