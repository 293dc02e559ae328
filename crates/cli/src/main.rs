// namelink - link baseline and endline records by fuzzy name matching

mod exit_codes;
mod link;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

/// Input read when no path is given.
pub const DEFAULT_INPUT: &str = "Name matching.csv";

#[derive(Parser)]
#[command(name = "namelink")]
#[command(about = "Link baseline and endline records by fuzzy name matching")]
#[command(version, long_version = long_version())]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "\
Examples:
  namelink
  namelink survey.csv
  namelink survey.csv --threshold 90 --output linked.csv
  namelink survey.xlsx --config study.namelink.toml --json
  namelink detect survey.xlsx")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which column would be used as the name key, and why
    #[command(after_help = "\
Examples:
  namelink detect
  namelink detect survey.xlsx --json")]
    Detect {
        /// Input file (CSV, TSV or Excel)
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// TOML config file
        #[arg(long, short = 'c', env = "NAMELINK_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

// Arguments for the default run: link records in INPUT and append the identifier column.
#[derive(Args)]
pub struct RunArgs {
    /// Input file (CSV, TSV or Excel)
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// TOML config file
    #[arg(long, short = 'c', env = "NAMELINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum similarity (0-100) for two names to link
    #[arg(long, short = 't')]
    pub threshold: Option<f64>,

    /// Use this column as the name key instead of detecting one
    #[arg(long)]
    pub name_column: Option<String>,

    /// Output file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output format (default: from the output extension)
    #[arg(long, short = 'f')]
    pub format: Option<Format>,

    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Format {
    Xlsx,
    Csv,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("NAMELINK_COMMIT"), ")",
        "\nengine:  namelink-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("NAMELINK_TARGET"),
    )
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Detect { input, config, json }) => {
            init_tracing(true);
            link::cmd_detect(input, config, json)
        }
        None => {
            init_tracing(cli.run.quiet);
            link::cmd_run(cli.run)
        }
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

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
