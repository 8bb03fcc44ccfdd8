//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pipeline Runner - config-driven orchestrator for ML pipeline steps
#[derive(Parser, Debug)]
#[command(
    name = "pipeline-runner",
    author,
    version,
    about = "Config-driven ML pipeline orchestrator",
    long_about = "Runs the selected steps of a tabular ML pipeline (download, cleaning, \n\
                  data checks, split, random forest training, model test) as external \n\
                  mlflow runs, in a fixed order, under one tracking project and run group."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PIPELINE_RUNNER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PIPELINE_RUNNER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log level derived from `-q` / `-v`
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information and the dispatch plan
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (YAML, TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.yaml",
        env = "PIPELINE_RUNNER_CONFIG"
    )]
    pub config: PathBuf,

    /// Print the invocations that would be submitted and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for rf_config.json (defaults to the current directory)
    #[arg(long, env = "PIPELINE_RUNNER_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// mlflow executable
    #[arg(long, default_value = "mlflow", env = "MLFLOW_BIN")]
    pub mlflow_bin: PathBuf,

    /// Environment manager passed to `mlflow run` (conda, virtualenv, local)
    #[arg(long, env = "MLFLOW_ENV_MANAGER")]
    pub env_manager: Option<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "PIPELINE_RUNNER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Configuration overrides, e.g. `main.steps=download` or `+modeling.random_forest.max_depth=15`
    #[arg(value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,

    /// Configuration overrides
    #[arg(value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the full step table
    #[arg(long)]
    pub steps: bool,

    /// Configuration overrides
    #[arg(value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
