//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};

/// Default server address
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

/// Medsent CLI - Analyze the sentiment of medical claims.
#[derive(Debug, Parser)]
#[command(name = "medsent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server URL
    #[arg(short, long, global = true, env = "MEDSENT_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a medical claim
    Predict(PredictArgs),

    /// Check that the server can serve predictions
    Status,
}

/// Arguments for the predict command.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Claim text
    pub text: String,
}
