//! Medsent CLI library.
//!
//! This library provides the core functionality for the Medsent command-line
//! interface: argument parsing, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
