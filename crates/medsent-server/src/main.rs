//! Medsent Server CLI
//!
//! Starts the sentiment HTTP server.

use clap::Parser;
use medsent_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Medsent - Medical claim sentiment service
#[derive(Parser, Debug)]
#[command(name = "medsent-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Load configuration from a TOML file
    #[arg(short, long, env = "MEDSENT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let config = match args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            warn!("No config file specified, using default development configuration");
            warn!("Usage: medsent-server --config <path-to-config.toml>");
            ServerConfig::default_test_config()
        }
    };

    start_server(config).await
}
