//! Medsent CLI - Command-line client for the Medsent sentiment service.

use clap::Parser;
use medsent_cli::commands;
use medsent_cli::{Cli, Command, Formatter};
use medsent_sdk::SentimentClient;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> medsent_cli::Result<()> {
    let cli = Cli::parse();

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);
    let client = SentimentClient::new(&cli.url);

    match cli.command {
        Command::Predict(args) => commands::execute_predict(args, &client, &formatter).await?,
        Command::Status => commands::execute_status(&client, &formatter).await?,
    }

    Ok(())
}
