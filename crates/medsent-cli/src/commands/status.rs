//! Status command implementation.

use crate::error::Result;
use crate::output::Formatter;
use medsent_sdk::SentimentClient;

/// Execute the status command.
pub async fn execute_status(client: &SentimentClient, formatter: &Formatter) -> Result<()> {
    let report = client.check_status().await?;
    println!("{}", formatter.format_status(&report)?);
    Ok(())
}
