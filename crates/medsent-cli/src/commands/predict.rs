//! Predict command implementation.

use crate::cli::PredictArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use medsent_sdk::{PredictOutcome, SentimentClient};

/// Execute the predict command.
pub async fn execute_predict(
    args: PredictArgs,
    client: &SentimentClient,
    formatter: &Formatter,
) -> Result<()> {
    let text = claim_text(&args)?;
    let output = render_outcome(client.predict(text).await?, formatter)?;
    println!("{}", output);
    Ok(())
}

/// The claim exactly as typed; blank input never reaches the server.
fn claim_text(args: &PredictArgs) -> Result<&str> {
    if args.text.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "Claim text must not be empty".to_string(),
        ));
    }
    Ok(&args.text)
}

/// Turn a prediction outcome into printable output.
fn render_outcome(outcome: PredictOutcome, formatter: &Formatter) -> Result<String> {
    match outcome {
        PredictOutcome::Verdicts(verdicts) => formatter.format_verdicts(&verdicts),
        PredictOutcome::MissingClaim(message) => Err(CliError::InvalidInput(message)),
        PredictOutcome::Exception(message) => Err(CliError::RequestFailed(message)),
    }
}
