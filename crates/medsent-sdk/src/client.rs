//! Medsent client implementation.

use crate::error::SdkError;
use crate::types::{PredictOutcome, StatusReport, Verdict};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

const EXCEPTION_FIELD: &str = "Exception Occurred";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Medsent SDK client
#[derive(Debug, Clone)]
pub struct SentimentClient {
    base_url: String,
    http: reqwest::Client,
}

impl SentimentClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client that sends requests through `http`
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analyze one medical claim
    pub async fn predict(&self, text: &str) -> Result<PredictOutcome, SdkError> {
        let url = format!("{}/Predict_Sentiment", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "Medical_Claim": text }))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::BAD_REQUEST {
            let error: ErrorBody = serde_json::from_slice(&body)?;
            return Ok(PredictOutcome::MissingClaim(error.error));
        }

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            if status.is_success() {
                SdkError::from(e)
            } else {
                SdkError::ServerError(format!("HTTP {}", status))
            }
        })?;

        interpret_predict_body(status, value)
    }

    /// Ask the server to probe itself
    pub async fn check_status(&self) -> Result<StatusReport, SdkError> {
        let url = format!("{}/Check_Server_status", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

fn interpret_predict_body(status: StatusCode, value: Value) -> Result<PredictOutcome, SdkError> {
    if let Some(message) = value.get(EXCEPTION_FIELD) {
        let message = match message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Ok(PredictOutcome::Exception(message));
    }

    if !status.is_success() {
        return Err(SdkError::ServerError(format!("HTTP {}: {}", status, value)));
    }

    let verdicts: Vec<Verdict> = serde_json::from_value(value)?;
    Ok(PredictOutcome::Verdicts(verdicts))
}
