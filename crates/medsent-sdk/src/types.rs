//! Wire types of the sentiment API.

use serde::{Deserialize, Serialize};

/// Named entity found in a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityResult {
    /// Matched span
    pub text: String,
    /// Entity type
    pub label: String,
}

/// One sentiment verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Claim as submitted
    #[serde(rename = "Sentiment_Text")]
    pub text: String,

    /// Predicted label
    #[serde(rename = "Sentiment_Prediction")]
    pub prediction: String,

    /// Confidence in the label
    #[serde(rename = "Sentiment_Score")]
    pub score: f64,

    /// Entities, absent when the server could not extract them
    #[serde(
        rename = "NER_Results",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entities: Option<Vec<EntityResult>>,

    /// Stored record id, absent when the server could not store the verdict
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// What the server made of a prediction request
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// Verdicts for the claim
    Verdicts(Vec<Verdict>),
    /// The server saw no usable claim (HTTP 400)
    MissingClaim(String),
    /// The server reported an internal fault
    Exception(String),
}

/// Server health report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Prediction endpoint the server probed
    #[serde(rename = "Server_Running_Address")]
    pub running_address: String,

    /// Server host
    #[serde(rename = "Server_host")]
    pub host: String,

    /// Server port
    #[serde(rename = "Server_port")]
    pub port: u16,

    /// "Success" or "Failed"
    #[serde(rename = "Server_Status")]
    pub status: String,

    /// Status code of the probe, `None` if it never completed
    #[serde(rename = "Server_status_code")]
    pub status_code: Option<u16>,
}

impl StatusReport {
    /// Whether the server could reach its own prediction endpoint
    pub fn is_success(&self) -> bool {
        self.status == "Success"
    }
}
