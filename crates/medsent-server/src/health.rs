//! Self-probing health check.
//!
//! The server answers `/Check_Server_status` by sending a real prediction
//! request to its own advertised address, so a green report means the whole
//! pipeline is reachable over HTTP.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Claim text sent by the probe
pub const PROBE_CLAIM: &str = "Test claim for health check.";

/// Outcome of one health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Prediction endpoint that was probed
    #[serde(rename = "Server_Running_Address")]
    pub running_address: String,

    /// Advertised host
    #[serde(rename = "Server_host")]
    pub host: String,

    /// Advertised port
    #[serde(rename = "Server_port")]
    pub port: u16,

    /// "Success" or "Failed"
    #[serde(rename = "Server_Status")]
    pub status: String,

    /// Probe response status, `None` when the request never completed
    #[serde(rename = "Server_status_code")]
    pub status_code: Option<u16>,
}

impl StatusReport {
    /// Whether the probe got a 200
    pub fn is_success(&self) -> bool {
        self.status_code == Some(200)
    }
}

/// Issues probe requests against the server's own address
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: reqwest::Client,
    host: String,
    port: u16,
    status_file: Option<PathBuf>,
}

impl HealthProbe {
    /// Create a probe for `host:port` with the given request timeout
    pub fn new(
        host: impl Into<String>,
        port: u16,
        timeout: Duration,
        status_file: Option<PathBuf>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            host: host.into(),
            port,
            status_file,
        })
    }

    /// URL of the prediction endpoint being probed
    pub fn predict_url(&self) -> String {
        format!("http://{}:{}/Predict_Sentiment", self.host, self.port)
    }

    /// Probe once and record the result
    pub async fn check(&self) -> StatusReport {
        let url = self.predict_url();
        let status_code = match self
            .client
            .post(&url)
            .json(&serde_json::json!({ "Medical_Claim": PROBE_CLAIM }))
            .send()
            .await
        {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                warn!("Health probe to {} failed: {}", url, e);
                None
            }
        };

        let report = StatusReport {
            running_address: url,
            host: self.host.clone(),
            port: self.port,
            status: if status_code == Some(200) {
                "Success".to_string()
            } else {
                "Failed".to_string()
            },
            status_code,
        };
        info!("Health check: {} ({:?})", report.status, report.status_code);

        self.write_status_file(&report).await;
        report
    }

    async fn write_status_file(&self, report: &StatusReport) {
        let Some(path) = &self.status_file else {
            return;
        };

        let json = match serde_json::to_vec(report) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode status report: {}", e);
                return;
            }
        };

        if let Err(e) = tokio::fs::write(path, json).await {
            warn!("Failed to write status file {}: {}", path.display(), e);
        }
    }
}
