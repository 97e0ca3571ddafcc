//! Configuration file parsing for the sentiment server.
//!
//! Loads settings from TOML files including bind address, model artifact
//! paths, the keyword trigger list and request limits.

use axum::http::{HeaderValue, StatusCode};
use medsent_domain::DEFAULT_TRIGGERS;
use medsent_model::ModelPaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Status code used when a prediction fails internally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// Report the failure in a 200 response
    #[default]
    Inline,
    /// Report the failure as a 500
    ServerError,
}

impl ErrorStatusPolicy {
    /// HTTP status for an internal fault under this policy
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorStatusPolicy::Inline => StatusCode::OK,
            ErrorStatusPolicy::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Keyword override settings
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordsConfig {
    /// Trigger words forcing a positive verdict
    #[serde(default = "default_triggers")]
    pub triggers: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            triggers: default_triggers(),
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// SQLite database file (`:memory:` for a throwaway store)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Where the health check writes its report, if anywhere
    #[serde(default)]
    pub status_file: Option<PathBuf>,

    /// Upper bound on one prediction pipeline run
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout of the health check's self-request
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Status code policy for internal faults
    #[serde(default)]
    pub error_status_policy: ErrorStatusPolicy,

    /// Origins allowed by CORS (`*` for any)
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    /// Model artifact paths
    pub models: ModelPaths,

    /// Keyword override settings
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("medsent.db")
}

fn default_request_timeout() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_triggers() -> Vec<String> {
    DEFAULT_TRIGGERS.iter().map(|t| t.to_string()).collect()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let model_paths = [
            ("models.vectorizer_path", &self.models.vectorizer_path),
            ("models.classifier_path", &self.models.classifier_path),
            ("models.entity_model_path", &self.models.entity_model_path),
        ];
        for (field, path) in model_paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }

        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be greater than zero"));
        }
        if self.probe_timeout_secs == 0 {
            return Err(invalid("probe_timeout_secs", "must be greater than zero"));
        }

        for origin in &self.cors_allowed_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                return Err(invalid(
                    "cors_allowed_origins",
                    &format!("'{}' is not a valid origin", origin),
                ));
            }
        }

        Ok(())
    }

    /// Create a default configuration for local development
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            database_path: default_database_path(),
            status_file: None,
            request_timeout_secs: default_request_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            error_status_policy: ErrorStatusPolicy::Inline,
            cors_allowed_origins: default_cors_origins(),
            models: ModelPaths {
                vectorizer_path: PathBuf::from("models/vectorizer.json"),
                classifier_path: PathBuf::from("models/classifier.json"),
                entity_model_path: PathBuf::from("models/entities.json"),
            },
            keywords: KeywordsConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Pipeline timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Health probe timeout as a duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
