//! Medsent Server
//!
//! HTTP front of the medical claim sentiment service. Exposes
//! `POST /Predict_Sentiment` and `GET /Check_Server_status`, wiring the
//! model artifacts, the keyword override rule and the SQLite store into one
//! prediction pipeline.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod health;
pub mod pipeline;

#[cfg(test)]
mod testing;

use config::ServerConfig;
use handlers::{create_router, AppState};
use health::HealthProbe;
use medsent_domain::{DecisionEngine, KeywordError, KeywordRule};
use medsent_model::{ModelBundle, ModelError};
use medsent_store::{SqliteStore, StoreError};
use pipeline::{SentimentService, SharedSink};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Model artifacts could not be loaded
    #[error("Failed to load models: {0}")]
    Model(#[from] ModelError),

    /// Keyword triggers are unusable
    #[error("Invalid keyword triggers: {0}")]
    Keywords(#[from] KeywordError),

    /// Verdict store could not be opened
    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),

    /// Health probe client could not be built
    #[error("Failed to build health probe: {0}")]
    Probe(#[from] reqwest::Error),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Load models and open the store named by `config`
pub fn build_service(config: &ServerConfig) -> Result<SentimentService, ServerError> {
    let bundle = ModelBundle::load(&config.models)?;

    let rule = KeywordRule::new(config.keywords.triggers.clone())?;
    info!("Keyword triggers: {:?}", rule.triggers());

    info!("Opening verdict store at {}", config.database_path.display());
    let sink: SharedSink = Arc::new(Mutex::new(SqliteStore::new(&config.database_path)?));

    Ok(SentimentService::from_bundle(
        bundle,
        sink,
        DecisionEngine::new(rule),
    ))
}

/// Assemble handler state for `service` under `config`
pub fn build_state(
    config: &ServerConfig,
    service: SentimentService,
) -> Result<AppState, ServerError> {
    let probe = HealthProbe::new(
        config.bind_address.clone(),
        config.bind_port,
        config.probe_timeout(),
        config.status_file.clone(),
    )?;

    Ok(AppState {
        service,
        probe: Arc::new(probe),
        request_timeout: config.request_timeout(),
        error_policy: config.error_status_policy,
        cors_allowed_origins: config.cors_allowed_origins.clone(),
    })
}

/// Serve `state` on an already bound listener until the server stops
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    let app = create_router(state);
    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}

/// Start the sentiment HTTP server
///
/// Validates configuration, loads the models, opens the store and serves
/// until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting Medsent server");
    info!("Bind address: {}", config.bind_addr());
    info!("Request timeout: {} seconds", config.request_timeout_secs);
    info!("Error status policy: {:?}", config.error_status_policy);

    let service = build_service(&config)?;
    let state = build_state(&config, service)?;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    serve(listener, state).await
}
