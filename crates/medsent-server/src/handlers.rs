//! HTTP request handlers for the sentiment service.
//!
//! Implements the prediction and server status endpoints using axum.

use crate::config::ErrorStatusPolicy;
use crate::health::{HealthProbe, StatusReport};
use crate::pipeline::{PipelineError, PredictionOutcome, SentimentService};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use medsent_domain::Claim;
use medsent_store::VerdictDocument;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, error};

/// JSON field carrying the claim text
pub const CLAIM_FIELD: &str = "Medical_Claim";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline
    pub service: SentimentService,
    /// Self-probe used by the status endpoint
    pub probe: Arc<HealthProbe>,
    /// Upper bound on one pipeline run
    pub request_timeout: Duration,
    /// Status code policy for internal faults
    pub error_policy: ErrorStatusPolicy,
    /// Origins allowed by CORS
    pub cors_allowed_origins: Vec<String>,
}

/// One verdict as returned by `/Predict_Sentiment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictBody {
    /// Text, label, score and entities
    #[serde(flatten)]
    pub document: VerdictDocument,

    /// Stored record id, absent when persistence failed
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl From<&PredictionOutcome> for VerdictBody {
    fn from(outcome: &PredictionOutcome) -> Self {
        Self {
            document: VerdictDocument::from(&outcome.verdict),
            id: outcome.record_id.map(|id| id.to_string()),
        }
    }
}

/// Client error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Internal fault response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExceptionResponse {
    /// Fault description
    #[serde(rename = "Exception Occurred")]
    pub message: String,
}

/// Why a prediction request produced no verdict
#[derive(Debug, Error)]
pub enum PredictError {
    /// Claim field absent or blank
    #[error("Missing Medical Claims Request")]
    MissingClaim,

    /// Body is not usable JSON
    #[error("{0}")]
    InvalidBody(String),

    /// Pipeline fault
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl PredictError {
    /// Render the error, choosing the status of internal faults by `policy`
    pub fn into_response_with(self, policy: ErrorStatusPolicy) -> Response {
        if let PredictError::MissingClaim = self {
            debug!("Rejected request without a claim");
            let body = Json(ErrorResponse {
                error: self.to_string(),
            });
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        error!("Prediction failed: {}", self);
        let body = Json(ExceptionResponse {
            message: self.to_string(),
        });
        (policy.status_code(), body).into_response()
    }
}

/// Extract the claim from a raw request body
///
/// The body is parsed as JSON regardless of its content type.
pub fn parse_claim(body: &[u8]) -> Result<Claim, PredictError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| PredictError::InvalidBody(format!("Invalid JSON body: {}", e)))?;

    match value.get(CLAIM_FIELD) {
        None => Err(PredictError::MissingClaim),
        Some(serde_json::Value::String(text)) => {
            Claim::new(text.as_str()).map_err(|_| PredictError::MissingClaim)
        }
        Some(other) => Err(PredictError::InvalidBody(format!(
            "{} must be a string, got {}",
            CLAIM_FIELD, other
        ))),
    }
}

async fn predict(state: &AppState, body: &[u8]) -> Result<Vec<VerdictBody>, PredictError> {
    let claim = parse_claim(body)?;
    let outcome = state.service.run(claim, state.request_timeout).await?;
    Ok(vec![VerdictBody::from(&outcome)])
}

/// POST /Predict_Sentiment - Analyze one medical claim
async fn predict_sentiment(State(state): State<AppState>, body: Bytes) -> Response {
    match predict(&state, &body).await {
        Ok(verdicts) => Json(verdicts).into_response(),
        Err(e) => e.into_response_with(state.error_policy),
    }
}

/// GET /Check_Server_status - Probe the prediction endpoint over HTTP
async fn check_server_status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.probe.check().await)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        ))
    }
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let cors = cors_layer(&state.cors_allowed_origins);
    AxumRouter::new()
        .route("/Predict_Sentiment", post(predict_sentiment))
        .route("/Check_Server_status", get(check_server_status))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{engine, MemorySink};
    use axum::body::Body;
    use axum::http::Request;
    use medsent_model::{MockClassifier, MockEntityExtractor, MockVectorizer};
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let service = SentimentService::new(
            Arc::new(MockVectorizer::new(4)),
            Arc::new(MockClassifier::new(&[("negative", 0.25), ("positive", 0.75)]).unwrap()),
            Arc::new(MockEntityExtractor::default()),
            MemorySink::shared(),
            engine(),
        );
        AppState {
            service,
            probe: Arc::new(
                HealthProbe::new("127.0.0.1", 1, Duration::from_secs(1), None).unwrap(),
            ),
            request_timeout: Duration::from_secs(5),
            error_policy: ErrorStatusPolicy::Inline,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }

    fn post_predict(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/Predict_Sentiment")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_parse_claim() {
        assert_eq!(
            parse_claim(br#"{"Medical_Claim": "fine"}"#).unwrap().text(),
            "fine"
        );
        assert!(matches!(
            parse_claim(br#"{"claim": "fine"}"#),
            Err(PredictError::MissingClaim)
        ));
        assert!(matches!(
            parse_claim(br#"{"Medical_Claim": "   "}"#),
            Err(PredictError::MissingClaim)
        ));
        assert!(matches!(
            parse_claim(br#"["Medical_Claim"]"#),
            Err(PredictError::MissingClaim)
        ));
        assert!(matches!(
            parse_claim(br#"{"Medical_Claim": 42}"#),
            Err(PredictError::InvalidBody(_))
        ));
        assert!(matches!(
            parse_claim(b"not json"),
            Err(PredictError::InvalidBody(_))
        ));
    }

    #[tokio::test]
    async fn test_predict_success() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_predict(r#"{"Medical_Claim": "Stable after surgery."}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let verdicts = json.as_array().unwrap();
        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0]["Sentiment_Text"], "Stable after surgery.");
        assert_eq!(verdicts[0]["Sentiment_Prediction"], "positive");
        assert_eq!(verdicts[0]["Sentiment_Score"], 0.75);
        assert_eq!(verdicts[0]["NER_Results"], serde_json::json!([]));
        assert_eq!(verdicts[0]["_id"].as_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_missing_claim() {
        let app = create_router(create_test_state());

        let response = app.oneshot(post_predict(r#"{}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Missing Medical Claims Request"})
        );
    }

    #[tokio::test]
    async fn test_invalid_json_is_inline_exception() {
        let app = create_router(create_test_state());

        let response = app.oneshot(post_predict("{broken")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["Exception Occurred"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/Predict_Sentiment")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn test_cors_origin_list() {
        let mut state = create_test_state();
        state.cors_allowed_origins = vec!["http://dashboard.local".to_string()];
        let app = create_router(state);

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/Predict_Sentiment")
            .header("origin", "http://dashboard.local")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            HeaderValue::from_static("http://dashboard.local")
        );
    }
}
