//! Integration tests for the sentiment server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use medsent_domain::traits::{PersistenceSink, Vectorizer};
use medsent_domain::{
    DecisionEngine, EntityMention, FeatureVector, KeywordRule, RecordId, SentimentVerdict,
};
use medsent_model::{MockClassifier, MockEntityExtractor, MockVectorizer, ModelError};
use medsent_server::{
    build_state, serve,
    config::{ErrorStatusPolicy, ServerConfig},
    handlers::{create_router, AppState, VerdictBody},
    health::StatusReport,
    pipeline::{SentimentService, SharedSink, SharedVectorizer},
};
use medsent_store::{SqliteStore, StoreError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt; // for oneshot

/// Sink that rejects every insert
struct OfflineSink;

impl PersistenceSink for OfflineSink {
    type Error = StoreError;

    fn insert(&mut self, _verdict: &SentimentVerdict) -> Result<RecordId, Self::Error> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Vectorizer that takes longer than any test timeout
struct SlowVectorizer;

impl Vectorizer for SlowVectorizer {
    type Error = ModelError;

    fn transform(&self, _text: &str) -> Result<FeatureVector, Self::Error> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(FeatureVector::zeros(1))
    }

    fn dimension(&self) -> usize {
        1
    }
}

/// Vectorizer that panics
struct PanickingVectorizer;

impl Vectorizer for PanickingVectorizer {
    type Error = ModelError;

    fn transform(&self, _text: &str) -> Result<FeatureVector, Self::Error> {
        panic!("vectorizer exploded")
    }

    fn dimension(&self) -> usize {
        1
    }
}

struct Fixture {
    vectorizer: SharedVectorizer,
    classifier: MockClassifier,
    extractor: MockEntityExtractor,
    sink: SharedSink,
    config: ServerConfig,
}

impl Fixture {
    fn new() -> Self {
        let mut config = ServerConfig::default_test_config();
        config.bind_port = 1;
        Self {
            vectorizer: Arc::new(MockVectorizer::new(4)),
            classifier: MockClassifier::new(&[("negative", 0.6789), ("positive", 0.3211)])
                .unwrap(),
            extractor: MockEntityExtractor::new(vec![
                EntityMention::new("ibuprofen", "CHEMICAL"),
                EntityMention::new("migraine", "DISEASE"),
            ]),
            sink: Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap())),
            config,
        }
    }

    fn service(&self) -> SentimentService {
        SentimentService::new(
            self.vectorizer.clone(),
            Arc::new(self.classifier.clone()),
            Arc::new(self.extractor.clone()),
            self.sink.clone(),
            DecisionEngine::new(KeywordRule::default_triggers().unwrap()),
        )
    }

    fn state(&self) -> AppState {
        build_state(&self.config, self.service()).unwrap()
    }
}

async fn post_claim(state: AppState, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/Predict_Sentiment")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    create_router(state).oneshot(request).await.unwrap()
}

async fn get_status(addr: std::net::SocketAddr) -> reqwest::Response {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .get(format!("http://{}/Check_Server_status", addr))
        .send()
        .await
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_keyword_override_end_to_end() {
    let fixture = Fixture::new();

    let response = post_claim(
        fixture.state(),
        r#"{"Medical_Claim": "The patient recovered fully and reported no side effects."}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let verdicts: Vec<VerdictBody> = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].document.prediction, "positive");
    assert_eq!(verdicts[0].document.score, 0.32);
    assert!(verdicts[0].id.is_some());
}

#[tokio::test]
async fn test_classifier_branch_end_to_end() {
    let fixture = Fixture::new();

    let response = post_claim(
        fixture.state(),
        r#"{"Medical_Claim": "Patient shows no improvement after treatment."}"#,
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json[0]["Sentiment_Prediction"], "negative");
    assert_eq!(json[0]["Sentiment_Score"], 0.679);
}

#[tokio::test]
async fn test_entities_in_order_of_appearance() {
    let fixture = Fixture::new();

    let response = post_claim(
        fixture.state(),
        r#"{"Medical_Claim": "migraine relieved by ibuprofen"}"#,
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(
        json[0]["NER_Results"],
        serde_json::json!([
            {"text": "migraine", "label": "DISEASE"},
            {"text": "ibuprofen", "label": "CHEMICAL"}
        ])
    );
}

#[tokio::test]
async fn test_missing_claim_is_bad_request() {
    let fixture = Fixture::new();

    for body in [r#"{}"#, r#"{"claim": "x"}"#, r#"{"Medical_Claim": ""}"#] {
        let response = post_claim(fixture.state(), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Missing Medical Claims Request"})
        );
    }
}

#[tokio::test]
async fn test_sink_failure_omits_id() {
    let mut fixture = Fixture::new();
    let claim = r#"{"Medical_Claim": "Stable after surgery."}"#;

    let stored = body_json(post_claim(fixture.state(), claim).await).await;
    let offline: SharedSink = Arc::new(Mutex::new(OfflineSink));
    fixture.sink = offline;
    let response = post_claim(fixture.state(), claim).await;
    assert_eq!(response.status(), StatusCode::OK);
    let degraded = body_json(response).await;

    assert!(degraded[0].get("_id").is_none());
    assert_eq!(degraded[0]["Sentiment_Prediction"], stored[0]["Sentiment_Prediction"]);
    assert_eq!(degraded[0]["Sentiment_Score"], stored[0]["Sentiment_Score"]);
    assert_eq!(degraded[0]["NER_Results"], stored[0]["NER_Results"]);
}

#[tokio::test]
async fn test_extractor_failure_omits_ner_results() {
    let mut fixture = Fixture::new();
    fixture.extractor = MockEntityExtractor::failing();

    let response = post_claim(fixture.state(), r#"{"Medical_Claim": "ibuprofen"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json[0].get("NER_Results").is_none());
    assert!(json[0].get("_id").is_some());
}

#[tokio::test]
async fn test_classifier_failure_inline_exception() {
    let mut fixture = Fixture::new();
    fixture.classifier = MockClassifier::failing();

    let response = post_claim(fixture.state(), r#"{"Medical_Claim": "anything"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let message = json["Exception Occurred"].as_str().unwrap();
    assert!(message.contains("Mock classifier error"));
}

#[tokio::test]
async fn test_server_error_policy() {
    let mut fixture = Fixture::new();
    fixture.classifier = MockClassifier::failing();
    fixture.config.error_status_policy = ErrorStatusPolicy::ServerError;

    let response = post_claim(fixture.state(), r#"{"Medical_Claim": "anything"}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["Exception Occurred"].is_string());
}

#[tokio::test]
async fn test_non_string_claim_is_exception() {
    let fixture = Fixture::new();

    let response = post_claim(fixture.state(), r#"{"Medical_Claim": ["a", "b"]}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["Exception Occurred"].is_string());
}

#[tokio::test]
async fn test_pipeline_timeout() {
    let mut fixture = Fixture::new();
    let slow: SharedVectorizer = Arc::new(SlowVectorizer);
    fixture.vectorizer = slow;
    let mut state = fixture.state();
    state.request_timeout = Duration::from_millis(50);

    let response = post_claim(state, r#"{"Medical_Claim": "slow"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["Exception Occurred"]
        .as_str()
        .unwrap()
        .contains("timed out"));
}

#[tokio::test]
async fn test_pipeline_panic_is_contained() {
    let mut fixture = Fixture::new();
    let panicking: SharedVectorizer = Arc::new(PanickingVectorizer);
    fixture.vectorizer = panicking;

    let response = post_claim(fixture.state(), r#"{"Medical_Claim": "boom"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["Exception Occurred"].is_string());
}

#[tokio::test]
async fn test_same_claim_twice_distinct_records() {
    let fixture = Fixture::new();
    let claim = r#"{"Medical_Claim": "migraine after ibuprofen"}"#;

    let first = body_json(post_claim(fixture.state(), claim).await).await;
    let second = body_json(post_claim(fixture.state(), claim).await).await;

    assert_ne!(first[0]["_id"], second[0]["_id"]);
    assert_eq!(first[0]["Sentiment_Prediction"], second[0]["Sentiment_Prediction"]);
    assert_eq!(first[0]["Sentiment_Score"], second[0]["Sentiment_Score"]);
    assert_eq!(first[0]["NER_Results"], second[0]["NER_Results"]);
}

#[tokio::test]
async fn test_health_check_against_live_server() {
    let mut fixture = Fixture::new();
    let dir = tempfile::TempDir::new().unwrap();
    let status_file = dir.path().join("Server_test.json");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    fixture.config.bind_port = addr.port();
    fixture.config.status_file = Some(status_file.clone());

    tokio::spawn(serve(listener, fixture.state()));

    let report: StatusReport = get_status(addr)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(report.status, "Success");
    assert_eq!(report.status_code, Some(200));
    assert_eq!(report.host, "127.0.0.1");
    assert_eq!(report.port, addr.port());
    assert_eq!(
        report.running_address,
        format!("http://{}/Predict_Sentiment", addr)
    );

    let written: StatusReport =
        serde_json::from_slice(&std::fs::read(&status_file).unwrap()).unwrap();
    assert_eq!(written, report);
}

#[tokio::test]
async fn test_health_check_reports_failed_probe() {
    let mut fixture = Fixture::new();
    fixture.classifier = MockClassifier::failing();
    fixture.config.error_status_policy = ErrorStatusPolicy::ServerError;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    fixture.config.bind_port = addr.port();

    tokio::spawn(serve(listener, fixture.state()));

    let response = get_status(addr).await;
    assert_eq!(response.status().as_u16(), 200);

    let report: StatusReport = response.json().await.unwrap();
    assert_eq!(report.status, "Failed");
    assert_eq!(report.status_code, Some(500));
}
