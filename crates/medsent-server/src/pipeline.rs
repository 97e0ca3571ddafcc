//! The per-request prediction pipeline.
//!
//! vectorize -> classify -> extract -> decide -> persist. Vectorizer and
//! classifier failures abort the run; extractor and sink failures only
//! degrade the result.

use medsent_domain::traits::{Classifier, EntityExtractor, PersistenceSink, Vectorizer};
use medsent_domain::{Claim, DecisionBranch, DecisionEngine, RecordId, SentimentVerdict};
use medsent_model::{ModelBundle, ModelError};
use medsent_store::StoreError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Vectorizer shared across requests
pub type SharedVectorizer = Arc<dyn Vectorizer<Error = ModelError> + Send + Sync>;
/// Classifier shared across requests
pub type SharedClassifier = Arc<dyn Classifier<Error = ModelError> + Send + Sync>;
/// Entity extractor shared across requests
pub type SharedExtractor = Arc<dyn EntityExtractor<Error = ModelError> + Send + Sync>;
/// Persistence sink shared across requests
pub type SharedSink = Arc<Mutex<dyn PersistenceSink<Error = StoreError> + Send>>;

/// Internal fault that aborts a prediction
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Vectorizer failed
    #[error("Vectorization failed: {0}")]
    Vectorize(#[source] ModelError),

    /// Classifier failed or returned a malformed distribution
    #[error("Classification failed: {0}")]
    Classify(#[source] ModelError),

    /// The pipeline task panicked
    #[error("Prediction task failed: {0}")]
    Panicked(String),

    /// The pipeline did not finish in time
    #[error("Prediction timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result of one successful pipeline run
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    /// The verdict as decided
    pub verdict: SentimentVerdict,
    /// Sink id, `None` when persistence failed
    pub record_id: Option<RecordId>,
    /// Which rule produced the label
    pub branch: DecisionBranch,
}

/// Collaborators and decision engine behind `/Predict_Sentiment`
#[derive(Clone)]
pub struct SentimentService {
    vectorizer: SharedVectorizer,
    classifier: SharedClassifier,
    extractor: SharedExtractor,
    sink: SharedSink,
    engine: Arc<DecisionEngine>,
}

impl SentimentService {
    /// Assemble a service from explicit collaborators
    pub fn new(
        vectorizer: SharedVectorizer,
        classifier: SharedClassifier,
        extractor: SharedExtractor,
        sink: SharedSink,
        engine: DecisionEngine,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            extractor,
            sink,
            engine: Arc::new(engine),
        }
    }

    /// Assemble a service from loaded model artifacts
    pub fn from_bundle(bundle: ModelBundle, sink: SharedSink, engine: DecisionEngine) -> Self {
        Self::new(
            Arc::new(bundle.vectorizer),
            Arc::new(bundle.classifier),
            Arc::new(bundle.extractor),
            sink,
            engine,
        )
    }

    /// Run the pipeline synchronously on the current thread
    pub fn analyze(&self, claim: &Claim) -> Result<PredictionOutcome, PipelineError> {
        let text = claim.text();

        let features = self
            .vectorizer
            .transform(text)
            .map_err(PipelineError::Vectorize)?;
        let distribution = self
            .classifier
            .predict_proba(&features)
            .map_err(PipelineError::Classify)?;
        let predicted = self
            .classifier
            .predict(&features)
            .map_err(PipelineError::Classify)?;

        let entities = match self.extractor.extract(text) {
            Ok(entities) => Some(entities),
            Err(e) => {
                warn!("Entity extraction failed, omitting NER results: {}", e);
                None
            }
        };

        let decision = self.engine.decide(text, &distribution, &predicted);
        match &decision.branch {
            DecisionBranch::KeywordOverride { trigger } => {
                debug!("Keyword override on '{}': {}", trigger, decision.score)
            }
            DecisionBranch::Classifier => {
                debug!("Classifier verdict {}: {}", decision.label, decision.score)
            }
        }

        let verdict = SentimentVerdict::from_decision(text, &decision, entities);
        let record_id = self.persist(&verdict);

        Ok(PredictionOutcome {
            verdict,
            record_id,
            branch: decision.branch,
        })
    }

    /// Run the pipeline on the blocking pool, bounded by `limit`
    pub async fn run(
        &self,
        claim: Claim,
        limit: Duration,
    ) -> Result<PredictionOutcome, PipelineError> {
        let service = self.clone();
        let task = tokio::task::spawn_blocking(move || service.analyze(&claim));

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(PipelineError::Panicked(join_error.to_string())),
            Err(_) => Err(PipelineError::TimedOut(limit)),
        }
    }

    fn persist(&self, verdict: &SentimentVerdict) -> Option<RecordId> {
        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(_) => {
                warn!("Persistence sink lock is poisoned, verdict not stored");
                return None;
            }
        };

        match sink.insert(verdict) {
            Ok(id) => {
                info!("Stored verdict {} ({})", id, verdict.label);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to store verdict: {}", e);
                None
            }
        }
    }
}
