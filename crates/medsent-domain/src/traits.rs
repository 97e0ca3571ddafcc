//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the decision logic and the
//! collaborators it relies on. Implementations live in other crates
//! (medsent-model for the learned components, medsent-store for persistence).

use crate::{EntityMention, FeatureVector, ProbabilityDistribution, RecordId, SentimentVerdict};

/// Turns raw text into a feature vector
///
/// Implemented by the infrastructure layer (medsent-model)
pub trait Vectorizer {
    /// Error type for vectorization
    type Error;

    /// Transform text into a vector of the classifier's input dimension
    fn transform(&self, text: &str) -> Result<FeatureVector, Self::Error>;

    /// Output dimension
    fn dimension(&self) -> usize;
}

/// Trained text classifier
///
/// Implemented by the infrastructure layer (medsent-model)
pub trait Classifier {
    /// Error type for classification
    type Error;

    /// Class labels in model order
    fn classes(&self) -> &[String];

    /// Most likely label for the vector
    fn predict(&self, features: &FeatureVector) -> Result<String, Self::Error>;

    /// Probability for every class, in model order
    fn predict_proba(&self, features: &FeatureVector)
        -> Result<ProbabilityDistribution, Self::Error>;
}

/// Named-entity recognizer
///
/// Implemented by the infrastructure layer (medsent-model)
pub trait EntityExtractor {
    /// Error type for extraction
    type Error;

    /// Entities found in `text`, in order of appearance
    fn extract(&self, text: &str) -> Result<Vec<EntityMention>, Self::Error>;
}

/// Append-only document store for verdicts
///
/// Implemented by the infrastructure layer (medsent-store)
pub trait PersistenceSink {
    /// Error type for store operations
    type Error;

    /// Store a verdict and return its generated identifier
    fn insert(&mut self, verdict: &SentimentVerdict) -> Result<RecordId, Self::Error>;
}
