//! Medsent Model Layer
//!
//! Artifact-backed implementations of the collaborator traits from
//! `medsent-domain`: the TF-IDF vectorizer, the logistic regression
//! classifier and the gazetteer entity extractor. Artifacts are JSON files
//! exported from the training environment and loaded once at startup.
//!
//! # Components
//!
//! - `TfidfVectorizer`: text to sparse TF-IDF vector
//! - `LogisticRegression`: binary (sigmoid) or multinomial (softmax) classifier
//! - `GazetteerExtractor`: case-insensitive dictionary NER
//! - `ModelBundle`: loads all three from configured paths
//! - `MockVectorizer`, `MockClassifier`, `MockEntityExtractor`: deterministic fakes for testing
//!
//! # Examples
//!
//! ```
//! use medsent_model::MockClassifier;
//! use medsent_domain::FeatureVector;
//! use medsent_domain::traits::Classifier;
//!
//! let classifier = MockClassifier::new(&[("negative", 0.25), ("positive", 0.75)]).unwrap();
//! let features = FeatureVector::zeros(4);
//! assert_eq!(classifier.predict(&features).unwrap(), "positive");
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod gazetteer;
pub mod logistic;
pub mod mock;
pub mod tfidf;

use medsent_domain::DistributionError;
use std::path::PathBuf;
use thiserror::Error;

pub use bundle::{ModelBundle, ModelPaths};
pub use gazetteer::{EntityPattern, GazetteerArtifact, GazetteerExtractor};
pub use logistic::{LogisticArtifact, LogisticRegression};
pub use mock::{MockClassifier, MockEntityExtractor, MockVectorizer};
pub use tfidf::{Norm, TfidfArtifact, TfidfVectorizer};

/// Errors that can occur while loading or running a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact file could not be read
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for its type
    #[error("Failed to parse artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact parsed but its contents are inconsistent
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    /// Feature vector does not fit the classifier
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the model was trained on
        expected: usize,
        /// Dimension received
        actual: usize,
    },

    /// Classifier output could not form a probability distribution
    #[error("Malformed classifier output: {0}")]
    Distribution(#[from] DistributionError),

    /// Generic error
    #[error("Model error: {0}")]
    Other(String),
}

/// Read an artifact file into a string
pub(crate) fn read_artifact(path: &std::path::Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}
