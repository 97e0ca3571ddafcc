//! Startup loading of all model artifacts

use crate::{GazetteerExtractor, LogisticRegression, ModelError, TfidfVectorizer};
use medsent_domain::traits::{Classifier, Vectorizer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    /// TF-IDF vectorizer artifact
    pub vectorizer_path: PathBuf,
    /// Logistic regression artifact
    pub classifier_path: PathBuf,
    /// Gazetteer entity artifact
    pub entity_model_path: PathBuf,
}

/// The three learned collaborators, loaded together
#[derive(Debug, Clone)]
pub struct ModelBundle {
    /// Text vectorizer
    pub vectorizer: TfidfVectorizer,
    /// Sentiment classifier
    pub classifier: LogisticRegression,
    /// Entity extractor
    pub extractor: GazetteerExtractor,
}

impl ModelBundle {
    /// Load every artifact and check that the vectorizer feeds the classifier
    pub fn load(paths: &ModelPaths) -> Result<Self, ModelError> {
        info!("Loading vectorizer from {}", paths.vectorizer_path.display());
        let vectorizer = TfidfVectorizer::load(&paths.vectorizer_path)?;

        info!("Loading classifier from {}", paths.classifier_path.display());
        let classifier = LogisticRegression::load(&paths.classifier_path)?;

        info!("Loading entity model from {}", paths.entity_model_path.display());
        let extractor = GazetteerExtractor::load(&paths.entity_model_path)?;

        if vectorizer.dimension() != classifier.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: classifier.n_features(),
                actual: vectorizer.dimension(),
            });
        }

        info!(
            "Models loaded: {} terms, classes {:?}, {} entity patterns",
            vectorizer.vocabulary_size(),
            classifier.classes(),
            extractor.pattern_count()
        );

        Ok(Self {
            vectorizer,
            classifier,
            extractor,
        })
    }
}
