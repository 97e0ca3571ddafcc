//! Deterministic collaborators for testing
//!
//! These return pre-configured outputs without touching any artifact. Call
//! counts are shared between clones so a test can keep a handle after moving
//! a mock into a service.

use crate::ModelError;
use medsent_domain::traits::{Classifier, EntityExtractor, Vectorizer};
use medsent_domain::{EntityMention, FeatureVector, ProbabilityDistribution};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Vectorizer that always returns a zero vector
#[derive(Debug, Clone)]
pub struct MockVectorizer {
    dimension: usize,
    fail: bool,
    call_count: Arc<AtomicUsize>,
}

impl MockVectorizer {
    /// Create a mock producing zero vectors of `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail: false,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock whose `transform` always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(1)
        }
    }

    /// Number of times `transform` was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl Vectorizer for MockVectorizer {
    type Error = ModelError;

    fn transform(&self, _text: &str) -> Result<FeatureVector, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ModelError::Other("Mock vectorizer error".to_string()));
        }
        Ok(FeatureVector::zeros(self.dimension))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Classifier returning a fixed distribution
///
/// # Examples
///
/// ```
/// use medsent_model::MockClassifier;
/// use medsent_domain::FeatureVector;
/// use medsent_domain::traits::Classifier;
///
/// let classifier = MockClassifier::new(&[("negative", 0.6), ("positive", 0.4)]).unwrap();
/// let dist = classifier.predict_proba(&FeatureVector::zeros(1)).unwrap();
/// assert_eq!(dist.get("positive"), Some(0.4));
/// ```
#[derive(Debug, Clone)]
pub struct MockClassifier {
    classes: Vec<String>,
    distribution: Option<ProbabilityDistribution>,
    call_count: Arc<AtomicUsize>,
}

impl MockClassifier {
    /// Create a mock over fixed `(label, probability)` pairs
    pub fn new(pairs: &[(&str, f64)]) -> Result<Self, ModelError> {
        let distribution = ProbabilityDistribution::from_pairs(
            pairs.iter().map(|(l, p)| (l.to_string(), *p)).collect(),
        )?;
        Ok(Self {
            classes: distribution.labels().map(str::to_string).collect(),
            distribution: Some(distribution),
            call_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Create a mock that fails every prediction
    pub fn failing() -> Self {
        Self {
            classes: vec!["negative".to_string(), "positive".to_string()],
            distribution: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `predict` and `predict_proba` calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn distribution(&self) -> Result<&ProbabilityDistribution, ModelError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.distribution
            .as_ref()
            .ok_or_else(|| ModelError::Other("Mock classifier error".to_string()))
    }
}

impl Classifier for MockClassifier {
    type Error = ModelError;

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, _features: &FeatureVector) -> Result<String, Self::Error> {
        Ok(self.distribution()?.argmax().0.to_string())
    }

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<ProbabilityDistribution, Self::Error> {
        Ok(self.distribution()?.clone())
    }
}

/// Entity extractor over a fixed mention list
///
/// Returns the configured mentions whose text occurs in the input, ordered by
/// first occurrence.
#[derive(Debug, Clone, Default)]
pub struct MockEntityExtractor {
    mentions: Vec<EntityMention>,
    fail: bool,
}

impl MockEntityExtractor {
    /// Create a mock that knows the given mentions
    pub fn new(mentions: Vec<EntityMention>) -> Self {
        Self {
            mentions,
            fail: false,
        }
    }

    /// Create a mock whose `extract` always fails
    pub fn failing() -> Self {
        Self {
            mentions: Vec::new(),
            fail: true,
        }
    }
}

impl EntityExtractor for MockEntityExtractor {
    type Error = ModelError;

    fn extract(&self, text: &str) -> Result<Vec<EntityMention>, Self::Error> {
        if self.fail {
            return Err(ModelError::Other("Mock entity extractor error".to_string()));
        }

        let mut found: Vec<(usize, EntityMention)> = self
            .mentions
            .iter()
            .filter_map(|m| text.find(&m.text).map(|pos| (pos, m.clone())))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        Ok(found.into_iter().map(|(_, m)| m).collect())
    }
}
