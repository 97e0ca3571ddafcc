//! Classifier inputs and outputs: feature vectors and probability distributions

use thiserror::Error;

/// Allowed drift from 1.0 when checking that probabilities sum to one
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised when a feature vector or distribution is malformed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Classifier returned no classes
    #[error("Probability distribution is empty")]
    Empty,

    /// Label and probability counts differ
    #[error("Got {labels} labels but {probabilities} probabilities")]
    LengthMismatch {
        /// Number of labels
        labels: usize,
        /// Number of probabilities
        probabilities: usize,
    },

    /// The same label appears twice
    #[error("Duplicate class label: {0}")]
    DuplicateLabel(String),

    /// Probability is NaN or outside [0, 1]
    #[error("Invalid probability {value} for class '{label}'")]
    InvalidProbability {
        /// Class label
        label: String,
        /// Offending value
        value: f64,
    },

    /// Probabilities do not sum to one
    #[error("Probabilities sum to {0}, expected 1.0")]
    NotNormalized(f64),

    /// Sparse entry index beyond the vector dimension
    #[error("Feature index {index} out of bounds for dimension {dimension}")]
    IndexOutOfBounds {
        /// Entry index
        index: usize,
        /// Vector dimension
        dimension: usize,
    },
}

/// Sparse numeric vector produced by a vectorizer
///
/// Entries are kept sorted by index with no duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` pairs
    ///
    /// Pairs sharing an index are summed. Zero values are dropped.
    pub fn from_sparse(
        dimension: usize,
        mut entries: Vec<(usize, f64)>,
    ) -> Result<Self, DistributionError> {
        if let Some(&(index, _)) = entries.iter().find(|(i, _)| *i >= dimension) {
            return Err(DistributionError::IndexOutOfBounds { index, dimension });
        }

        entries.sort_by_key(|(i, _)| *i);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);

        Ok(Self {
            dimension,
            entries: merged,
        })
    }

    /// Build a vector from a dense slice
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .collect();
        Self {
            dimension: values.len(),
            entries,
        }
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero entries, sorted by index
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product with a dense weight row
    ///
    /// Indices beyond `weights.len()` contribute nothing.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }
}

/// Ordered mapping from class label to probability
///
/// Always non-empty; every probability is in [0, 1] and the total is 1
/// within [`SUM_TOLERANCE`]. Class order is the classifier's own order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDistribution {
    classes: Vec<(String, f64)>,
}

impl ProbabilityDistribution {
    /// Build a distribution from parallel label and probability lists
    ///
    /// # Examples
    ///
    /// ```
    /// use medsent_domain::ProbabilityDistribution;
    ///
    /// let dist = ProbabilityDistribution::new(
    ///     vec!["negative".into(), "positive".into()],
    ///     vec![0.3, 0.7],
    /// ).unwrap();
    /// assert_eq!(dist.argmax(), ("positive", 0.7));
    /// ```
    pub fn new(labels: Vec<String>, probabilities: Vec<f64>) -> Result<Self, DistributionError> {
        if labels.len() != probabilities.len() {
            return Err(DistributionError::LengthMismatch {
                labels: labels.len(),
                probabilities: probabilities.len(),
            });
        }
        Self::from_pairs(labels.into_iter().zip(probabilities).collect())
    }

    /// Build a distribution from `(label, probability)` pairs
    pub fn from_pairs(classes: Vec<(String, f64)>) -> Result<Self, DistributionError> {
        if classes.is_empty() {
            return Err(DistributionError::Empty);
        }

        for (idx, (label, value)) in classes.iter().enumerate() {
            if value.is_nan() || !(0.0..=1.0).contains(value) {
                return Err(DistributionError::InvalidProbability {
                    label: label.clone(),
                    value: *value,
                });
            }
            if classes[..idx].iter().any(|(other, _)| other == label) {
                return Err(DistributionError::DuplicateLabel(label.clone()));
            }
        }

        let total: f64 = classes.iter().map(|(_, p)| p).sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(DistributionError::NotNormalized(total));
        }

        Ok(Self { classes })
    }

    /// Probability for a label, if the label is part of the class set
    pub fn get(&self, label: &str) -> Option<f64> {
        self.classes
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    /// Whether the label is part of the class set
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Label and probability of the most likely class
    ///
    /// Ties resolve to the earliest class.
    pub fn argmax(&self) -> (&str, f64) {
        let mut best = &self.classes[0];
        for entry in &self.classes[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        (best.0.as_str(), best.1)
    }

    /// Highest probability in the distribution
    pub fn max_probability(&self) -> f64 {
        self.argmax().1
    }

    /// Class labels in classifier order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|(l, _)| l.as_str())
    }

    /// `(label, probability)` pairs in classifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.classes.iter().map(|(l, p)| (l.as_str(), *p))
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always false for a constructed distribution
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
