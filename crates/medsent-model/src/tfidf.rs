//! TF-IDF vectorizer
//!
//! Applies a fitted vocabulary and IDF table to raw text. Fitting happens in
//! the training environment; this module only loads and applies the result.

use crate::{read_artifact, ModelError};
use medsent_domain::traits::Vectorizer;
use medsent_domain::FeatureVector;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Tokens of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Sum of absolute values is one
    L1,
    /// Euclidean length is one
    L2,
}

/// Serialized vectorizer state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    /// Term (or space-joined n-gram) to column index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column
    pub idf: Vec<f64>,

    /// Lowercase text before tokenizing
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Row normalization, `null` for none
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    /// Inclusive n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    ngram_range: (usize, usize),
    token_pattern: Regex,
}

impl TfidfVectorizer {
    /// Build a vectorizer from a parsed artifact, validating it
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ModelError> {
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ModelError::InvalidArtifact(format!(
                "ngram_range ({}, {}) is invalid",
                min_n, max_n
            )));
        }
        if artifact.idf.is_empty() {
            return Err(ModelError::InvalidArtifact("idf table is empty".to_string()));
        }
        if let Some((term, index)) = artifact
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= artifact.idf.len())
        {
            return Err(ModelError::InvalidArtifact(format!(
                "term '{}' maps to column {} but idf has {} entries",
                term,
                index,
                artifact.idf.len()
            )));
        }

        let token_pattern =
            Regex::new(TOKEN_PATTERN).map_err(|e| ModelError::Other(e.to_string()))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            ngram_range: artifact.ngram_range,
            token_pattern,
        })
    }

    /// Parse a vectorizer from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    /// Load a vectorizer from a JSON artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path.as_ref())?)
    }

    /// Number of vocabulary terms
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Split text into the terms (and n-grams) looked up in the vocabulary
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    type Error = ModelError;

    fn transform(&self, text: &str) -> Result<FeatureVector, Self::Error> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
                (index, tf * self.idf[index])
            })
            .collect();

        let total = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum(),
            None => 1.0,
        };
        if total > 0.0 {
            for (_, value) in entries.iter_mut() {
                *value /= total;
            }
        }

        Ok(FeatureVector::from_sparse(self.idf.len(), entries)?)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}
