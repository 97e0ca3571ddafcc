//! Logistic regression classifier
//!
//! Binary models carry a single coefficient row scored through a sigmoid;
//! multiclass models carry one row per class scored through a softmax.

use crate::{read_artifact, ModelError};
use medsent_domain::traits::Classifier;
use medsent_domain::{FeatureVector, ProbabilityDistribution};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized classifier state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    /// Class labels in model order
    pub classes: Vec<String>,

    /// Coefficient rows (one row for binary models)
    pub coef: Vec<Vec<f64>>,

    /// Intercept per coefficient row
    pub intercept: Vec<f64>,
}

/// Fitted logistic regression model
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl LogisticRegression {
    /// Build a classifier from a parsed artifact, validating its shape
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, ModelError> {
        let n_classes = artifact.classes.len();
        if n_classes < 2 {
            return Err(ModelError::InvalidArtifact(format!(
                "expected at least 2 classes, got {}",
                n_classes
            )));
        }

        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if artifact.coef.len() != expected_rows {
            return Err(ModelError::InvalidArtifact(format!(
                "{} classes require {} coefficient rows, got {}",
                n_classes,
                expected_rows,
                artifact.coef.len()
            )));
        }
        if artifact.intercept.len() != expected_rows {
            return Err(ModelError::InvalidArtifact(format!(
                "expected {} intercepts, got {}",
                expected_rows,
                artifact.intercept.len()
            )));
        }

        let n_features = artifact.coef[0].len();
        if n_features == 0 || artifact.coef.iter().any(|row| row.len() != n_features) {
            return Err(ModelError::InvalidArtifact(
                "coefficient rows must be non-empty and of equal length".to_string(),
            ));
        }

        for (idx, label) in artifact.classes.iter().enumerate() {
            if artifact.classes[..idx].contains(label) {
                return Err(ModelError::InvalidArtifact(format!(
                    "duplicate class label '{}'",
                    label
                )));
            }
        }

        Ok(Self {
            classes: artifact.classes,
            coef: artifact.coef,
            intercept: artifact.intercept,
        })
    }

    /// Parse a classifier from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    /// Load a classifier from a JSON artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path.as_ref())?)
    }

    /// Number of input features the model expects
    pub fn n_features(&self) -> usize {
        self.coef[0].len()
    }

    /// Raw linear scores, one per coefficient row
    pub fn decision_function(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        if features.dimension() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.dimension(),
            });
        }

        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot(row) + b)
            .collect())
    }
}

impl Classifier for LogisticRegression {
    type Error = ModelError;

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<String, Self::Error> {
        let distribution = self.predict_proba(features)?;
        Ok(distribution.argmax().0.to_string())
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<ProbabilityDistribution, Self::Error> {
        let scores = self.decision_function(features)?;

        let probabilities = if self.classes.len() == 2 {
            let p1 = sigmoid(scores[0]);
            vec![1.0 - p1, p1]
        } else {
            softmax(&scores)
        };

        Ok(ProbabilityDistribution::new(
            self.classes.clone(),
            probabilities,
        )?)
    }
}
