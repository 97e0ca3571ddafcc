//! Sentiment verdict - the record produced for every analyzed claim

use crate::decision::Decision;
use crate::entity::EntityMention;

/// Round `value` half away from zero to `decimals` places
///
/// # Examples
///
/// ```
/// use medsent_domain::round_to;
///
/// assert_eq!(round_to(0.8765, 2), 0.88);
/// assert_eq!(round_to(0.8765, 3), 0.877);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Output of the decision engine for one claim
///
/// Immutable once built. The persistence sink stores it as-is; the id it
/// returns is tracked separately by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentVerdict {
    /// Original claim text
    pub text: String,

    /// Predicted sentiment label
    pub label: String,

    /// Confidence attributed to `label`, already rounded
    pub score: f64,

    /// Extracted entities, `None` when extraction failed
    pub entities: Option<Vec<EntityMention>>,
}

impl SentimentVerdict {
    /// Assemble a verdict from a decision and the extracted entities
    pub fn from_decision(
        text: impl Into<String>,
        decision: &Decision,
        entities: Option<Vec<EntityMention>>,
    ) -> Self {
        Self {
            text: text.into(),
            label: decision.label.clone(),
            score: decision.score,
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionBranch;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.0, 2), 0.0);
        assert_eq!(round_to(1.0, 3), 1.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(0.6666666, 3), 0.667);
        assert_eq!(round_to(0.6666666, 2), 0.67);
    }

    #[test]
    fn test_verdict_from_decision() {
        let decision = Decision {
            label: "positive".to_string(),
            score: 0.91,
            branch: DecisionBranch::KeywordOverride {
                trigger: "good".to_string(),
            },
        };
        let entities = vec![EntityMention::new("aspirin", "CHEMICAL")];
        let verdict = SentimentVerdict::from_decision("good aspirin", &decision, Some(entities));

        assert_eq!(verdict.text, "good aspirin");
        assert_eq!(verdict.label, "positive");
        assert_eq!(verdict.score, 0.91);
        assert_eq!(verdict.entities.as_ref().map(Vec::len), Some(1));
    }
}
