//! Sentiment decision engine
//!
//! Combines the keyword override rule with the classifier output. The rule
//! only ever pushes toward the positive label, never away from it.
//!
//! The two branches round differently: the override branch reports two
//! decimals, the classifier branch three. Both precisions are part of the
//! observable contract.

use crate::distribution::ProbabilityDistribution;
use crate::keyword::KeywordRule;
use crate::verdict::round_to;

/// Label forced by the keyword override
pub const POSITIVE_LABEL: &str = "positive";

/// Decimals reported when the keyword override fires
pub const OVERRIDE_DECIMALS: u32 = 2;

/// Decimals reported when the classifier decides
pub const CLASSIFIER_DECIMALS: u32 = 3;

/// Which path produced a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionBranch {
    /// The keyword override fired on `trigger`
    KeywordOverride {
        /// First trigger word found in the claim
        trigger: String,
    },
    /// The classifier's own prediction was used
    Classifier,
}

/// Label and rounded confidence chosen for a claim
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Emitted label
    pub label: String,
    /// Probability attributed to `label`, rounded per branch
    pub score: f64,
    /// Path that produced the decision
    pub branch: DecisionBranch,
}

/// Hybrid keyword/classifier decision engine
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    rule: KeywordRule,
}

impl DecisionEngine {
    /// Create an engine around the given keyword rule
    pub fn new(rule: KeywordRule) -> Self {
        Self { rule }
    }

    /// The keyword rule in front of the classifier
    pub fn rule(&self) -> &KeywordRule {
        &self.rule
    }

    /// Decide the label and confidence for a claim
    ///
    /// `predicted_label` is the classifier's top prediction for the same
    /// vector that produced `distribution`.
    ///
    /// # Examples
    ///
    /// ```
    /// use medsent_domain::{DecisionEngine, KeywordRule, ProbabilityDistribution};
    ///
    /// let engine = DecisionEngine::new(KeywordRule::default_triggers().unwrap());
    /// let dist = ProbabilityDistribution::new(
    ///     vec!["negative".into(), "positive".into()],
    ///     vec![0.8765, 0.1235],
    /// ).unwrap();
    ///
    /// let decision = engine.decide("The patient recovered fully.", &dist, "negative");
    /// assert_eq!(decision.label, "positive");
    /// assert_eq!(decision.score, 0.12);
    ///
    /// let decision = engine.decide("No change observed.", &dist, "negative");
    /// assert_eq!(decision.label, "negative");
    /// assert_eq!(decision.score, 0.877);
    /// ```
    pub fn decide(
        &self,
        text: &str,
        distribution: &ProbabilityDistribution,
        predicted_label: &str,
    ) -> Decision {
        if let Some(trigger) = self.rule.first_match(text) {
            let probability = distribution
                .get(POSITIVE_LABEL)
                .unwrap_or_else(|| distribution.max_probability());

            return Decision {
                label: POSITIVE_LABEL.to_string(),
                score: round_to(probability, OVERRIDE_DECIMALS),
                branch: DecisionBranch::KeywordOverride {
                    trigger: trigger.to_string(),
                },
            };
        }

        Decision {
            label: predicted_label.to_string(),
            score: round_to(distribution.max_probability(), CLASSIFIER_DECIMALS),
            branch: DecisionBranch::Classifier,
        }
    }
}
