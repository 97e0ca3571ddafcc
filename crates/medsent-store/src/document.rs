//! JSON shape of a stored verdict

use medsent_domain::{EntityMention, SentimentVerdict};
use serde::{Deserialize, Serialize};

/// Entity as it appears in a verdict document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDocument {
    /// Matched span
    pub text: String,
    /// Entity type
    pub label: String,
}

/// A verdict in its document form
///
/// Field names match the HTTP payload so stored records and responses read
/// the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictDocument {
    /// Original claim text
    #[serde(rename = "Sentiment_Text")]
    pub text: String,

    /// Predicted label
    #[serde(rename = "Sentiment_Prediction")]
    pub prediction: String,

    /// Rounded confidence
    #[serde(rename = "Sentiment_Score")]
    pub score: f64,

    /// Extracted entities, absent when extraction failed
    #[serde(
        rename = "NER_Results",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub entities: Option<Vec<EntityDocument>>,
}

impl From<&EntityMention> for EntityDocument {
    fn from(mention: &EntityMention) -> Self {
        Self {
            text: mention.text.clone(),
            label: mention.label.clone(),
        }
    }
}

impl From<&SentimentVerdict> for VerdictDocument {
    fn from(verdict: &SentimentVerdict) -> Self {
        Self {
            text: verdict.text.clone(),
            prediction: verdict.label.clone(),
            score: verdict.score,
            entities: verdict
                .entities
                .as_ref()
                .map(|mentions| mentions.iter().map(EntityDocument::from).collect()),
        }
    }
}
