//! Dictionary-based named-entity extractor
//!
//! Matches a fixed list of entity phrases case-insensitively. Matches must
//! sit on word boundaries; overlapping candidates resolve leftmost-longest.

use crate::{read_artifact, ModelError};
use aho_corasick::{AhoCorasick, MatchKind};
use medsent_domain::traits::EntityExtractor;
use medsent_domain::EntityMention;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entity phrase and its type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPattern {
    /// Phrase to match
    pub text: String,
    /// Entity type label
    pub label: String,
}

/// Serialized extractor state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerArtifact {
    /// Entity phrases
    pub patterns: Vec<EntityPattern>,
}

/// Case-insensitive gazetteer entity extractor
#[derive(Debug, Clone)]
pub struct GazetteerExtractor {
    matcher: AhoCorasick,
    labels: Vec<String>,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl GazetteerExtractor {
    /// Build an extractor from a parsed artifact
    pub fn from_artifact(artifact: GazetteerArtifact) -> Result<Self, ModelError> {
        if let Some(p) = artifact
            .patterns
            .iter()
            .find(|p| p.text.trim().is_empty() || p.label.trim().is_empty())
        {
            return Err(ModelError::InvalidArtifact(format!(
                "entity pattern '{}' / '{}' has an empty field",
                p.text, p.label
            )));
        }

        let (texts, labels): (Vec<String>, Vec<String>) = artifact
            .patterns
            .into_iter()
            .map(|p| (p.text, p.label))
            .unzip();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&texts)
            .map_err(|e| ModelError::InvalidArtifact(e.to_string()))?;

        Ok(Self { matcher, labels })
    }

    /// Parse an extractor from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    /// Load an extractor from a JSON artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        Self::from_json(&read_artifact(path.as_ref())?)
    }

    /// Number of entity phrases
    pub fn pattern_count(&self) -> usize {
        self.labels.len()
    }

    fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    }
}

impl EntityExtractor for GazetteerExtractor {
    type Error = ModelError;

    fn extract(&self, text: &str) -> Result<Vec<EntityMention>, Self::Error> {
        let mut candidates: Vec<(usize, usize, usize)> = self
            .matcher
            .find_overlapping_iter(text)
            .filter(|m| text.is_char_boundary(m.start()) && text.is_char_boundary(m.end()))
            .filter(|m| Self::on_word_boundary(text, m.start(), m.end()))
            .map(|m| (m.start(), m.end(), m.pattern().as_usize()))
            .collect();

        // leftmost first, longest first at the same start
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut mentions = Vec::new();
        let mut cursor = 0;
        for (start, end, pattern) in candidates {
            if start < cursor {
                continue;
            }
            mentions.push(EntityMention::new(&text[start..end], &self.labels[pattern]));
            cursor = end;
        }

        Ok(mentions)
    }
}
