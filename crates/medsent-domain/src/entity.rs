//! Named-entity mentions extracted from a claim

/// A named-entity span and its type label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMention {
    /// Matched text, as it appears in the claim
    pub text: String,

    /// Entity type (e.g. "DISEASE", "CHEMICAL", "ORG")
    pub label: String,
}

impl EntityMention {
    /// Create a new entity mention
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}
