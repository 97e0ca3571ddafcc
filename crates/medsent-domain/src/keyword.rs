//! Keyword override rule
//!
//! A fixed, ordered lexicon of positive trigger words. Any occurrence in the
//! claim, compared case-insensitively as a plain substring, triggers the rule.
//! There is no negation handling: "not good" still triggers.

use aho_corasick::{AhoCorasick, MatchKind};
use thiserror::Error;

/// Default trigger words, in lexicon order
pub const DEFAULT_TRIGGERS: [&str; 7] = [
    "good",
    "excellent",
    "improved",
    "beneficial",
    "successful",
    "happy",
    "recovered",
];

/// Errors raised when building a [`KeywordRule`]
#[derive(Debug, Error)]
pub enum KeywordError {
    /// A trigger word was empty or whitespace only
    #[error("Trigger words must not be empty")]
    EmptyTrigger,

    /// Matcher construction failed
    #[error("Failed to build keyword matcher: {0}")]
    Build(#[from] aho_corasick::BuildError),
}

/// Case-insensitive substring matcher over a fixed trigger lexicon
#[derive(Debug, Clone)]
pub struct KeywordRule {
    triggers: Vec<String>,
    matcher: Option<AhoCorasick>,
}

impl KeywordRule {
    /// Build a rule from an ordered list of trigger words
    ///
    /// An empty list yields a rule that never triggers.
    pub fn new<I, S>(triggers: I) -> Result<Self, KeywordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let triggers: Vec<String> = triggers.into_iter().map(Into::into).collect();
        if triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(KeywordError::EmptyTrigger);
        }

        let matcher = if triggers.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .match_kind(MatchKind::LeftmostFirst)
                    .build(&triggers)?,
            )
        };

        Ok(Self { triggers, matcher })
    }

    /// Rule over [`DEFAULT_TRIGGERS`]
    pub fn default_triggers() -> Result<Self, KeywordError> {
        Self::new(DEFAULT_TRIGGERS)
    }

    /// Whether any trigger occurs in `text`
    ///
    /// # Examples
    ///
    /// ```
    /// use medsent_domain::KeywordRule;
    ///
    /// let rule = KeywordRule::default_triggers().unwrap();
    /// assert!(rule.is_triggered("The patient RECOVERED quickly"));
    /// assert!(!rule.is_triggered("No improvement after treatment"));
    /// ```
    pub fn is_triggered(&self, text: &str) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|matcher| matcher.is_match(text))
    }

    /// The trigger word found leftmost in `text`, if any
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let matcher = self.matcher.as_ref()?;
        matcher
            .find(text)
            .map(|m| self.triggers[m.pattern().as_usize()].as_str())
    }

    /// Trigger words in lexicon order
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }
}
