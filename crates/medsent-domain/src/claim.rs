//! Claim module - the text a caller submits, and the id a stored verdict receives

use std::fmt;
use thiserror::Error;

/// Errors raised when building a [`Claim`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// Claim text was empty or whitespace only
    #[error("Claim text must not be empty")]
    Empty,
}

/// Raw input text submitted for sentiment analysis
///
/// A claim lives for exactly one request. It is never stored on its own; the
/// text is copied into the [`SentimentVerdict`](crate::SentimentVerdict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim(String);

impl Claim {
    /// Create a claim, rejecting empty or whitespace-only text
    ///
    /// # Examples
    ///
    /// ```
    /// use medsent_domain::Claim;
    ///
    /// let claim = Claim::new("Patient recovered.").unwrap();
    /// assert_eq!(claim.text(), "Patient recovered.");
    /// assert!(Claim::new("   ").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, ClaimError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ClaimError::Empty);
        }
        Ok(Self(text))
    }

    /// The claim text, exactly as submitted
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Consume the claim and return its text
    pub fn into_text(self) -> String {
        self.0
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier generated by the persistence sink for each stored verdict
///
/// Backed by a UUIDv7 so ids sort by insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was generated
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}
