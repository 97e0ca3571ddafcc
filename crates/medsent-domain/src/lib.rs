//! Medsent Domain Layer
//!
//! This crate contains the core decision logic and domain model for Medsent.
//! It defines the value objects that flow through a sentiment request and the
//! trait interfaces every collaborator (vectorizer, classifier, entity
//! extractor, persistence sink) is reached through.
//!
//! ## Key Concepts
//!
//! - **Claim**: The raw text submitted for analysis
//! - **Probability Distribution**: Classifier output over its full label set
//! - **Keyword Override Rule**: Fixed lexicon that forces a positive verdict
//! - **Decision Engine**: Combines the rule with the classifier output
//! - **Sentiment Verdict**: Label, rounded confidence and extracted entities
//!
//! ## Architecture
//!
//! - Pure decision logic only, no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod decision;
pub mod distribution;
pub mod entity;
pub mod keyword;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use claim::{Claim, ClaimError, RecordId};
pub use decision::{Decision, DecisionBranch, DecisionEngine, POSITIVE_LABEL};
pub use distribution::{DistributionError, FeatureVector, ProbabilityDistribution};
pub use entity::EntityMention;
pub use keyword::{KeywordError, KeywordRule, DEFAULT_TRIGGERS};
pub use verdict::{round_to, SentimentVerdict};
