//! Medsent Rust SDK
//!
//! Client library for the Medsent sentiment service.
//!
//! # Example
//!
//! ```no_run
//! use medsent_sdk::{PredictOutcome, SentimentClient};
//!
//! # async fn example() -> Result<(), medsent_sdk::SdkError> {
//! let client = SentimentClient::new("http://127.0.0.1:5000");
//!
//! match client.predict("The patient recovered fully.").await? {
//!     PredictOutcome::Verdicts(verdicts) => {
//!         for v in verdicts {
//!             println!("{} ({})", v.prediction, v.score);
//!         }
//!     }
//!     PredictOutcome::MissingClaim(message) => eprintln!("{}", message),
//!     PredictOutcome::Exception(message) => eprintln!("server fault: {}", message),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod types;

pub use client::SentimentClient;
pub use error::SdkError;
pub use types::{EntityResult, PredictOutcome, StatusReport, Verdict};
