//! Test doubles shared by the unit tests

use crate::pipeline::SharedSink;
use medsent_domain::traits::PersistenceSink;
use medsent_domain::{DecisionEngine, KeywordRule, RecordId, SentimentVerdict};
use medsent_store::StoreError;
use std::sync::{Arc, Mutex};

pub(crate) fn engine() -> DecisionEngine {
    DecisionEngine::new(KeywordRule::default_triggers().unwrap())
}

/// Sink that keeps verdicts in a vector
#[derive(Default)]
pub(crate) struct MemorySink {
    pub(crate) verdicts: Vec<(RecordId, SentimentVerdict)>,
}

impl MemorySink {
    pub(crate) fn shared() -> SharedSink {
        Arc::new(Mutex::new(MemorySink::default()))
    }
}

impl PersistenceSink for MemorySink {
    type Error = StoreError;

    fn insert(&mut self, verdict: &SentimentVerdict) -> Result<RecordId, Self::Error> {
        let id = RecordId::new();
        self.verdicts.push((id, verdict.clone()));
        Ok(id)
    }
}

/// Sink that rejects every insert
pub(crate) struct FailingSink;

impl PersistenceSink for FailingSink {
    type Error = StoreError;

    fn insert(&mut self, _verdict: &SentimentVerdict) -> Result<RecordId, Self::Error> {
        Err(StoreError::Unavailable("sink offline".to_string()))
    }
}
