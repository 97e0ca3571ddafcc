//! Medsent Storage Layer
//!
//! Implements the PersistenceSink trait using SQLite. Every analyzed claim
//! becomes one append-only row holding the verdict as a JSON document.
//!
//! # Examples
//!
//! ```no_run
//! use medsent_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! assert_eq!(store.count().unwrap(), 0);
//! ```

#![warn(missing_docs)]

pub mod document;

use medsent_domain::traits::PersistenceSink;
use medsent_domain::{RecordId, SentimentVerdict};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use document::{EntityDocument, VerdictDocument};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Store cannot be reached (e.g. its lock is poisoned)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A verdict as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVerdict {
    /// Generated identifier
    pub id: RecordId,
    /// The verdict document
    pub document: VerdictDocument,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
}

/// SQLite-based implementation of PersistenceSink
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. The server shares one store
/// behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!(
                "Expected 16 bytes for RecordId, got {}",
                bytes.len()
            ))
        })?;
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_stored(
        id_bytes: Vec<u8>,
        document: String,
        created_at: i64,
    ) -> Result<StoredVerdict, StoreError> {
        Ok(StoredVerdict {
            id: Self::bytes_to_id(&id_bytes)?,
            document: serde_json::from_str(&document)?,
            created_at: created_at as u64,
        })
    }

    /// Fetch one stored verdict by id
    pub fn get(&self, id: RecordId) -> Result<Option<StoredVerdict>, StoreError> {
        let row: Option<(Vec<u8>, String, i64)> = self
            .conn
            .query_row(
                "SELECT id, document, created_at FROM verdicts WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(id_bytes, document, created_at)| {
            Self::row_to_stored(id_bytes, document, created_at)
        })
        .transpose()
    }

    /// Number of stored verdicts
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM verdicts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Most recent verdicts, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredVerdict>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document, created_at FROM verdicts
             ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(Vec<u8>, String, i64)>, _>>()?;

        rows.into_iter()
            .map(|(id_bytes, document, created_at)| {
                Self::row_to_stored(id_bytes, document, created_at)
            })
            .collect()
    }
}

impl PersistenceSink for SqliteStore {
    type Error = StoreError;

    fn insert(&mut self, verdict: &SentimentVerdict) -> Result<RecordId, Self::Error> {
        let id = RecordId::new();
        let document = serde_json::to_string(&VerdictDocument::from(verdict))?;

        self.conn.execute(
            "INSERT INTO verdicts (id, document, created_at) VALUES (?1, ?2, ?3)",
            params![Self::id_to_bytes(id), document, id.timestamp() as i64],
        )?;

        debug!("Stored verdict {}", id);
        Ok(id)
    }
}
