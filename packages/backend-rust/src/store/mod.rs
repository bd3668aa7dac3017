//! The word store: CRUD over vocabulary words.
//!
//! The store is constructed explicitly and handed to [`crate::state::AppState`];
//! nothing in the crate reaches for a process-wide instance. The Postgres
//! variant backs real deployments, the in-memory variant backs tests and
//! `DATABASE_URL`-less runs.

pub mod memory;
pub mod postgres;

use serde::Deserialize;
use thiserror::Error;

use lexi_session::{MasteryLevel, WordRecord};

pub use memory::MemoryWordStore;
pub use postgres::PostgresWordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("word store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to fetch words: {0}")]
    Fetch(#[source] sqlx::Error),
    #[error("failed to write word data: {0}")]
    Write(#[source] sqlx::Error),
    #[error("word not found")]
    NotFound,
}

/// Input for an add operation. The store assigns id, creation time and
/// the initial mastery level of 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Clone)]
pub enum WordStore {
    Postgres(PostgresWordStore),
    Memory(MemoryWordStore),
}

impl WordStore {
    /// Postgres when a database URL is configured, otherwise in-memory.
    /// The Postgres pool connects lazily; reachability problems surface
    /// per-operation, not here.
    pub fn connect(database_url: Option<&str>) -> Result<Self, StoreError> {
        match database_url {
            Some(url) => Ok(Self::Postgres(PostgresWordStore::connect(url)?)),
            None => Ok(Self::memory()),
        }
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryWordStore::default())
    }

    /// Idempotent check-or-create of the backing table and its indexes.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.ensure_schema().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// All words, newest first.
    pub async fn list_words(&self) -> Result<Vec<WordRecord>, StoreError> {
        match self {
            Self::Postgres(store) => store.list_words().await,
            Self::Memory(store) => store.list_words().await,
        }
    }

    pub async fn add_word(&self, new_word: NewWord) -> Result<WordRecord, StoreError> {
        match self {
            Self::Postgres(store) => store.add_word(new_word).await,
            Self::Memory(store) => store.add_word(new_word).await,
        }
    }

    /// Sets the mastery level and stamps `last_reviewed = now`.
    pub async fn update_mastery(&self, id: &str, level: MasteryLevel) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.update_mastery(id, level).await,
            Self::Memory(store) => store.update_mastery(id, level).await,
        }
    }

    /// Permanent removal.
    pub async fn delete_word(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Self::Postgres(store) => store.delete_word(id).await,
            Self::Memory(store) => store.delete_word(id).await,
        }
    }
}
