use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use lexi_session::{MasteryLevel, WordRecord};

use crate::store::{NewWord, StoreError};

/// In-memory word store used by tests and `DATABASE_URL`-less runs.
#[derive(Clone, Default)]
pub struct MemoryWordStore {
    words: Arc<RwLock<Vec<WordRecord>>>,
}

impl MemoryWordStore {
    pub async fn list_words(&self) -> Result<Vec<WordRecord>, StoreError> {
        let words = self.words.read().await;
        let mut listed = words.clone();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    pub async fn add_word(&self, new_word: NewWord) -> Result<WordRecord, StoreError> {
        let record = WordRecord {
            id: Uuid::new_v4().to_string(),
            word: new_word.word,
            definition: new_word.definition,
            example: new_word.example,
            mastery_level: MasteryLevel::UNKNOWN,
            last_reviewed: None,
            created_at: Utc::now(),
        };

        let mut words = self.words.write().await;
        words.push(record.clone());
        Ok(record)
    }

    pub async fn update_mastery(&self, id: &str, level: MasteryLevel) -> Result<(), StoreError> {
        let mut words = self.words.write().await;
        let word = words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(StoreError::NotFound)?;

        word.mastery_level = level;
        word.last_reviewed = Some(Utc::now());
        Ok(())
    }

    pub async fn delete_word(&self, id: &str) -> Result<(), StoreError> {
        let mut words = self.words.write().await;
        let before = words.len();
        words.retain(|w| w.id != id);

        if words.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
