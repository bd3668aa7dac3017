use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use lexi_session::{MasteryLevel, WordRecord};

use crate::store::{NewWord, StoreError};

const SELECT_COLUMNS: &str =
    "id, word, definition, example, mastery_level, last_reviewed, created_at";

#[derive(Clone)]
pub struct PostgresWordStore {
    pool: PgPool,
}

impl PostgresWordStore {
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS vocabulary_words (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                word TEXT NOT NULL,
                definition TEXT NOT NULL,
                example TEXT,
                mastery_level INTEGER NOT NULL DEFAULT 0,
                last_reviewed TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_vocabulary_words_word ON vocabulary_words (word)",
            "CREATE INDEX IF NOT EXISTS idx_vocabulary_words_mastery ON vocabulary_words (mastery_level)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        }

        Ok(())
    }

    pub async fn list_words(&self) -> Result<Vec<WordRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM vocabulary_words ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::Fetch)?;

        rows.into_iter().map(row_to_word).collect()
    }

    pub async fn add_word(&self, new_word: NewWord) -> Result<WordRecord, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO vocabulary_words (word, definition, example, mastery_level) \
             VALUES ($1, $2, $3, 0) RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&new_word.word)
        .bind(&new_word.definition)
        .bind(&new_word.example)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        row_to_word(row)
    }

    pub async fn update_mastery(&self, id: &str, level: MasteryLevel) -> Result<(), StoreError> {
        let id = parse_id(id)?;

        let result = sqlx::query(
            "UPDATE vocabulary_words SET mastery_level = $1, last_reviewed = NOW() WHERE id = $2",
        )
        .bind(i32::from(level.value()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(StoreError::Write)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn delete_word(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;

        let result = sqlx::query("DELETE FROM vocabulary_words WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Write)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

// A malformed id cannot match any row, so it reads as not-found rather
// than a client syntax error.
fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::NotFound)
}

fn row_to_word(row: PgRow) -> Result<WordRecord, StoreError> {
    let id: Uuid = row.try_get("id").map_err(StoreError::Fetch)?;
    let word: String = row.try_get("word").map_err(StoreError::Fetch)?;
    let definition: String = row.try_get("definition").map_err(StoreError::Fetch)?;
    let example: Option<String> = row.try_get("example").map_err(StoreError::Fetch)?;
    let mastery_level: i32 = row.try_get("mastery_level").map_err(StoreError::Fetch)?;
    let last_reviewed: Option<DateTime<Utc>> =
        row.try_get("last_reviewed").map_err(StoreError::Fetch)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(StoreError::Fetch)?;

    Ok(WordRecord {
        id: id.to_string(),
        word,
        definition,
        example,
        mastery_level: u8::try_from(mastery_level)
            .ok()
            .and_then(MasteryLevel::new)
            .unwrap_or_default(),
        last_reviewed,
        created_at,
    })
}
