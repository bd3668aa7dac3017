//! Shared domain types and constants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Default number of words presented in one learning pass
pub const DEFAULT_MAX_WORDS: usize = 5;

/// Number of answer options on a quiz card (1 correct + 3 distractors)
pub const OPTION_COUNT: usize = 4;

/// Highest mastery ordinal
pub const MAX_MASTERY: u8 = 4;

// ==================== Mastery ====================

/// Self-assessed familiarity with a word, ordinal 0..=4.
///
/// The flashcard buttons map onto the first four ordinals; see the
/// named constants. Values outside the range are rejected at
/// construction and deserialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    /// "don't know" button
    pub const UNKNOWN: MasteryLevel = MasteryLevel(0);
    /// "rings a bell" button / "needs review"
    pub const SEEN: MasteryLevel = MasteryLevel(1);
    /// "know it" button
    pub const KNOWN: MasteryLevel = MasteryLevel(2);
    /// "familiar" button / "mastered"
    pub const FAMILIAR: MasteryLevel = MasteryLevel(3);

    pub fn new(level: u8) -> Option<Self> {
        (level <= MAX_MASTERY).then_some(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or_else(|| format!("mastery level out of range: {level}"))
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> u8 {
        level.0
    }
}

// ==================== Word record ====================

/// One vocabulary word as stored by the word store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    /// Store-assigned opaque identifier, unique within the store
    pub id: String,
    /// Display headword, non-empty
    pub word: String,
    /// Primary meaning text, non-empty
    pub definition: String,
    /// Optional usage sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub mastery_level: MasteryLevel,
    /// None until the first mastery update
    pub last_reviewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ==================== Quiz ====================

/// One multiple-choice answer option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

/// A pending mastery persistence command.
///
/// Produced by controller actions; the host delivers it to the word
/// store, which also stamps `last_reviewed = now`. The controller never
/// waits on the outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryUpdate {
    pub word_id: String,
    pub level: MasteryLevel,
}
