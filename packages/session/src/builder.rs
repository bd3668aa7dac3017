//! Session queue construction.
//!
//! A learning pass shuffles the word pool and takes a capped prefix; a
//! review pass orders the whole pool, either shuffled or alphabetically.
//! Both use a single-pass Fisher-Yates shuffle, so every permutation is
//! equally likely under the supplied generator.

use rand::seq::SliceRandom;
use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::types::WordRecord;

/// Ordering for a review pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOrder {
    #[default]
    Shuffled,
    /// Lexicographic by headword
    Alphabetical,
}

/// Narrowing criteria for a learning pass.
///
/// The book criterion is accepted but words carry no book link yet, so
/// it currently passes everything through.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueFilter {
    pub book_id: Option<String>,
}

impl QueueFilter {
    fn apply(&self, words: Vec<WordRecord>) -> Vec<WordRecord> {
        words
    }
}

/// Builds the ordered queue for a learning pass: filter, shuffle,
/// truncate to `max_words`. An empty pool yields an empty queue.
pub fn build_learning_queue<R: Rng>(
    words: Vec<WordRecord>,
    max_words: usize,
    filter: &QueueFilter,
    rng: &mut R,
) -> Vec<WordRecord> {
    let mut queue = filter.apply(words);
    queue.shuffle(rng);
    queue.truncate(max_words);
    queue
}

/// Orders the entire pool for a review pass. No cap.
pub fn build_review_queue<R: Rng>(
    mut words: Vec<WordRecord>,
    order: ReviewOrder,
    rng: &mut R,
) -> Vec<WordRecord> {
    match order {
        ReviewOrder::Shuffled => words.shuffle(rng),
        ReviewOrder::Alphabetical => words.sort_by(|a, b| a.word.cmp(&b.word)),
    }
    words
}
