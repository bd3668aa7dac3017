//! Multiple-choice option generation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{QuizOption, WordRecord, OPTION_COUNT};

/// Derives the answer options for one quiz card: the target's
/// definition plus three distinct distractor definitions sampled
/// without replacement from the rest of the pool, in random order.
///
/// Returns an empty vector when the pool holds fewer than
/// [`OPTION_COUNT`] words; the caller skips quiz rendering in that
/// case. Distractors that happen to share the correct definition text
/// are kept as-is.
pub fn generate_options<R: Rng>(
    target: &WordRecord,
    pool: &[WordRecord],
    rng: &mut R,
) -> Vec<QuizOption> {
    if pool.len() < OPTION_COUNT {
        return Vec::new();
    }

    let distractor_pool: Vec<&WordRecord> = pool.iter().filter(|w| w.id != target.id).collect();

    let mut options: Vec<QuizOption> = distractor_pool
        .choose_multiple(rng, OPTION_COUNT - 1)
        .map(|w| QuizOption {
            text: w.definition.clone(),
            is_correct: false,
        })
        .collect();

    options.push(QuizOption {
        text: target.definition.clone(),
        is_correct: true,
    });
    options.shuffle(rng);
    options
}
