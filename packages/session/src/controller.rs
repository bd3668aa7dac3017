//! The session state machine.
//!
//! Drives one bounded pass over a prebuilt word queue. All transitions
//! are pure in-memory operations and cannot fail; mastery updates are
//! returned as [`MasteryUpdate`] values for the host to persist, and
//! the cursor advances without waiting on that persistence.

use serde::{Deserialize, Serialize};

use crate::types::{MasteryLevel, MasteryUpdate, WordRecord};

/// Lifecycle phase of a session.
///
/// `Empty` is entered at construction when the queue has no words; no
/// transition out of it exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Completed,
    Empty,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Completed | SessionPhase::Empty)
    }
}

/// Snapshot of the session handed to the presentation layer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_word: Option<WordRecord>,
    /// 1-based position of the current card, 0 when no card is shown
    pub position: usize,
    pub total: usize,
    /// Completed fraction in [0, 1]
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<usize>,
    pub terminal: bool,
}

/// Owns one session's state: the fixed queue, the cursor, per-card
/// selection, and the single-shot completion edge.
#[derive(Debug)]
pub struct SessionController {
    words: Vec<WordRecord>,
    current_index: usize,
    phase: SessionPhase,
    selected_option: Option<usize>,
    completion_signaled: bool,
}

impl SessionController {
    /// A learning session presents cards immediately; no explicit start.
    pub fn learning(words: Vec<WordRecord>) -> Self {
        let phase = if words.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::InProgress
        };
        Self::new(words, phase)
    }

    /// A review session waits on [`start`](Self::start).
    pub fn review(words: Vec<WordRecord>) -> Self {
        let phase = if words.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::NotStarted
        };
        Self::new(words, phase)
    }

    fn new(words: Vec<WordRecord>, phase: SessionPhase) -> Self {
        Self {
            words,
            current_index: 0,
            phase,
            selected_option: None,
            completion_signaled: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn total(&self) -> usize {
        self.words.len()
    }

    /// The card under the cursor, if one is being presented.
    pub fn current_word(&self) -> Option<&WordRecord> {
        match self.phase {
            SessionPhase::InProgress => self.words.get(self.current_index),
            _ => None,
        }
    }

    pub fn start(&mut self) {
        if self.phase == SessionPhase::NotStarted {
            self.phase = SessionPhase::InProgress;
        }
    }

    /// Records the user's option pick for the current card. Only the
    /// first pick per card counts; later picks are ignored.
    pub fn answer(&mut self, option_index: usize) {
        if self.phase == SessionPhase::InProgress && self.selected_option.is_none() {
            self.selected_option = Some(option_index);
        }
    }

    /// Moves to the next card, clearing per-card state. Stepping past
    /// the last card completes the session.
    pub fn advance(&mut self) {
        if self.phase != SessionPhase::InProgress {
            return;
        }
        self.selected_option = None;
        if self.current_index + 1 < self.words.len() {
            self.current_index += 1;
        } else {
            self.phase = SessionPhase::Completed;
        }
    }

    /// Ends the session early.
    pub fn abort(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::NotStarted | SessionPhase::InProgress
        ) {
            self.selected_option = None;
            self.phase = SessionPhase::Completed;
        }
    }

    /// Applies a mastery rating to the current card and advances. The
    /// returned update is for the host to persist; the advance does not
    /// depend on that write.
    pub fn rate(&mut self, level: MasteryLevel) -> Option<MasteryUpdate> {
        let update = self.current_word().map(|word| MasteryUpdate {
            word_id: word.id.clone(),
            level,
        });
        self.advance();
        update
    }

    /// "mastered" button: level 3.
    pub fn mark_mastered(&mut self) -> Option<MasteryUpdate> {
        self.rate(MasteryLevel::FAMILIAR)
    }

    /// "needs review" button: level 1.
    pub fn mark_needs_review(&mut self) -> Option<MasteryUpdate> {
        self.rate(MasteryLevel::SEEN)
    }

    /// Returns true exactly once, on the first call after the session
    /// has completed. This is the `onComplete` edge.
    pub fn take_completion(&mut self) -> bool {
        if self.phase == SessionPhase::Completed && !self.completion_signaled {
            self.completion_signaled = true;
            true
        } else {
            false
        }
    }

    pub fn view(&self) -> SessionView {
        let total = self.words.len();
        let (position, progress) = match self.phase {
            SessionPhase::InProgress => (
                self.current_index + 1,
                (self.current_index + 1) as f64 / total as f64,
            ),
            SessionPhase::Completed => (total, 1.0),
            _ => (0, 0.0),
        };

        SessionView {
            phase: self.phase,
            current_word: self.current_word().cloned(),
            position,
            total,
            progress,
            selected_option: self.selected_option,
            terminal: self.phase.is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn words(n: usize) -> Vec<WordRecord> {
        (0..n)
            .map(|i| WordRecord {
                id: format!("w{i}"),
                word: format!("word{i}"),
                definition: format!("meaning {i}"),
                example: None,
                mastery_level: MasteryLevel::UNKNOWN,
                last_reviewed: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn empty_queue_is_terminal_immediately() {
        let mut session = SessionController::review(Vec::new());
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.view().terminal);

        // no way into InProgress from Empty
        session.start();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(!session.take_completion());
    }

    #[test]
    fn learning_session_starts_in_progress() {
        let session = SessionController::learning(words(3));
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_word().unwrap().id, "w0");
    }

    #[test]
    fn review_session_needs_explicit_start() {
        let mut session = SessionController::review(words(3));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.current_word().is_none());

        session.start();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.current_word().unwrap().id, "w0");
    }

    #[test]
    fn n_advances_complete_an_n_word_session() {
        let n = 5;
        let mut session = SessionController::learning(words(n));

        for _ in 0..n - 1 {
            session.advance();
            assert_eq!(session.phase(), SessionPhase::InProgress);
        }
        session.advance();
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!((session.view().progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let mut session = SessionController::learning(words(1));
        session.advance();
        assert!(session.take_completion());
        assert!(!session.take_completion());

        // further advances stay terminal and silent
        session.advance();
        assert!(!session.take_completion());
    }

    #[test]
    fn abort_completes_early() {
        let mut session = SessionController::learning(words(4));
        session.advance();
        session.abort();
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(session.take_completion());
    }

    #[test]
    fn answer_records_only_first_pick() {
        let mut session = SessionController::learning(words(2));
        session.answer(2);
        session.answer(0);
        assert_eq!(session.view().selected_option, Some(2));

        // advancing clears the pick
        session.advance();
        assert_eq!(session.view().selected_option, None);
    }

    #[test]
    fn rate_emits_literal_level_and_advances() {
        let mut session = SessionController::learning(words(2));

        let update = session.mark_needs_review().unwrap();
        assert_eq!(update.word_id, "w0");
        assert_eq!(update.level, MasteryLevel::SEEN);
        assert_eq!(session.current_word().unwrap().id, "w1");

        let update = session.mark_mastered().unwrap();
        assert_eq!(update.word_id, "w1");
        assert_eq!(update.level, MasteryLevel::FAMILIAR);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn rate_level_is_literal_regardless_of_prior_level() {
        let mut pool = words(2);
        pool[0].mastery_level = MasteryLevel::FAMILIAR;
        let mut session = SessionController::learning(pool);

        let update = session.rate(MasteryLevel::UNKNOWN).unwrap();
        assert_eq!(update.level, MasteryLevel::UNKNOWN);
    }

    #[test]
    fn rate_after_completion_yields_nothing() {
        let mut session = SessionController::learning(words(1));
        session.advance();
        assert!(session.rate(MasteryLevel::KNOWN).is_none());
    }

    #[test]
    fn progress_tracks_position() {
        let mut session = SessionController::learning(words(4));
        let view = session.view();
        assert_eq!(view.position, 1);
        assert!((view.progress - 0.25).abs() < 1e-9);

        session.advance();
        let view = session.view();
        assert_eq!(view.position, 2);
        assert!((view.progress - 0.5).abs() < 1e-9);
    }
}
