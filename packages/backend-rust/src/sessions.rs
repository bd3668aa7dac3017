//! In-memory registry of active flashcard sessions.
//!
//! Each session owns one [`SessionController`] plus the word pool it
//! draws distractors from and its own RNG. Sessions are removed from
//! the registry once their terminal view has been produced, so the
//! completion edge is served exactly once; a later lookup is a 404 at
//! the route layer.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use lexi_session::{
    build_learning_queue, build_review_queue, generate_options, MasteryLevel, MasteryUpdate,
    QueueFilter, QuizOption, ReviewOrder, SessionController, SessionView, WordRecord,
    DEFAULT_MAX_WORDS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Learning,
    Review,
}

/// User actions a session accepts after creation.
#[derive(Debug, Clone, Copy)]
pub enum SessionAction {
    Start,
    Answer(usize),
    Next,
    Rate(MasteryLevel),
    Abort,
}

/// Wire snapshot of one session, flattening the controller view.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub mode: SessionMode,
    #[serde(flatten)]
    pub view: SessionView,
    /// Quiz options for the current card; empty in review mode or when
    /// the pool is too small for a quiz
    pub options: Vec<QuizOption>,
    /// Pending failure notice from a background mastery write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

struct ActiveSession {
    mode: SessionMode,
    controller: SessionController,
    pool: Vec<WordRecord>,
    options: Vec<QuizOption>,
    rng: StdRng,
    notice: Option<String>,
}

impl ActiveSession {
    fn refresh_options(&mut self) {
        self.options = match (self.mode, self.controller.current_word()) {
            (SessionMode::Learning, Some(word)) => {
                generate_options(word, &self.pool, &mut self.rng)
            }
            _ => Vec::new(),
        };
    }

    fn snapshot(&self, id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            session_id: id.to_string(),
            mode: self.mode,
            view: self.controller.view(),
            options: self.options.clone(),
            notice: self.notice.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, ActiveSession>>>,
}

impl SessionRegistry {
    /// Builds a session queue from the given pool and registers the
    /// session unless it is already terminal (empty pool).
    pub async fn create(
        &self,
        mode: SessionMode,
        max_words: Option<usize>,
        order: Option<ReviewOrder>,
        filter: QueueFilter,
        pool: Vec<WordRecord>,
    ) -> SessionSnapshot {
        let mut rng = StdRng::from_entropy();

        let controller = match mode {
            SessionMode::Learning => {
                let queue = build_learning_queue(
                    pool.clone(),
                    max_words.unwrap_or(DEFAULT_MAX_WORDS),
                    &filter,
                    &mut rng,
                );
                SessionController::learning(queue)
            }
            SessionMode::Review => {
                let queue = build_review_queue(pool.clone(), order.unwrap_or_default(), &mut rng);
                SessionController::review(queue)
            }
        };

        let mut session = ActiveSession {
            mode,
            controller,
            pool,
            options: Vec::new(),
            rng,
            notice: None,
        };
        session.refresh_options();

        let id = Uuid::new_v4();
        let snapshot = session.snapshot(id);

        if snapshot.view.terminal {
            tracing::info!(session_id = %id, mode = ?mode, "session terminal at creation");
        } else {
            tracing::info!(session_id = %id, mode = ?mode, total = snapshot.view.total, "session created");
            let mut sessions = self.sessions.write().await;
            sessions.insert(id, session);
        }

        snapshot
    }

    /// Current snapshot without mutating the session.
    pub async fn view(&self, id: Uuid) -> Option<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        sessions.get(&id).map(|session| session.snapshot(id))
    }

    /// Applies one user action. Returns the resulting snapshot plus any
    /// mastery update the caller should persist. Terminal sessions are
    /// dropped after their snapshot is taken.
    pub async fn apply(
        &self,
        id: Uuid,
        action: SessionAction,
    ) -> Option<(SessionSnapshot, Option<MasteryUpdate>)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;

        let card_before = session
            .controller
            .current_word()
            .map(|word| word.id.clone());

        let update = match action {
            SessionAction::Start => {
                session.controller.start();
                None
            }
            SessionAction::Answer(index) => {
                if session.mode == SessionMode::Learning && index < session.options.len() {
                    session.controller.answer(index);
                }
                None
            }
            SessionAction::Next => {
                session.controller.advance();
                None
            }
            SessionAction::Rate(level) => session.controller.rate(level),
            SessionAction::Abort => {
                session.controller.abort();
                None
            }
        };

        // options are re-derived only when the card changes, so an
        // answer keeps referring to the options it was picked from
        let card_after = session
            .controller
            .current_word()
            .map(|word| word.id.clone());
        if card_before != card_after {
            session.refresh_options();
        }

        if session.controller.take_completion() {
            tracing::info!(session_id = %id, "session completed");
        }

        let snapshot = session.snapshot(id);
        if snapshot.view.terminal {
            sessions.remove(&id);
        }

        Some((snapshot, update))
    }

    /// Attaches a failure notice from a background mastery write. The
    /// session may already be gone; that is fine, the failure was
    /// logged at the write site.
    pub async fn set_notice(&self, id: Uuid, message: String) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.notice = Some(message);
        }
    }
}
