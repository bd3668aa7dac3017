use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexi_session::{MasteryLevel, MasteryUpdate, QueueFilter, ReviewOrder};

use crate::response::{json_error, AppError};
use crate::routes::store_error;
use crate::sessions::{SessionAction, SessionMode};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    mode: SessionMode,
    max_words: Option<usize>,
    order: Option<ReviewOrder>,
    book_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    option_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    level: u8,
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Response {
    // a failed fetch is surfaced, not treated as an empty word set
    let words = match state.store().list_words().await {
        Ok(words) => words,
        Err(err) => {
            tracing::warn!(error = %err, "word fetch for session failed");
            return store_error(err).into_response();
        }
    };

    let filter = QueueFilter {
        book_id: body.book_id,
    };
    let snapshot = state
        .sessions()
        .create(body.mode, body.max_words, body.order, filter, words)
        .await;

    (
        StatusCode::CREATED,
        Json(SuccessResponse {
            success: true,
            data: snapshot,
        }),
    )
        .into_response()
}

pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_session_id(&id) else {
        return session_not_found();
    };

    match state.sessions().view(id).await {
        Some(snapshot) => Json(SuccessResponse {
            success: true,
            data: snapshot,
        })
        .into_response(),
        None => session_not_found(),
    }
}

pub async fn start_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    apply_action(&state, &id, SessionAction::Start).await
}

pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AnswerRequest>,
) -> Response {
    apply_action(&state, &id, SessionAction::Answer(body.option_index)).await
}

pub async fn next_card(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    apply_action(&state, &id, SessionAction::Next).await
}

pub async fn mark_mastered(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    apply_action(&state, &id, SessionAction::Rate(MasteryLevel::FAMILIAR)).await
}

pub async fn mark_needs_review(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    apply_action(&state, &id, SessionAction::Rate(MasteryLevel::SEEN)).await
}

pub async fn rate_card(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RateRequest>,
) -> Response {
    // the flashcard buttons cover 0..=3
    let level = MasteryLevel::new(body.level).filter(|l| l.value() <= 3);
    let Some(level) = level else {
        return AppError::validation("level must be between 0 and 3").into_response();
    };

    apply_action(&state, &id, SessionAction::Rate(level)).await
}

pub async fn abort_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    apply_action(&state, &id, SessionAction::Abort).await
}

async fn apply_action(state: &AppState, id: &str, action: SessionAction) -> Response {
    let Some(id) = parse_session_id(id) else {
        return session_not_found();
    };

    let Some((snapshot, update)) = state.sessions().apply(id, action).await else {
        return session_not_found();
    };

    if let Some(update) = update {
        persist_mastery(state, id, update);
    }

    Json(SuccessResponse {
        success: true,
        data: snapshot,
    })
    .into_response()
}

/// Fire-and-forget persistence of a mastery rating. The session has
/// already advanced; a failed write is logged and attached to the
/// session as a notice for the next view. When the rated card was the
/// last one the session is gone before the write resolves, so the
/// failure surfaces in the log only and the in-memory state is not
/// rolled back.
fn persist_mastery(state: &AppState, session_id: Uuid, update: MasteryUpdate) {
    let store = Arc::clone(state.store());
    let registry = state.sessions().clone();

    tokio::spawn(async move {
        if let Err(err) = store.update_mastery(&update.word_id, update.level).await {
            tracing::warn!(
                error = %err,
                word_id = %update.word_id,
                "background mastery update failed"
            );
            registry
                .set_notice(session_id, "failed to save mastery progress".to_string())
                .await;
        }
    });
}

fn parse_session_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn session_not_found() -> Response {
    json_error(
        StatusCode::NOT_FOUND,
        "SESSION_NOT_FOUND",
        "session not found",
    )
    .into_response()
}
