mod health;
mod sessions;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::response::{json_error, AppError};
use crate::state::AppState;
use crate::store::StoreError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .route("/api/words", get(words::list_words).post(words::create_word))
        .route("/api/words/stats", get(words::word_stats))
        .route("/api/words/:id", delete(words::delete_word))
        .route("/api/words/:id/mastery", put(words::update_mastery))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/:id", get(sessions::get_session))
        .route("/api/sessions/:id/start", post(sessions::start_session))
        .route("/api/sessions/:id/answer", post(sessions::answer))
        .route("/api/sessions/:id/next", post(sessions::next_card))
        .route("/api/sessions/:id/mastered", post(sessions::mark_mastered))
        .route(
            "/api/sessions/:id/needs-review",
            post(sessions::mark_needs_review),
        )
        .route("/api/sessions/:id/rate", post(sessions::rate_card))
        .route("/api/sessions/:id/abort", post(sessions::abort_session))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}

pub(crate) fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::Unavailable(_) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "STORE_UNAVAILABLE",
            "word store unavailable, check the database configuration",
        ),
        StoreError::Fetch(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "FETCH_FAILED",
            "failed to load words",
        ),
        StoreError::Write(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "WRITE_FAILED",
            "failed to save word data",
        ),
        StoreError::NotFound => AppError::not_found("word not found"),
    }
}
