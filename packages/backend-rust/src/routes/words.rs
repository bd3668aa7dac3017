use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use lexi_session::{MasteryLevel, WordRecord};

use crate::response::AppError;
use crate::routes::store_error;
use crate::state::AppState;
use crate::store::NewWord;

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct SuccessResponseWithPagination<T, P> {
    success: bool,
    data: T,
    pagination: P,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWordsQuery {
    page: Option<usize>,
    page_size: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PagePagination {
    page: usize,
    page_size: usize,
    total: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMasteryRequest {
    level: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WordStatsResponse {
    total_words: usize,
    mastered_words: usize,
}

pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<ListWordsQuery>,
) -> Response {
    let words = match state.store().list_words().await {
        Ok(words) => words,
        Err(err) => {
            tracing::warn!(error = %err, "words list query failed");
            return store_error(err).into_response();
        }
    };

    match query.page {
        Some(page) => {
            let page = page.max(1);
            let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
            let total = words.len();
            // query params are caller-controlled; keep the skip from
            // overflowing on absurd page numbers
            let data: Vec<WordRecord> = words
                .into_iter()
                .skip((page - 1).saturating_mul(page_size))
                .take(page_size)
                .collect();

            Json(SuccessResponseWithPagination {
                success: true,
                data,
                pagination: PagePagination {
                    page,
                    page_size,
                    total,
                },
            })
            .into_response()
        }
        None => Json(SuccessResponse {
            success: true,
            data: words,
        })
        .into_response(),
    }
}

pub async fn create_word(State(state): State<AppState>, Json(body): Json<NewWord>) -> Response {
    let word = body.word.trim();
    if word.is_empty() {
        return AppError::validation("word must not be empty").into_response();
    }
    let definition = body.definition.trim();
    if definition.is_empty() {
        return AppError::validation("definition must not be empty").into_response();
    }

    let new_word = NewWord {
        word: word.to_string(),
        definition: definition.to_string(),
        example: body.example.filter(|example| !example.trim().is_empty()),
    };

    match state.store().add_word(new_word).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(SuccessResponse {
                success: true,
                data: record,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "word insert failed");
            store_error(err).into_response()
        }
    }
}

pub async fn update_mastery(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateMasteryRequest>,
) -> Response {
    let Some(level) = MasteryLevel::new(body.level) else {
        return AppError::validation("mastery level must be between 0 and 4").into_response();
    };

    match state.store().update_mastery(&id, level).await {
        Ok(()) => Json(MessageResponse {
            success: true,
            message: "mastery level updated",
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, word_id = %id, "mastery update failed");
            store_error(err).into_response()
        }
    }
}

pub async fn delete_word(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store().delete_word(&id).await {
        Ok(()) => Json(MessageResponse {
            success: true,
            message: "word deleted",
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, word_id = %id, "word delete failed");
            store_error(err).into_response()
        }
    }
}

pub async fn word_stats(State(state): State<AppState>) -> Response {
    let words = match state.store().list_words().await {
        Ok(words) => words,
        Err(err) => {
            tracing::warn!(error = %err, "words stats query failed");
            return store_error(err).into_response();
        }
    };

    let mastered_words = words
        .iter()
        .filter(|w| w.mastery_level >= MasteryLevel::FAMILIAR)
        .count();

    Json(SuccessResponse {
        success: true,
        data: WordStatsResponse {
            total_words: words.len(),
            mastered_words,
        },
    })
    .into_response()
}
