use std::collections::HashSet;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};

mod common;

async fn seed_words(app: &Router, words: &[(&str, &str)]) {
    for (word, definition) in words {
        let response = common::post_json(
            app,
            "/api/words",
            json!({"word": word, "definition": definition}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

fn sample_words() -> Vec<(&'static str, &'static str)> {
    vec![
        ("cat", "a feline"),
        ("dog", "a canine"),
        ("sun", "a star"),
        ("moon", "a satellite"),
    ]
}

/// Waits for the fire-and-forget mastery write to land.
async fn wait_for_mastery(app: &Router, word_id: &str, level: u64) {
    for _ in 0..100 {
        let response = common::get(app, "/api/words").await;
        let body = common::body_json(response).await;
        let found = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|w| w["id"] == word_id)
            .cloned();

        if let Some(word) = found {
            if word["masteryLevel"] == level {
                assert!(!word["lastReviewed"].is_null());
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("mastery level {level} for word {word_id} never persisted");
}

fn correct_option<'a>(snapshot: &'a Value) -> &'a Value {
    let correct: Vec<&Value> = snapshot["options"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|o| o["isCorrect"] == true)
        .collect();
    assert_eq!(correct.len(), 1);
    correct[0]
}

#[tokio::test]
async fn test_learning_session_end_to_end() {
    let app = common::create_test_app().await;
    seed_words(&app, &sample_words()).await;

    let response = common::post_json(
        &app,
        "/api/sessions",
        json!({"mode": "learning", "maxWords": 5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    let mut snapshot = body["data"].clone();
    assert_eq!(snapshot["phase"], "in_progress");
    assert_eq!(snapshot["total"], 4);
    assert_eq!(snapshot["position"], 1);

    let session_id = snapshot["sessionId"].as_str().unwrap().to_string();
    let mut seen: HashSet<String> = HashSet::new();

    for step in 0..4 {
        let word = &snapshot["currentWord"];
        seen.insert(word["id"].as_str().unwrap().to_string());

        // 4 options, the single correct one carries the word's definition
        assert_eq!(snapshot["options"].as_array().unwrap().len(), 4);
        assert_eq!(correct_option(&snapshot)["text"], word["definition"]);

        let response =
            common::post_empty(&app, &format!("/api/sessions/{session_id}/next")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = common::body_json(response).await;
        snapshot = body["data"].clone();

        if step < 3 {
            assert_eq!(snapshot["phase"], "in_progress");
            assert_eq!(snapshot["position"], Value::from(step + 2));
        }
    }

    assert_eq!(snapshot["phase"], "completed");
    assert_eq!(snapshot["terminal"], true);
    assert_eq!(seen.len(), 4);

    // the terminal view is served once; the session is gone afterwards
    let response = common::get(&app, &format!("/api/sessions/{session_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_store_session_is_terminal() {
    let app = common::create_test_app().await;

    let response = common::post_json(&app, "/api/sessions", json!({"mode": "learning"})).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    let snapshot = &body["data"];
    assert_eq!(snapshot["phase"], "empty");
    assert_eq!(snapshot["terminal"], true);
    assert_eq!(snapshot["total"], 0);
    assert!(snapshot.get("currentWord").is_none());
}

#[tokio::test]
async fn test_review_session_start_and_abort() {
    let app = common::create_test_app().await;
    seed_words(&app, &[("banana", "a fruit"), ("apple", "another fruit")]).await;

    let response = common::post_json(
        &app,
        "/api/sessions",
        json!({"mode": "review", "order": "alphabetical"}),
    )
    .await;
    let body = common::body_json(response).await;
    let snapshot = &body["data"];
    assert_eq!(snapshot["phase"], "not_started");
    assert!(snapshot.get("currentWord").is_none());
    let session_id = snapshot["sessionId"].as_str().unwrap().to_string();

    let response = common::post_empty(&app, &format!("/api/sessions/{session_id}/start")).await;
    let body = common::body_json(response).await;
    let snapshot = &body["data"];
    assert_eq!(snapshot["phase"], "in_progress");
    assert_eq!(snapshot["currentWord"]["word"], "apple");
    // review cards carry no quiz options
    assert!(snapshot["options"].as_array().unwrap().is_empty());

    let response = common::post_empty(&app, &format!("/api/sessions/{session_id}/abort")).await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["phase"], "completed");
    assert_eq!(body["data"]["terminal"], true);
}

#[tokio::test]
async fn test_mastered_persists_level_3() {
    let app = common::create_test_app().await;
    seed_words(&app, &sample_words()).await;

    let response = common::post_json(
        &app,
        "/api/sessions",
        json!({"mode": "learning", "maxWords": 1}),
    )
    .await;
    let body = common::body_json(response).await;
    let word_id = body["data"]["currentWord"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

    let response =
        common::post_empty(&app, &format!("/api/sessions/{session_id}/mastered")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    // the advance does not wait on the write
    assert_eq!(body["data"]["terminal"], true);

    wait_for_mastery(&app, &word_id, 3).await;
}

#[tokio::test]
async fn test_needs_review_persists_level_1() {
    let app = common::create_test_app().await;
    seed_words(&app, &sample_words()).await;

    let response = common::post_json(
        &app,
        "/api/sessions",
        json!({"mode": "learning", "maxWords": 1}),
    )
    .await;
    let body = common::body_json(response).await;
    let word_id = body["data"]["currentWord"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

    common::post_empty(&app, &format!("/api/sessions/{session_id}/needs-review")).await;

    wait_for_mastery(&app, &word_id, 1).await;
}

#[tokio::test]
async fn test_rate_endpoint_validates_level() {
    let app = common::create_test_app().await;
    seed_words(&app, &sample_words()).await;

    let response = common::post_json(&app, "/api/sessions", json!({"mode": "learning"})).await;
    let body = common::body_json(response).await;
    let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

    let response = common::post_json(
        &app,
        &format!("/api/sessions/{session_id}/rate"),
        json!({"level": 7}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::post_json(
        &app,
        &format!("/api/sessions/{session_id}/rate"),
        json!({"level": 0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["position"], 2);
}

#[tokio::test]
async fn test_answer_records_first_pick_only() {
    let app = common::create_test_app().await;
    seed_words(
        &app,
        &[
            ("cat", "a feline"),
            ("dog", "a canine"),
            ("sun", "a star"),
            ("moon", "a satellite"),
            ("sea", "a body of water"),
        ],
    )
    .await;

    let response = common::post_json(
        &app,
        "/api/sessions",
        json!({"mode": "learning", "maxWords": 2}),
    )
    .await;
    let body = common::body_json(response).await;
    let session_id = body["data"]["sessionId"].as_str().unwrap().to_string();

    let response = common::post_json(
        &app,
        &format!("/api/sessions/{session_id}/answer"),
        json!({"optionIndex": 2}),
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["selectedOption"], 2);

    let response = common::post_json(
        &app,
        &format!("/api/sessions/{session_id}/answer"),
        json!({"optionIndex": 0}),
    )
    .await;
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["selectedOption"], 2);

    let response = common::post_empty(&app, &format!("/api/sessions/{session_id}/next")).await;
    let body = common::body_json(response).await;
    assert!(body["data"].get("selectedOption").is_none());
    assert_eq!(body["data"]["position"], 2);
}

#[tokio::test]
async fn test_small_pool_skips_quiz_options() {
    let app = common::create_test_app().await;
    seed_words(&app, &[("cat", "a feline"), ("dog", "a canine")]).await;

    let response = common::post_json(&app, "/api/sessions", json!({"mode": "learning"})).await;
    let body = common::body_json(response).await;
    let snapshot = &body["data"];

    // session runs, but no quiz can be built from a pool under 4 words
    assert_eq!(snapshot["phase"], "in_progress");
    assert!(snapshot["options"].as_array().unwrap().is_empty());
}
