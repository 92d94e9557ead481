//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt) — no TCP binding
//! needed. Each test gets its own Router but shares the precomputed
//! context.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use yacht::constants::*;
use yacht::phase0_tables;
use yacht::server::create_router;
use yacht::types::YachtContext;

static CTX: std::sync::OnceLock<Arc<YachtContext>> = std::sync::OnceLock::new();

fn get_ctx() -> Arc<YachtContext> {
    CTX.get_or_init(|| {
        let mut ctx = YachtContext::new_boxed();
        phase0_tables::precompute_lookup_tables(&mut ctx);
        Arc::new(*ctx)
    })
    .clone()
}

fn app() -> axum::Router {
    create_router(get_ctx())
}

/// Parse response body as JSON.
async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn evaluate_request(body: serde_json::Value) -> Request<Body> {
    Request::post("/evaluate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── GET /health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let resp = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "OK");
}

// ── GET /categories ──────────────────────────────────────────────────

#[tokio::test]
async fn categories_lists_all_twelve() {
    let resp = app()
        .oneshot(Request::get("/categories").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    let cats = json["categories"].as_array().unwrap();
    assert_eq!(cats.len(), CATEGORY_COUNT);
    assert_eq!(cats[0]["name"], "Ones");
    assert_eq!(cats[CATEGORY_YACHT]["name"], "Yacht");
}

// ── POST /evaluate ───────────────────────────────────────────────────

#[tokio::test]
async fn evaluate_ranks_categories_and_holds() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [5, 5, 5, 5, 2],
            "upper_score": 0,
            "scored_categories": 0,
            "rolls_left": 1,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;

    assert_eq!(json["optimal_category"], CATEGORY_FIVES);
    let cats = json["categories"].as_array().unwrap();
    assert_eq!(cats.len(), CATEGORY_COUNT);
    assert_eq!(cats[0]["id"], CATEGORY_FIVES);
    assert_eq!(cats[0]["score"], 20);

    let holds = json["hold_choices"].as_array().unwrap();
    assert!(!holds.is_empty());
    let evs: Vec<f64> = holds
        .iter()
        .map(|h| h["expected_value"].as_f64().unwrap())
        .collect();
    assert!(evs.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(json["optimal_holds"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn evaluate_final_roll_has_no_hold_section() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [1, 2, 3, 4, 5],
            "upper_score": 30,
            "scored_categories": 7,
            "rolls_left": 0,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert!(json.get("hold_choices").is_none());
    assert!(json["optimal_category"].is_number());
}

#[tokio::test]
async fn evaluate_everything_scored_is_empty_not_an_error() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [1, 2, 3, 4, 5],
            "upper_score": 63,
            "scored_categories": (1 << CATEGORY_COUNT) - 1,
            "rolls_left": 0,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 0);
    assert!(json["optimal_category"].is_null());
}

#[tokio::test]
async fn evaluate_rejects_bad_rolls_left() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [1, 2, 3, 4, 5],
            "upper_score": 0,
            "scored_categories": 0,
            "rolls_left": 3,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn evaluate_rejects_bad_faces() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [0, 2, 3, 4, 7],
            "upper_score": 0,
            "scored_categories": 0,
            "rolls_left": 1,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("dice"));
}

#[tokio::test]
async fn evaluate_rejects_bad_mask() {
    let resp = app()
        .oneshot(evaluate_request(serde_json::json!({
            "dice": [1, 2, 3, 4, 5],
            "upper_score": 0,
            "scored_categories": 1 << CATEGORY_COUNT,
            "rolls_left": 1,
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
