//! Axum HTTP server: stateless decision endpoints for a hosting UI.
//!
//! Every endpoint is a pure lookup against the precomputed
//! `YachtContext`, shared as `Arc<YachtContext>` across async handlers.
//! The caller posts the situation (hand, upper total, scored-category
//! mask, rolls left) and receives ranked recommendations; no game state
//! lives server-side.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/categories` | Category index/name table |
//! | POST | `/evaluate` | Ranked category + hold recommendations for one situation |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::constants::*;
use crate::decision::{choose_best_category, compute_best_reroll, rank_categories, rank_reroll_masks};
use crate::types::YachtContext;

pub type AppState = Arc<YachtContext>;

pub fn create_router(ctx: Arc<YachtContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/categories", get(handle_get_categories))
        .route("/evaluate", post(handle_evaluate))
        .layer(cors)
        .with_state(ctx)
}

// ── Request/Response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct EvaluateRequest {
    dice: [i32; 5],
    upper_score: i32,
    scored_categories: i32,
    rolls_left: i32,
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": msg })))
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}

async fn handle_get_categories() -> Json<serde_json::Value> {
    let categories: Vec<serde_json::Value> = (0..CATEGORY_COUNT)
        .map(|id| serde_json::json!({ "id": id, "name": category_name(id) }))
        .collect();
    Json(serde_json::json!({ "categories": categories }))
}

// ── POST handler ────────────────────────────────────────────────────

async fn handle_evaluate(
    State(ctx): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    if !(0..MAX_ROLLS_PER_TURN).contains(&req.rolls_left) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "rolls_left must be 0, 1, or 2",
        ));
    }
    if req.dice.iter().any(|&d| !(1..=6).contains(&d)) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "dice faces must be in 1..=6",
        ));
    }
    if !(0..1 << CATEGORY_COUNT).contains(&req.scored_categories) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "scored_categories must be a 12-bit mask",
        ));
    }
    if req.upper_score < 0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "upper_score must be non-negative",
        ));
    }
    let upper_score = req.upper_score.min(UPPER_BONUS_THRESHOLD);

    let categories: Vec<serde_json::Value> =
        rank_categories(&ctx, upper_score, req.scored_categories, &req.dice)
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.category,
                    "name": category_name(c.category),
                    "score": c.score,
                    "expected_value": c.expected_value,
                })
            })
            .collect();
    let optimal_category = choose_best_category(&ctx, upper_score, req.scored_categories, &req.dice);

    let mut result = serde_json::json!({
        "categories": categories,
        "optimal_category": optimal_category.map(|c| c.category),
    });

    // Hold recommendations only exist while a reroll is available and
    // at least one category is still open to aim for.
    let all_scored = (1 << CATEGORY_COUNT) - 1;
    if req.rolls_left > 0 && req.scored_categories != all_scored {
        let hold_choices: Vec<serde_json::Value> = rank_reroll_masks(
            &ctx,
            upper_score,
            req.scored_categories,
            &req.dice,
            0,
            req.rolls_left,
        )
        .iter()
        .map(|h| {
            serde_json::json!({
                "holds": h.holds,
                "expected_value": h.expected_value,
            })
        })
        .collect();
        let (mask, ev) = compute_best_reroll(
            &ctx,
            upper_score,
            req.scored_categories,
            &req.dice,
            0,
            req.rolls_left,
        );
        let optimal_holds: Vec<bool> = (0..5).map(|i| mask & (1 << i) == 0).collect();

        result["hold_choices"] = serde_json::json!(hold_choices);
        result["optimal_holds"] = serde_json::json!(optimal_holds);
        result["optimal_holds_ev"] = serde_json::json!(ev);
    }

    Ok(Json(result))
}
