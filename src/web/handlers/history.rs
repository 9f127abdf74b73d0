// GET /history: the ten most recent analyses, newest first.
// GET /stats  : aggregates over the whole stored history.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

/// Entries returned by /history.
const HISTORY_PAGE: usize = 10;

pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    let history = state.history.recent(HISTORY_PAGE).await;
    let total = state.history.len().await;

    Json(serde_json::json!({
        "success": true,
        "history": history,
        "total_analyses": total,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.history.stats().await;

    Json(serde_json::json!({
        "success": true,
        "stats": stats,
    }))
}
