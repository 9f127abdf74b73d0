// GET /system_info: loaded-state flags, model and reference details.
// GET /health     : liveness plus model/reference load status.
//
// Both are pure reads and answer even when the engine is degraded.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, Utc};

use crate::web::AppState;

pub async fn system_info(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.engine.status();
    let total = state.history.len().await;

    Json(serde_json::json!({
        "success": true,
        "system_info": {
            "model_loaded": status.model_loaded,
            "base_vectors_loaded": status.reference_loaded,
            "model_name": status.model_name.as_deref().unwrap_or("Not loaded"),
            "embedding_dimension": status.embedding_dimension,
            "reference_base_size": status.reference_size,
            "total_analyses": total,
            "timestamp": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "uptime_seconds": state.started_at.elapsed().as_secs(),
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.engine.status();
    let loaded = |ok: bool| if ok { "loaded" } else { "error" };

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "model_status": loaded(status.model_loaded),
        "database_status": loaded(status.reference_loaded),
    }))
}
