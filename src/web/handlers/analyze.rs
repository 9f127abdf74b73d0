// POST /analyze: score a submitted text for novelty.
//
// Body: {"article": "<text>"}
//
// Returns 500 when the engine failed to initialize, 400 for malformed or
// unacceptable submissions, 500 when embedding or scoring fails, and 200
// with the verdict otherwise. Successful analyses are added to history.
//
// The body is taken as raw bytes rather than through the Json extractor so
// the "not initialized" check runs before any parsing, and so a malformed
// body gets our error envelope instead of axum's rejection text.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use crate::pipeline::{Analysis, AnalyzeError};
use crate::web::{api_error, AppState};

pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Response {
    match run(&state, &body).await {
        Ok(analysis) => Json(analysis_to_json(&analysis)).into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            api_error(status, &e.to_string())
        }
    }
}

async fn run(state: &AppState, body: &[u8]) -> Result<Analysis, AnalyzeError> {
    let analyzer = state
        .engine
        .analyzer()
        .ok_or(AnalyzeError::NotInitialized)?;

    let article = extract_article(body)?;
    let analysis = analyzer.analyze(&article).await?;

    info!(
        novel = analysis.verdict.is_novel,
        similarity = analysis.verdict.similarity,
        words = analysis.original_words,
        "Analysis complete"
    );

    state.history.insert_at_front(analysis.record.clone()).await;
    Ok(analysis)
}

/// Pull the `article` field out of a JSON object body.
///
/// A body that isn't JSON, or is anything but a non-empty object, is missing
/// data. A missing or non-string `article` reads as empty text.
fn extract_article(body: &[u8]) -> Result<String, AnalyzeError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| AnalyzeError::MissingData)?;

    let object = value
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or(AnalyzeError::MissingData)?;

    Ok(object
        .get("article")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string())
}

fn analysis_to_json(analysis: &Analysis) -> serde_json::Value {
    let verdict = &analysis.verdict;
    let (kind, message, description) = if verdict.is_novel {
        (
            "new",
            "Novelty detected!",
            "This text presents content that is new relative to our knowledge base.",
        )
    } else {
        (
            "similar",
            "Similar content found",
            "This text shows similarities with existing content.",
        )
    };

    serde_json::json!({
        "success": true,
        "result": {
            "type": kind,
            "message": message,
            "description": description,
            "similarity_score": verdict.similarity,
            "confidence": verdict.confidence,
            "novelty_level": verdict.level.as_str(),
        },
        "analysis_details": {
            "original_words": analysis.original_words,
            "processed_words": analysis.processed_words,
            "embedding_dim": analysis.embedding_dim,
            "comparison_base_size": analysis.comparison_base_size,
        }
    })
}
