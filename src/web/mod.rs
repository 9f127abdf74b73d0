// Web server: Axum JSON API plus the embedded landing page.
//
// The landing page and its script are embedded at compile time via
// include_dir!. JSON endpoints share one response envelope: every body
// carries a `success` flag, and failures carry an `error` message.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use include_dir::{include_dir, Dir};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::history::HistoryStore;
use crate::pipeline::Engine;

pub mod handlers;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/static");

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub history: Arc<HistoryStore>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(engine: Engine, history: HistoryStore) -> Self {
        Self {
            engine: Arc::new(engine),
            history: Arc::new(history),
            started_at: Instant::now(),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("NeuroScan listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/history", get(handlers::history::get_history))
        .route("/stats", get(handlers::history::get_stats))
        .route("/system_info", get(handlers::system::system_info))
        .route("/health", get(handlers::system::health))
        .fallback(serve_asset)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_index() -> Response {
    match ASSETS.get_file("index.html") {
        Some(index) => asset_response(index.contents(), "index.html"),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            Body::from("Landing page not found"),
        )
            .into_response(),
    }
}

/// Serve embedded static files; anything else is a JSON 404.
async fn serve_asset(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    match ASSETS.get_file(path) {
        Some(file) => asset_response(file.contents(), path),
        None => api_error(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn asset_response(contents: &'static [u8], path: &str) -> Response {
    let mime = mime_type(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(mime))
        .body(Body::from(contents))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "css" => "text/css",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// JSON error envelope: `{"success": false, "error": message}`.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        axum::Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}
