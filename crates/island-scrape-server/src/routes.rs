//! HTTP routes for the scrape service.
//!
//! A thin adapter over [`Pipeline::run`]: validate the URL, run the pipeline
//! on its own task, map the outcome to a status code.

use crate::config::ServerConfig;
use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use island_scrape::{HttpFetcher, Pipeline};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
pub struct AppState {
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/healthcheck", get(healthcheck))
        .route("/api/scrape-product", post(scrape_product))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(config.fetcher.clone())?;
    let pipeline = Pipeline::new(Arc::new(fetcher), config.pacing);
    let app = router(Arc::new(AppState::new(pipeline)));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        min_delay_ms = config.pacing.min.as_millis() as u64,
        max_delay_ms = config.pacing.max.as_millis() as u64,
        "listening on http://{}",
        config.addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn healthcheck() -> Json<Value> {
    Json(serde_json::json!({ "message": "OK", "status": 200 }))
}

async fn index() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Hello World",
        "status": 200,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn scrape_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::warn!("rejected request body: {e}");
        ApiError::MalformedInput("URL is required".to_string())
    })?;
    let url = requested_url(&body)?;

    tracing::info!(url = %url, "scrape requested");
    let pipeline = state.pipeline.clone();
    let product = tokio::task::spawn(async move { pipeline.run(&url).await })
        .await
        .map_err(|e| ApiError::Internal(format!("task failed: {e}")))??;

    Ok(Json(product))
}

/// Pull an absolute http(s) URL out of the request body.
fn requested_url(body: &Value) -> Result<String, ApiError> {
    let raw = body
        .get("url")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::MalformedInput("URL is required".to_string()))?;

    let parsed = url::Url::parse(raw)
        .map_err(|e| ApiError::MalformedInput(format!("Invalid URL {raw:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::MalformedInput(format!(
            "Unsupported URL scheme {:?}",
            parsed.scheme()
        )));
    }
    Ok(raw.to_string())
}
