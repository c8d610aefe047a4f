//! Route-level tests for the scrape service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use island_scrape::{FetchError, Fetcher, Pacing, Pipeline, RawPage};
use island_scrape_server::{router, AppState};

// ─────────────────────── helpers ───────────────────────

/// Serves one HTML body for every URL and counts fetches.
struct FakeStore {
    body: Option<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Fetcher for FakeStore {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(RawPage {
                requested_url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                body: body.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            }),
        }
    }
}

fn app(body: Option<&str>) -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let fetcher = FakeStore {
        body: body.map(str::to_string),
        calls: calls.clone(),
    };
    let pipeline = Pipeline::new(Arc::new(fetcher), Pacing::disabled());
    (router(Arc::new(AppState::new(pipeline))), calls)
}

async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(body: &str) -> Request<Body> {
    Request::post("/api/scrape-product")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const SHOE_PAGE: &str = r#"<html><body>
<script id="__NEXT_DATA__" type="application/json">{"props":{"product":{"urlKey":"red-shoes","id":1}}}</script>
</body></html>"#;

// ─────────────────────── probes ───────────────────────

#[tokio::test]
async fn test_healthcheck() {
    let (app, _) = app(None);
    let req = Request::get("/healthcheck").body(Body::empty()).unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OK", "status": 200}));
}

#[tokio::test]
async fn test_index() {
    let (app, _) = app(None);
    let req = Request::get("/").body(Body::empty()).unwrap();
    let (status, body) = call(app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello World");
    assert_eq!(body["status"], 200);
}

// ─────────────────────── scrape ───────────────────────

#[tokio::test]
async fn test_scrape_returns_product() {
    let (app, calls) = app(Some(SHOE_PAGE));
    let (status, body) = call(
        app,
        post_json(r#"{"url":"https://shop.test/p/red-shoes"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"urlKey": "red-shoes", "id": 1}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_url_is_client_error_without_fetch() {
    for payload in [r#"{}"#, r#"{"url":""}"#, r#"{"url":null}"#, "not json"] {
        let (app, calls) = app(Some(SHOE_PAGE));
        let (status, body) = call(app, post_json(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["code"], "E_INVALID_URL");
        assert_eq!(calls.load(Ordering::SeqCst), 0, "{payload}");
    }
}

#[tokio::test]
async fn test_missing_url_message() {
    let (app, _) = app(Some(SHOE_PAGE));
    let (_, body) = call(app, post_json("{}")).await;
    assert_eq!(body["error"], "URL is required");
}

#[tokio::test]
async fn test_unsupported_scheme_is_client_error() {
    let (app, calls) = app(Some(SHOE_PAGE));
    let (status, _) = call(app, post_json(r#"{"url":"file:///etc/passwd"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_match_is_not_found() {
    let (app, _) = app(Some(SHOE_PAGE));
    let (status, body) = call(
        app,
        post_json(r#"{"url":"https://shop.test/p/blue-hat"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E_NO_MATCH");
}

#[tokio::test]
async fn test_page_without_data_is_server_error() {
    let (app, _) = app(Some("<html><body>no data here</body></html>"));
    let (status, body) = call(
        app,
        post_json(r#"{"url":"https://shop.test/p/red-shoes"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E_NO_DATA");
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let (app, _) = app(None);
    let (status, body) = call(
        app,
        post_json(r#"{"url":"https://shop.test/p/red-shoes"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E_FETCH");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let (app, _) = app(None);
    let req = Request::get("/api/scrape-product").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
