//! Service-level errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use island_scrape::{ExtractError, ResolveError, ScrapeError};

/// All errors the HTTP layer can report.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Missing, empty or unusable URL. The pipeline is never invoked.
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Scrape(ScrapeError::Fetch(_))
            | ApiError::Scrape(ScrapeError::Extract(ExtractError::NotFound { .. })) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Scrape(ScrapeError::Resolve(ResolveError::NoMatch { .. })) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedInput(_) => "E_INVALID_URL",
            ApiError::Scrape(e) => e.code(),
            ApiError::Internal(_) => "E_INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        )
            .into_response()
    }
}
