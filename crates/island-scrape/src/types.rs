//! Request-scoped data types shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key a candidate must carry for URL matching.
pub const URL_KEY: &str = "urlKey";

/// Key the locator collects values under.
pub const PRODUCT_KEY: &str = "product";

/// A fetched page. Created by the fetcher and consumed once by the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// URL that was requested.
    pub requested_url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code of the final response.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawPage {
    /// The matching input for the resolver.
    pub fn context(&self) -> RequestContext {
        RequestContext {
            requested_url: self.requested_url.clone(),
            resolved_url: self.final_url.clone(),
        }
    }
}

/// Input URL and the URL it resolved to. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub requested_url: String,
    pub resolved_url: String,
}

impl RequestContext {
    /// Context for a page that was not redirected.
    pub fn direct(url: &str) -> Self {
        Self {
            requested_url: url.to_string(),
            resolved_url: url.to_string(),
        }
    }
}

/// Parsed data island. Any JSON tree; no schema is assumed.
pub type ParsedDocument = Value;

/// A value found under a `"product"` key, before matching.
pub type ProductCandidate = Value;

/// The candidate chosen for the request. Owned by the caller.
pub type ResolvedProduct = Value;
