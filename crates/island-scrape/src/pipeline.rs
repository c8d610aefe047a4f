//! Pipeline orchestrator: pace → fetch → extract → locate → resolve.
//!
//! Stages run strictly in sequence and the first failure short-circuits the
//! rest. Every failure is logged with its stage and URL before it is returned
//! with its original classification.

use crate::error::{ScrapeError, ScrapeResult};
use crate::extract::extract_with_strategy;
use crate::fetch::Fetcher;
use crate::locate::locate;
use crate::pacing::Pacing;
use crate::resolve::resolve;
use crate::types::{RawPage, RequestContext, ResolvedProduct};
use std::sync::Arc;

/// Runs the scrape for one URL at a time. Holds no per-request state, so one
/// instance is shared by every concurrent request.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    pacing: Pacing,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, pacing: Pacing) -> Self {
        Self { fetcher, pacing }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Fetch `url` and return the product record it describes.
    pub async fn run(&self, url: &str) -> ScrapeResult<ResolvedProduct> {
        self.pacing.wait().await;

        let page = self
            .fetcher
            .fetch(url)
            .await
            .map_err(ScrapeError::from)
            .inspect_err(|e| log_failure(e, url))?;

        Self::process(&page)
    }

    /// Run the offline stages over an already fetched page.
    pub fn process(page: &RawPage) -> ScrapeResult<ResolvedProduct> {
        Self::process_html(&page.body, &page.context())
    }

    /// Extract, locate and resolve over raw HTML.
    pub fn process_html(html: &str, ctx: &RequestContext) -> ScrapeResult<ResolvedProduct> {
        let url = ctx.requested_url.as_str();

        let extracted = extract_with_strategy(html)
            .map_err(ScrapeError::from)
            .inspect_err(|e| log_failure(e, url))?;

        let candidates = locate(&extracted.document);
        tracing::debug!(
            url,
            strategy = extracted.strategy,
            candidates = candidates.len(),
            "located product candidates"
        );

        resolve(candidates, url, &ctx.resolved_url)
            .map_err(ScrapeError::from)
            .inspect_err(|e| log_failure(e, url))
    }
}

fn log_failure(err: &ScrapeError, url: &str) {
    tracing::error!(stage = err.stage(), url, "scraping failed: {err}");
}
