//! Async HTTP fetcher wrapping reqwest.
//!
//! One client is built at startup and shared by every request; reqwest's
//! client is internally pooled and safe to clone across tasks. Redirects are
//! followed and the final URL is reported alongside the body. No retries.

use crate::error::FetchError;
use crate::types::RawPage;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;

/// Desktop browser user-agents, one picked per request.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
];

const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const MAX_REDIRECTS: usize = 10;

/// Retrieves a page and the URL it finally resolved to.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError>;
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    pub timeout: Duration,
    /// Fixed user-agent. When `None` one is drawn from [`USER_AGENTS`] per request.
    pub user_agent: Option<String>,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// reqwest-backed fetcher. Cheap to clone.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: Option<String>,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));

        if let Some(ua) = &config.user_agent {
            HeaderValue::from_str(ua)
                .map_err(|e| FetchError::Config(format!("invalid user-agent: {e}")))?;
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        tracing::debug!(
            timeout_ms = config.timeout.as_millis() as u64,
            fixed_user_agent = config.user_agent.is_some(),
            "HTTP fetcher ready"
        );

        Ok(Self {
            client,
            user_agent: config.user_agent,
        })
    }

    fn pick_user_agent(&self) -> &str {
        match &self.user_agent {
            Some(ua) => ua.as_str(),
            None => USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(USER_AGENTS[0]),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let final_url = resp.url().to_string();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: final_url,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(transport)?;
        tracing::debug!(url = %url, final_url = %final_url, bytes = body.len(), "fetched page");

        Ok(RawPage {
            requested_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}
