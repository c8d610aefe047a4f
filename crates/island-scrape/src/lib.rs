//! island-scrape — pull a single product record out of the JSON data island
//! a server-rendered storefront embeds in its HTML.
//!
//! The pipeline is strictly linear per request:
//! pace → [`fetch`] → [`extract`] → [`locate`] → [`resolve`].

pub mod error;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod pacing;
pub mod pipeline;
pub mod resolve;
pub mod types;

pub use error::{ExtractError, FetchError, ResolveError, ScrapeError, ScrapeResult};
pub use extract::{extract, extract_with_strategy, Extracted, Strategy, STRATEGIES};
pub use fetch::{Fetcher, HttpFetcher, HttpFetcherConfig};
pub use locate::{locate, Node};
pub use pacing::Pacing;
pub use pipeline::Pipeline;
pub use resolve::{resolve, slug_of};
pub use types::*;
