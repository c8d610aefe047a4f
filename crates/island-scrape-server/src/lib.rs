//! island-scrape server — HTTP service and CLI around the scrape pipeline.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

pub use config::{ConfigOverrides, ServerConfig};
pub use error::ApiError;
pub use routes::{router, serve, AppState};
