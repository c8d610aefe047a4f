//! Locate and parse the JSON data island embedded in a page.
//!
//! Strategies run in a fixed order of decreasing specificity. The first one
//! whose pattern matches *and* whose capture parses as JSON wins. A parse
//! failure is logged and the next strategy runs; only when every strategy has
//! been tried does extraction fail.

use crate::error::ExtractError;
use crate::types::ParsedDocument;
use regex::Regex;
use std::sync::OnceLock;

/// A named `(matcher, cleaner)` pair.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    /// Returns the raw text of the first match only.
    pub matcher: fn(&str) -> Option<&str>,
    /// Turns the captured text into parseable JSON text.
    pub cleaner: fn(&str) -> &str,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// Strategies in priority order. The order is significant.
pub const STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "next-data-script",
        matcher: match_next_data_script,
        cleaner: clean_capture,
    },
    Strategy {
        name: "query-data-script",
        matcher: match_query_data_script,
        cleaner: clean_capture,
    },
    Strategy {
        name: "inline-product-object",
        matcher: match_inline_product_object,
        cleaner: clean_capture,
    },
];

/// Result of a successful extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Name of the strategy that produced the document.
    pub strategy: &'static str,
    pub document: ParsedDocument,
}

/// Extract the data island from raw HTML.
pub fn extract(html: &str) -> Result<ParsedDocument, ExtractError> {
    extract_with_strategy(html).map(|e| e.document)
}

/// Like [`extract`], but also reports which strategy succeeded.
pub fn extract_with_strategy(html: &str) -> Result<Extracted, ExtractError> {
    let mut attempted = Vec::new();

    for strategy in STRATEGIES.iter() {
        let Some(captured) = (strategy.matcher)(html) else {
            tracing::trace!(strategy = strategy.name, "no match");
            continue;
        };

        match serde_json::from_str::<ParsedDocument>((strategy.cleaner)(captured)) {
            Ok(document) => {
                tracing::debug!(
                    strategy = strategy.name,
                    bytes = captured.len(),
                    "extracted page data"
                );
                return Ok(Extracted {
                    strategy: strategy.name,
                    document,
                });
            }
            Err(e) => {
                tracing::warn!(strategy = strategy.name, "data extraction failed: {e}");
                attempted.push(strategy.name);
            }
        }
    }

    Err(ExtractError::NotFound { attempted })
}

/// Strip a `window.NAME =` prefix and one trailing `;` from captured text.
pub fn clean_capture(captured: &str) -> &str {
    static ASSIGNMENT: OnceLock<Regex> = OnceLock::new();
    let assignment = ASSIGNMENT.get_or_init(|| {
        Regex::new(r"^window(?:\s*\.\s*[A-Za-z_$][\w$]*)+\s*=\s*").expect("valid regex")
    });

    let mut text = captured.trim();
    if let Some(m) = assignment.find(text) {
        text = text[m.end()..].trim();
    }
    text.strip_suffix(';').unwrap_or(text)
}

fn match_next_data_script(html: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            r#"(?is)<script[^>]*\sid\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script\s*>"#,
        )
        .expect("valid regex")
    });
    first_group(re, html)
}

fn match_query_data_script(html: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?is)<script[^>]*\sdata-name\s*=\s*["']query["'][^>]*>(.*?)</script\s*>"#)
            .expect("valid regex")
    });
    first_group(re, html)
}

fn match_inline_product_object(html: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?s)\{.*"product":\s*\{[^}]+\}\s*\}"#).expect("valid regex")
    });
    re.find(html).map(|m| m.as_str())
}

fn first_group<'h>(re: &Regex, html: &'h str) -> Option<&'h str> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
