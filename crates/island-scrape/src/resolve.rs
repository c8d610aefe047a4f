//! Pick the candidate that belongs to the requested URL.
//!
//! A candidate matches when its `urlKey` is non-empty and either occurs in the
//! resolved URL (redirect-rewritten pages) or contains the requested URL's
//! trailing slug. Candidates are checked in order; the first match wins.

use crate::error::ResolveError;
use crate::types::{ProductCandidate, ResolvedProduct, URL_KEY};

/// Select the first candidate matching the request.
pub fn resolve(
    candidates: Vec<ProductCandidate>,
    requested_url: &str,
    resolved_url: &str,
) -> Result<ResolvedProduct, ResolveError> {
    let slug = slug_of(requested_url);
    let total = candidates.len();

    candidates
        .into_iter()
        .find(|c| matches_request(c, &slug, resolved_url))
        .ok_or_else(|| ResolveError::NoMatch {
            url: requested_url.to_string(),
            candidates: total,
        })
}

/// Whether a single candidate satisfies the matching predicate.
pub fn matches_request(candidate: &ProductCandidate, slug: &str, resolved_url: &str) -> bool {
    let Some(url_key) = candidate
        .get(URL_KEY)
        .and_then(|v| v.as_str())
        .filter(|k| !k.is_empty())
    else {
        return false;
    };

    resolved_url.contains(url_key) || (!slug.is_empty() && url_key.contains(slug))
}

/// Last non-empty path segment of a URL, without query or fragment.
pub fn slug_of(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string();
    }

    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_of() {
        assert_eq!(slug_of("https://shop.test/p/red-shoes"), "red-shoes");
        assert_eq!(slug_of("https://shop.test/p/red-shoes/"), "red-shoes");
        assert_eq!(slug_of("https://shop.test/p/red-shoes?ref=home#top"), "red-shoes");
        assert_eq!(slug_of("https://shop.test/"), "");
        assert_eq!(slug_of("https://shop.test"), "");
        assert_eq!(slug_of("/p/blue-hat?x=1"), "blue-hat");
    }

    #[test]
    fn test_match_by_slug() {
        let candidates = vec![json!({"urlKey": "red-shoes", "id": 1})];
        let product = resolve(
            candidates,
            "https://shop.test/p/red-shoes",
            "https://shop.test/p/red-shoes",
        )
        .unwrap();
        assert_eq!(product["id"], 1);
    }

    #[test]
    fn test_match_by_resolved_url() {
        let candidates = vec![
            json!({"urlKey": "other", "id": 1}),
            json!({"urlKey": "canonical-shoe", "id": 2}),
        ];
        let product = resolve(
            candidates,
            "https://shop.test/s/12345",
            "https://shop.test/p/canonical-shoe.html",
        )
        .unwrap();
        assert_eq!(product["id"], 2);
    }

    #[test]
    fn test_scans_past_non_matching_candidates() {
        let candidates = vec![
            json!({"urlKey": "blue-shoes", "id": 1}),
            json!({"urlKey": "red-shoes", "id": 2}),
        ];
        let product = resolve(
            candidates,
            "https://shop.test/red-shoes",
            "https://shop.test/red-shoes",
        )
        .unwrap();
        assert_eq!(product["id"], 2);
    }

    #[test]
    fn test_first_match_wins() {
        let candidates = vec![
            json!({"urlKey": "red-shoes-v2", "id": 1}),
            json!({"urlKey": "red-shoes", "id": 2}),
        ];
        let product = resolve(
            candidates,
            "https://shop.test/red-shoes",
            "https://shop.test/red-shoes",
        )
        .unwrap();
        assert_eq!(product["id"], 1);
    }

    #[test]
    fn test_missing_empty_or_non_string_url_key_never_matches() {
        let candidates = vec![
            json!({"id": 1}),
            json!({"urlKey": "", "id": 2}),
            json!({"urlKey": 7, "id": 3}),
            json!("red-shoes"),
            json!(null),
        ];
        let err = resolve(candidates, "https://shop.test/red-shoes", "https://shop.test/red-shoes")
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::NoMatch {
                url: "https://shop.test/red-shoes".to_string(),
                candidates: 5
            }
        );
    }

    #[test]
    fn test_empty_slug_does_not_match_everything() {
        let candidates = vec![json!({"urlKey": "anything"})];
        assert!(resolve(candidates, "https://shop.test/", "https://shop.test/").is_err());
    }

    #[test]
    fn test_no_candidates() {
        assert!(resolve(vec![], "https://shop.test/a", "https://shop.test/a").is_err());
    }
}
