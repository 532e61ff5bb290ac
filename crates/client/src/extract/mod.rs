//! Review-fragment extraction from page HTML.
//!
//! Works on rendered or raw HTML alike. Candidate sourcing is a prioritized
//! selector list for known marketplace review wrappers plus one generic
//! cross-site attribute selector, then a fallback sweep over block-level
//! elements for unknown layouts. Cleaning and dedup use the shared
//! `sentio_core::text` rules so the same fragment found by two selectors
//! collapses into one.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use sentio_core::text::clean_fragment;

/// Prioritized review-body selectors: marketplace wrappers first, then the
/// cross-site review-body attribute.
pub const REVIEW_SELECTORS: &[&str] =
    &["div.t-ZTKy", "div._16PBlm", "div._2-N8zT", "div.qwjRop", "span[data-hook='review-body']"];

/// Fallback pass keeps any block element whose cleaned text is longer than
/// this, to catch layouts the selector list doesn't know.
pub const FALLBACK_MIN_CHARS: usize = 80;

fn page_number_href() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"page=\d+|/p/\d+|/page/\d+").expect("hardcoded pattern is valid"))
}

/// Extract deduplicated candidate review fragments from HTML.
///
/// Output preserves first-occurrence order: selector passes in priority
/// order, document order within each pass, fallback sweep last. Never
/// fails; elements that yield nothing are skipped.
pub fn extract_fragments(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut raw_texts: Vec<String> = Vec::new();

    for selector_str in REVIEW_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else { continue };
        for element in doc.select(&selector) {
            let text = element_text(&element);
            if !text.is_empty() {
                raw_texts.push(text);
            }
        }
    }

    // Everything past this index came from the fallback sweep and must
    // clear the length floor; selector hits are kept as-is.
    let selector_hits = raw_texts.len();

    for selector_str in ["p", "div", "span"] {
        let Ok(selector) = Selector::parse(selector_str) else { continue };
        for element in doc.select(&selector) {
            let text = element_text(&element);
            if !text.is_empty() {
                raw_texts.push(text);
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut fragments = Vec::new();
    for (index, raw) in raw_texts.iter().enumerate() {
        let cleaned = clean_fragment(raw);
        if cleaned.is_empty() {
            continue;
        }
        if index >= selector_hits && cleaned.chars().count() <= FALLBACK_MIN_CHARS {
            continue;
        }
        if seen.insert(cleaned.clone()) {
            fragments.push(cleaned);
        }
    }

    fragments
}

fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// Discover a "next page" link in raw HTML.
///
/// Heuristics, first anchor wins: link text containing "next", or an href
/// matching a page-number pattern. Relative hrefs resolve against the
/// current page URL.
pub fn find_next_href(html: &str, current: &Url) -> Option<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a").ok()?;

    for anchor in doc.select(&selector) {
        let text = element_text(&anchor).to_lowercase();
        let href = anchor.value().attr("href").unwrap_or("");
        if href.is_empty() {
            continue;
        }
        if text.contains("next") || page_number_href().is_match(href) {
            return current.join(href).ok();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVIEW_PAGE: &str = r#"
        <html><body>
            <div class="t-ZTKy">Battery easily lasts two days, very happy with this purchase overall honestly.</div>
            <div class="_16PBlm">Sound is muffled at high volume, I returned mine within the week sadly.</div>
            <div class="t-ZTKy">Battery easily lasts two days, very happy with this purchase overall honestly.</div>
            <span data-hook="review-body">Works exactly as described, delivery was quick and packaging was intact throughout.</span>
            <p>Short text.</p>
            <div>This paragraph is an unknown-layout review body that is comfortably longer than the eighty
                character fallback threshold used for unknown sites.</div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_selector_candidates_first() {
        let fragments = extract_fragments(REVIEW_PAGE);
        assert!(fragments[0].starts_with("Battery easily lasts"));
        assert!(fragments[1].starts_with("Sound is muffled"));
    }

    #[test]
    fn test_deduplicates_on_cleaned_text() {
        let fragments = extract_fragments(REVIEW_PAGE);
        let battery_count = fragments.iter().filter(|f| f.starts_with("Battery easily")).count();
        assert_eq!(battery_count, 1);
    }

    #[test]
    fn test_fallback_requires_length() {
        let fragments = extract_fragments(REVIEW_PAGE);
        assert!(!fragments.iter().any(|f| f == "Short text."));
        assert!(fragments.iter().any(|f| f.contains("unknown-layout review body")));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let first = extract_fragments(REVIEW_PAGE);
        let second = extract_fragments(REVIEW_PAGE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicate_cleaned_fragments() {
        let fragments = extract_fragments(REVIEW_PAGE);
        let unique: std::collections::HashSet<_> = fragments.iter().collect();
        assert_eq!(unique.len(), fragments.len());
    }

    #[test]
    fn test_empty_html_yields_nothing() {
        assert!(extract_fragments("").is_empty());
    }

    #[test]
    fn test_find_next_by_anchor_text() {
        let html = r#"<html><body><a href="/reviews?page=2">Next</a></body></html>"#;
        let current = Url::parse("https://example.com/reviews?page=1").unwrap();
        let next = find_next_href(html, &current).unwrap();
        assert_eq!(next.as_str(), "https://example.com/reviews?page=2");
    }

    #[test]
    fn test_find_next_by_href_pattern() {
        let html = r#"<html><body><a href="/product/reviews/page/3">more</a></body></html>"#;
        let current = Url::parse("https://example.com/product/reviews").unwrap();
        let next = find_next_href(html, &current).unwrap();
        assert!(next.as_str().ends_with("/page/3"));
    }

    #[test]
    fn test_find_next_absolute_href() {
        let html = r#"<html><body><a href="https://other.example/reviews?page=5">NEXT →</a></body></html>"#;
        let current = Url::parse("https://example.com/reviews").unwrap();
        let next = find_next_href(html, &current).unwrap();
        assert_eq!(next.host_str(), Some("other.example"));
    }

    #[test]
    fn test_find_next_none_when_absent() {
        let html = r#"<html><body><a href="/about">About us</a></body></html>"#;
        let current = Url::parse("https://example.com/reviews").unwrap();
        assert!(find_next_href(html, &current).is_none());
    }
}
