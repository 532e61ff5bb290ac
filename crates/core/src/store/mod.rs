//! SQLite-backed review store.
//!
//! The analysis pipeline never reads from here — this is the write-path
//! collaborator that archives analyzed reviews per product, plus a
//! read-back query for the `product_reviews` tool. Async access via
//! tokio-rusqlite, WAL mode, versioned migrations.

pub mod connection;
pub mod migrations;
pub mod reviews;

pub use crate::Error;

pub use connection::ReviewStore;
pub use reviews::StoredReview;

use sha2::{Digest, Sha256};

/// Derive a stable product identifier from a product page URL.
///
/// Marketplace URLs carry the product id in the `pid` query parameter; when
/// absent, a SHA-256 prefix of the full URL keeps the key stable across
/// requests for the same page.
pub fn product_key(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url)
        && let Some((_, pid)) = parsed.query_pairs().find(|(k, _)| k.as_ref() == "pid")
        && !pid.is_empty()
    {
        return pid.into_owned();
    }

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key_prefers_pid_param() {
        let key = product_key("https://www.flipkart.com/item/p/itm123?pid=ABC123XYZ&lid=foo");
        assert_eq!(key, "ABC123XYZ");
    }

    #[test]
    fn test_product_key_hash_fallback_is_stable() {
        let a = product_key("https://example.com/product/42");
        let b = product_key("https://example.com/product/42");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_product_key_differs_per_url() {
        let a = product_key("https://example.com/product/42");
        let b = product_key("https://example.com/product/43");
        assert_ne!(a, b);
    }

    #[test]
    fn test_product_key_unparseable_url_still_keys() {
        let key = product_key("not a url at all");
        assert_eq!(key.len(), 16);
    }
}
