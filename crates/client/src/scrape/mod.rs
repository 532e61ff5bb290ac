//! Two-tier scrape orchestration.
//!
//! Drives a rendered-browser attempt first (JS-heavy marketplaces serve an
//! empty shell to plain GETs), then falls back to sequential static
//! fetches. Each tier walks pagination until the fragment quota or page cap
//! is hit. No failure in either tier propagates: a tier that breaks
//! contributes zero fragments and the next tier (or an empty result) takes
//! over — "no reviews found" is the caller's decision to surface.

use std::collections::HashSet;
use std::time::Duration;

use url::Url;

use sentio_core::AppConfig;
use sentio_core::text::is_review;

use crate::dump::ArtifactSink;
use crate::extract::{extract_fragments, find_next_href};
use crate::fetch::{FetchClient, FetchConfig, canonicalize};

#[cfg(feature = "render")]
use crate::render::{RenderOptions, ReviewBrowser};

/// Bounds and knobs for one scrape.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Stop collecting once this many fragments survive filtering.
    pub limit: usize,
    /// Maximum pages visited per tier.
    pub max_pages: usize,
    /// Minimum delay between successive static-tier requests.
    pub min_fetch_delay: Duration,
    /// Hard navigation timeout for the rendered tier.
    pub nav_timeout_ms: u64,
    /// Settle delay after scroll/click actions.
    pub settle_ms: u64,
    /// User-Agent for both tiers.
    pub user_agent: String,
    /// Whether to attempt the rendered tier at all.
    pub render_enabled: bool,
    /// Optional proxy for the rendering session.
    pub render_proxy: Option<String>,
    /// Static-tier request timeout.
    pub fetch_timeout: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl ScrapeOptions {
    /// Derive scrape bounds from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            limit: config.limit,
            max_pages: config.max_pages,
            min_fetch_delay: config.min_fetch_delay(),
            nav_timeout_ms: config.nav_timeout_ms,
            settle_ms: config.settle_ms,
            user_agent: config.user_agent.clone(),
            render_enabled: config.render_enabled,
            render_proxy: config.render_proxy.clone(),
            fetch_timeout: config.fetch_timeout(),
        }
    }
}

/// Two-tier review scraper.
pub struct Scraper {
    fetch: FetchClient,
    opts: ScrapeOptions,
    render_dump: Box<dyn ArtifactSink>,
    fetch_dump: Box<dyn ArtifactSink>,
}

impl Scraper {
    /// Build a scraper with injected dump sinks.
    pub fn new(
        opts: ScrapeOptions, render_dump: Box<dyn ArtifactSink>, fetch_dump: Box<dyn ArtifactSink>,
    ) -> Result<Self, sentio_core::Error> {
        let fetch = FetchClient::new(FetchConfig {
            user_agent: opts.user_agent.clone(),
            timeout: opts.fetch_timeout,
            ..Default::default()
        })?;

        Ok(Self { fetch, opts, render_dump, fetch_dump })
    }

    /// Collect filtered, deduplicated review fragments for a product URL.
    ///
    /// Never fails: an unusable URL or two dead tiers yield an empty list,
    /// which the caller surfaces as "no reviews found".
    pub async fn scrape_reviews(&self, url_str: &str) -> Vec<String> {
        let url = match canonicalize(url_str) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("unusable product URL {url_str:?}: {e}");
                return Vec::new();
            }
        };

        let mut collected: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        #[cfg(feature = "render")]
        {
            if self.opts.render_enabled {
                if let Err(e) = self.rendered_tier(&url, &mut collected, &mut seen).await {
                    tracing::warn!("rendered tier failed for {url}: {e}");
                }
                if !collected.is_empty() {
                    collected.truncate(self.opts.limit);
                    return collected;
                }
            }
        }

        self.static_tier(&url, &mut collected, &mut seen).await;
        collected.truncate(self.opts.limit);
        collected
    }

    /// Rendered tier: headless session, reveal control, scroll + paginate.
    #[cfg(feature = "render")]
    async fn rendered_tier(
        &self, url: &Url, collected: &mut Vec<String>, seen: &mut HashSet<String>,
    ) -> Result<(), crate::render::RenderError> {
        let render_opts = RenderOptions {
            nav_timeout_ms: self.opts.nav_timeout_ms,
            settle_ms: self.opts.settle_ms,
            user_agent: Some(self.opts.user_agent.clone()),
            proxy: self.opts.render_proxy.clone(),
        };

        let browser = ReviewBrowser::open(url, &render_opts).await?;
        let settle = Duration::from_millis(self.opts.settle_ms);

        // Known marketplace: the full review list hides behind a control.
        if url.host_str().is_some_and(|host| host.contains("flipkart.")) {
            browser.reveal_all_reviews().await;
        }

        let mut pages_visited = 0;
        while pages_visited < self.opts.max_pages && collected.len() < self.opts.limit {
            pages_visited += 1;

            browser.scroll_to_bottom().await;
            tokio::time::sleep(settle).await;

            match browser.content().await {
                Ok(html) => {
                    self.collect_from_page(&html, collected, seen);
                    self.render_dump.persist(&html);
                }
                Err(e) => {
                    tracing::debug!("rendered content unavailable on page {pages_visited}: {e}");
                    break;
                }
            }

            if collected.len() >= self.opts.limit {
                break;
            }
            if !browser.next_page().await {
                break;
            }
            tokio::time::sleep(settle).await;
        }

        browser.close().await;
        tracing::debug!("rendered tier collected {} fragments over {pages_visited} pages", collected.len());
        Ok(())
    }

    /// Static tier: sequential throttled GETs with heuristic next links.
    async fn static_tier(&self, url: &Url, collected: &mut Vec<String>, seen: &mut HashSet<String>) {
        let mut current = url.clone();
        let mut pages_visited = 0;

        while pages_visited < self.opts.max_pages && collected.len() < self.opts.limit {
            pages_visited += 1;

            let page = match self.fetch.fetch_page(&current).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("static fetch of {current} failed: {e}");
                    break;
                }
            };

            self.collect_from_page(&page.html, collected, seen);
            self.fetch_dump.persist(&page.html);

            if collected.len() >= self.opts.limit {
                break;
            }

            match find_next_href(&page.html, &current) {
                Some(next) if next != current => current = next,
                _ => break,
            }

            tokio::time::sleep(self.opts.min_fetch_delay).await;
        }

        tracing::debug!("static tier collected {} fragments over {pages_visited} pages", collected.len());
    }

    /// Extract, filter, and dedup one page's fragments into the accumulator.
    fn collect_from_page(&self, html: &str, collected: &mut Vec<String>, seen: &mut HashSet<String>) {
        for fragment in extract_fragments(html) {
            if collected.len() >= self.opts.limit {
                break;
            }
            if seen.contains(&fragment) {
                continue;
            }
            if !is_review(&fragment) {
                continue;
            }
            seen.insert(fragment.clone());
            collected.push(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::NoDump;

    fn scraper_with_limit(limit: usize) -> Scraper {
        let opts = ScrapeOptions { limit, render_enabled: false, ..Default::default() };
        Scraper::new(opts, Box::new(NoDump), Box::new(NoDump)).unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
            <div class="t-ZTKy">I have used this daily for a month and the battery still holds up well.</div>
            <div class="t-ZTKy">Sound quality is poor and support never answered my emails, very disappointed.</div>
            <div class="t-ZTKy">Add to cart now and grab the special price before the sale ends tonight!</div>
        </body></html>
    "#;

    #[test]
    fn test_options_from_config() {
        let config = AppConfig::default();
        let opts = ScrapeOptions::from_config(&config);
        assert_eq!(opts.limit, 50);
        assert_eq!(opts.max_pages, 6);
        assert_eq!(opts.min_fetch_delay, Duration::from_millis(600));
        assert!(opts.render_enabled);
    }

    #[test]
    fn test_collect_filters_boilerplate() {
        let scraper = scraper_with_limit(50);
        let mut collected = Vec::new();
        let mut seen = HashSet::new();
        scraper.collect_from_page(PAGE, &mut collected, &mut seen);

        assert_eq!(collected.len(), 2);
        assert!(collected.iter().all(|f| !f.contains("cart")));
    }

    #[test]
    fn test_collect_respects_quota() {
        let scraper = scraper_with_limit(1);
        let mut collected = Vec::new();
        let mut seen = HashSet::new();
        scraper.collect_from_page(PAGE, &mut collected, &mut seen);

        assert_eq!(collected.len(), 1);
    }

    #[test]
    fn test_collect_dedups_across_pages() {
        let scraper = scraper_with_limit(50);
        let mut collected = Vec::new();
        let mut seen = HashSet::new();
        scraper.collect_from_page(PAGE, &mut collected, &mut seen);
        scraper.collect_from_page(PAGE, &mut collected, &mut seen);

        assert_eq!(collected.len(), 2);
    }

    #[tokio::test]
    async fn test_unusable_url_yields_empty() {
        let scraper = scraper_with_limit(50);
        let fragments = scraper.scrape_reviews("   ").await;
        assert!(fragments.is_empty());
    }
}
