//! Headless browser session for JS-rendered review pages.
//!
//! Feature-gated behind `render`. A session is ephemeral: launched for one
//! scrape, driven through reveal/scroll/next-page probes, then closed.
//! Every probe is a first-success-wins attempt; a probe that finds nothing
//! is a normal outcome, not an error.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use thiserror::Error;
use url::Url;

/// Errors that can occur during page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to get page content.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Timeout waiting for navigation.
    #[error("render timeout after {0}ms")]
    Timeout(u64),
}

/// Options for a rendering session.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Hard navigation timeout in milliseconds (default: 30000).
    pub nav_timeout_ms: u64,

    /// Settle delay after scroll/click actions in milliseconds (default: 700).
    pub settle_ms: u64,

    /// User-Agent override for the session.
    pub user_agent: Option<String>,

    /// Outbound proxy for the browser (`--proxy-server`).
    pub proxy: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { nav_timeout_ms: 30_000, settle_ms: 700, user_agent: None, proxy: None }
    }
}

/// Ordered labels tried when looking for a "show all reviews" control.
const SHOW_ALL_LABELS: &[&str] = &["See all reviews", "All reviews", "View all reviews", "Read all reviews", "Reviews"];

/// Anchor patterns tried when no labeled control matched.
const REVIEW_ANCHOR_SELECTOR: &str = "a[href*='product-reviews'], a[href*='reviews'], a[href*='pid=']";

/// Pagination anchors used by the marketplace's review pages.
const NEXT_PAGE_SELECTOR: &str = "a._1LKTO3, a._3fVaIS";

/// An ephemeral headless-Chromium session pointed at one review page.
pub struct ReviewBrowser {
    browser: Browser,
    page: chromiumoxide::Page,
    settle: Duration,
}

impl ReviewBrowser {
    /// Launch a browser and navigate to `url` under a hard timeout.
    pub async fn open(url: &Url, opts: &RenderOptions) -> Result<Self, RenderError> {
        let mut config = BrowserConfig::builder();
        if let Some(ua) = &opts.user_agent {
            config = config.arg(format!("--user-agent={ua}"));
        }
        if let Some(proxy) = &opts.proxy {
            config = config.arg(format!("--proxy-server={proxy}"));
        }

        let (browser, mut handler) =
            Browser::launch(config.build().map_err(RenderError::BrowserLaunch)?)
                .await
                .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let navigation = tokio::time::timeout(Duration::from_millis(opts.nav_timeout_ms), page.goto(url.as_str()))
            .await
            .map_err(|_| RenderError::Timeout(opts.nav_timeout_ms))?;
        navigation.map_err(|e| RenderError::Navigation(e.to_string()))?;

        let settle = Duration::from_millis(opts.settle_ms);
        tokio::time::sleep(settle).await;

        Ok(Self { browser, page, settle })
    }

    /// Try to expand the page's full review list.
    ///
    /// Probes the "show all reviews" labels in order, then the review-anchor
    /// selector; first successful click wins. Returns whether anything was
    /// clicked — absence of such a control is not an error.
    pub async fn reveal_all_reviews(&self) -> bool {
        for label in SHOW_ALL_LABELS {
            if self.click_by_text(label).await {
                tokio::time::sleep(self.settle).await;
                return true;
            }
        }
        if self.click_by_selector(REVIEW_ANCHOR_SELECTOR).await {
            tokio::time::sleep(self.settle).await;
            return true;
        }
        false
    }

    /// Trigger lazy-loading by scrolling to the bottom of the document.
    pub async fn scroll_to_bottom(&self) {
        self.page
            .evaluate("window.scrollBy(0, document.body.scrollHeight)")
            .await
            .ok();
    }

    /// Try to advance to the next review page.
    ///
    /// Strategies in order: a control whose text contains "Next", then the
    /// marketplace pagination anchors. Returns whether a click landed.
    pub async fn next_page(&self) -> bool {
        if self.click_by_text("Next").await {
            return true;
        }
        self.click_by_selector(NEXT_PAGE_SELECTOR).await
    }

    /// Current rendered HTML.
    pub async fn content(&self) -> Result<String, RenderError> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::ContentRetrieval(e.to_string()))
    }

    /// Close the page and the browser.
    pub async fn close(mut self) {
        self.page.close().await.ok();
        self.browser.close().await.ok();
    }

    /// Click the first clickable element whose text contains `needle`
    /// (case-insensitive). Runs in-page so it works across tag types.
    async fn click_by_text(&self, needle: &str) -> bool {
        let script = format!(
            r#"(() => {{
                const needle = {needle:?}.toLowerCase();
                const els = document.querySelectorAll('a, button, span, div');
                for (const el of els) {{
                    const text = (el.textContent || '').trim().toLowerCase();
                    if (!text || text.length > 80) continue;
                    if (text.includes(needle)) {{ el.click(); return true; }}
                }}
                return false;
            }})()"#
        );
        self.eval_bool(&script).await
    }

    /// Click the first element matching a CSS selector.
    async fn click_by_selector(&self, selector: &str) -> bool {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({selector:?});
                if (el) {{ el.click(); return true; }}
                return false;
            }})()"#
        );
        self.eval_bool(&script).await
    }

    async fn eval_bool(&self, script: &str) -> bool {
        match self.page.evaluate(script).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(e) => {
                tracing::debug!("in-page probe failed: {e}");
                false
            }
        }
    }
}
