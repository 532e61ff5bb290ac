//! analyze_reviews tool implementation.
//!
//! Drives the whole pipeline for one product URL: scrape, filter, classify,
//! tag, aggregate, recommend. The scrape and classification layers never
//! fail; the only client error this tool produces is "no reviews found".

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentio_client::{ScrapeOptions, Scraper, sink_for};
use sentio_core::sentiment::{classify_batch, selected_backend};
use sentio_core::text::is_review;
use sentio_core::{AppConfig, Error, ReviewRecord, ReviewStore, aggregate, aspects, store};

/// Guidance returned when the pipeline finds nothing review-like.
const NO_REVIEWS_HINT: &str = "No reviews detected on the provided URL. \
     Make sure you supplied a product/reviews page (not a homepage or listing).";

/// Input parameters for the analyze_reviews tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeParams {
    /// The product or reviews page URL to analyze.
    pub url: String,

    /// Maximum review fragments to collect (default from configuration).
    #[serde(default)]
    pub limit: Option<usize>,

    /// Maximum pages to visit per scrape tier (default from configuration).
    #[serde(default)]
    pub max_pages: Option<usize>,
}

/// Implementation of the analyze_reviews tool.
pub async fn analyze_impl(
    config: &AppConfig, review_store: &ReviewStore, params: AnalyzeParams,
) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let mut opts = ScrapeOptions::from_config(config);
    if let Some(limit) = params.limit {
        opts.limit = limit.clamp(1, 500);
    }
    if let Some(max_pages) = params.max_pages {
        opts.max_pages = max_pages.clamp(1, 50);
    }

    let scraper = Scraper::new(
        opts,
        sink_for(config.dump_render_path.clone()),
        sink_for(config.dump_fetch_path.clone()),
    )
    .map_err(McpError::from)?;

    let fragments = scraper.scrape_reviews(&params.url).await;

    // Defense in depth: the orchestrator already filters per page, but the
    // boundary re-checks with the same predicate before committing to an
    // analysis.
    let reviews: Vec<String> = fragments.into_iter().filter(|text| is_review(text)).collect();

    if reviews.is_empty() {
        return Err(Error::NoReviews(NO_REVIEWS_HINT.into()).into());
    }

    let backend = selected_backend(config).await;
    let predictions = classify_batch(backend.as_ref(), &reviews).await;

    let records: Vec<ReviewRecord> = reviews
        .into_iter()
        .zip(predictions)
        .map(|(text, prediction)| {
            let tags = aspects::tag_aspects(&text);
            ReviewRecord::new(text, prediction.label, Some(prediction.score), tags)
        })
        .collect();

    let report = aggregate::build_report(records);

    // Archive the batch; a store failure must not cost the caller their
    // analysis.
    let product_id = store::product_key(&params.url);
    let rows: Vec<(String, f64)> = report
        .reviews
        .iter()
        .map(|r| (r.review_text.clone(), f64::from(r.score.unwrap_or(0.5))))
        .collect();
    if let Err(e) = review_store.insert_reviews(&product_id, &rows).await {
        tracing::warn!(%product_id, "review archive write failed: {e}");
    }

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&report).unwrap_or_default(),
    )]))
}
