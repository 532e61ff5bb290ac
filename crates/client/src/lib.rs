//! Client code for sentio.
//!
//! This crate provides the network-bound half of the review pipeline:
//! static HTTP fetching, feature-gated headless rendering, review-fragment
//! extraction, and the two-tier scrape orchestrator.

pub mod dump;
pub mod extract;
pub mod fetch;
pub mod scrape;

#[cfg(feature = "render")]
pub mod render;

pub use dump::{ArtifactSink, FileDump, NoDump, sink_for};
pub use extract::{extract_fragments, find_next_href};
pub use fetch::{FetchClient, FetchConfig, RawPage, canonicalize};
pub use scrape::{ScrapeOptions, Scraper};

#[cfg(feature = "render")]
pub use render::{RenderError, RenderOptions, ReviewBrowser};
