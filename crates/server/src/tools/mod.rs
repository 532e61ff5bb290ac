//! Tool implementations.
//!
//! This module contains all tools exposed by the sentio server.

pub mod analyze;
pub mod product_reviews;

pub use analyze::AnalyzeParams;
pub use product_reviews::ProductReviewsParams;
