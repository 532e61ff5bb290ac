//! Core types and shared logic for sentio.
//!
//! This crate provides:
//! - The review analysis data model and outbound payload types
//! - Fragment cleaning and the shared review-likelihood predicate
//! - Sentiment classification (pluggable backend + deterministic fallback)
//! - Aspect tagging and the aggregation/recommendation engine
//! - The SQLite review store
//! - Unified error types and layered configuration

pub mod aggregate;
pub mod aspects;
pub mod config;
pub mod error;
pub mod review;
pub mod sentiment;
pub mod store;
pub mod text;

pub use config::AppConfig;
pub use error::Error;
pub use review::{AnalysisReport, AspectStat, Decision, Recommendation, ReviewRecord, Sentiment, Summary};
pub use store::{ReviewStore, StoredReview};
