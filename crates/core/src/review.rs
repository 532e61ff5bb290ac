//! Review analysis data model.
//!
//! These are the request-scoped types flowing through the pipeline and the
//! wire shape of the analysis payload. A `ReviewRecord` is created once per
//! surviving candidate and never mutated afterwards.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::aspects::GENERAL_ASPECT;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Wire label, e.g. `"POSITIVE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// Classify an arbitrary label string by prefix: "POS..." is positive,
    /// "NEG..." is negative, anything else is neutral.
    pub fn from_label_prefix(label: &str) -> Self {
        let upper = label.to_uppercase();
        if upper.starts_with("POS") {
            Sentiment::Positive
        } else if upper.starts_with("NEG") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// One analyzed review: text, label, confidence, aspect tags.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReviewRecord {
    /// The cleaned review text.
    pub review_text: String,
    /// Three-way sentiment label.
    pub sentiment: Sentiment,
    /// Positivity score in [0, 1], when the classifier produced one.
    pub score: Option<f32>,
    /// Matched aspect tags; never empty (defaults to ["general"]).
    pub aspects: Vec<String>,
}

impl ReviewRecord {
    /// Build a record, substituting the sentinel aspect when no aspect
    /// keyword matched.
    pub fn new(review_text: String, sentiment: Sentiment, score: Option<f32>, aspects: Vec<String>) -> Self {
        let aspects = if aspects.is_empty() { vec![GENERAL_ASPECT.to_string()] } else { aspects };
        Self { review_text, sentiment, score, aspects }
    }
}

/// Corpus-level sentiment counts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub total_reviews: usize,
    pub positive_reviews: usize,
    pub negative_reviews: usize,
    pub neutral_reviews: usize,
    /// `(positive - negative) / total`; 0.0 for an empty batch.
    pub average_sentiment: f32,
}

/// Per-aspect sentiment counts, recomputed from scratch each request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AspectStat {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Mean of the scores present among this aspect's reviews.
    pub average_score: Option<f32>,
}

/// Final decision tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Buy,
    Avoid,
    Consider,
    Neutral,
    InsufficientData,
}

/// Buy/avoid/consider verdict with supporting evidence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub decision: Decision,
    /// Human-readable explanation citing the winning ratio and aspects.
    pub explanation: String,
    /// Positive share of the batch, rounded to 3 decimals; None below the
    /// decision threshold.
    pub positive_ratio: Option<f32>,
    /// Negative share of the batch, rounded to 3 decimals; None below the
    /// decision threshold.
    pub negative_ratio: Option<f32>,
    /// Up to 3 aspects ranked by positive count.
    pub top_positive_aspects: Vec<String>,
    /// Up to 3 aspects ranked by negative count.
    pub top_negative_aspects: Vec<String>,
}

/// Full analysis payload returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub reviews: Vec<ReviewRecord>,
    pub summary: Summary,
    pub aspect_summary: BTreeMap<String, AspectStat>,
    pub recommendation: Recommendation,
}
