//! Sentiment classification with a pluggable backend strategy.
//!
//! Backends produce one positivity score in [0, 1] per input text; the
//! three-way label is derived here from fixed thresholds so that every
//! backend is labeled identically. The pretrained backend (feature `model`)
//! is selected once at process start; a failed load is cached as
//! unavailable and the deterministic lexicon backend takes over.

pub mod lexicon;

#[cfg(feature = "model")]
pub mod bert;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::Error;
use crate::config::AppConfig;
use crate::review::Sentiment;

pub use lexicon::LexiconBackend;

/// Scores at or above this are POSITIVE.
pub const POSITIVE_THRESHOLD: f32 = 0.60;
/// Scores at or below this are NEGATIVE.
pub const NEGATIVE_THRESHOLD: f32 = 0.40;

/// One classified review: label plus the backing positivity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Sentiment,
    pub score: f32,
}

/// A sentiment scoring strategy.
///
/// Implementations score a whole batch in one call — per-item invocation in
/// a loop defeats the batching the pretrained backend relies on. The output
/// must be one score per input, in input order.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Positivity score in [0, 1] per text, same order, same length.
    async fn score_batch(&self, texts: &[String]) -> Result<Vec<f32>, Error>;
}

/// Map a positivity score onto the three-way label.
///
/// A score in the middle band indicates ambiguity regardless of which side
/// it leans, so it maps to NEUTRAL.
pub fn label_for_score(score: f32) -> Sentiment {
    if score >= POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Classify a batch, never failing.
///
/// The primary backend is tried once for the whole batch; any error (or a
/// malformed result) discards the primary output entirely and rescores the
/// batch with the deterministic lexicon — fail-together, not per-item.
pub async fn classify_batch(backend: &dyn SentimentBackend, texts: &[String]) -> Vec<Prediction> {
    if texts.is_empty() {
        return Vec::new();
    }

    match backend.score_batch(texts).await {
        Ok(scores) if scores.len() == texts.len() => to_predictions(scores),
        Ok(scores) => {
            tracing::warn!(
                backend = backend.name(),
                expected = texts.len(),
                got = scores.len(),
                "backend returned a misaligned batch; falling back to lexicon scoring"
            );
            to_predictions(lexicon::score_batch(texts))
        }
        Err(e) => {
            tracing::warn!(backend = backend.name(), "backend failed: {e}; falling back to lexicon scoring");
            to_predictions(lexicon::score_batch(texts))
        }
    }
}

fn to_predictions(scores: Vec<f32>) -> Vec<Prediction> {
    scores.into_iter().map(|score| Prediction { label: label_for_score(score), score }).collect()
}

static BACKEND: OnceCell<Arc<dyn SentimentBackend>> = OnceCell::const_new();

/// The process-wide backend, selected on first use.
///
/// When the `model` feature is compiled in and `model_enabled` is set, the
/// pretrained model is loaded once; a load failure is logged and cached so
/// the expensive attempt is never repeated. Everything else gets the
/// lexicon backend. The returned handle is meant to be passed into
/// [`classify_batch`] as an injected dependency.
pub async fn selected_backend(config: &AppConfig) -> Arc<dyn SentimentBackend> {
    BACKEND.get_or_init(|| init_backend(config)).await.clone()
}

#[cfg(feature = "model")]
async fn init_backend(config: &AppConfig) -> Arc<dyn SentimentBackend> {
    if !config.model_enabled {
        return Arc::new(LexiconBackend);
    }
    match bert::BertSst2Backend::load(&config.model_id).await {
        Ok(backend) => {
            tracing::info!(model = %config.model_id, "pretrained sentiment backend loaded");
            Arc::new(backend)
        }
        Err(e) => {
            tracing::warn!(model = %config.model_id, "pretrained backend unavailable: {e}; using lexicon");
            Arc::new(LexiconBackend)
        }
    }
}

#[cfg(not(feature = "model"))]
async fn init_backend(config: &AppConfig) -> Arc<dyn SentimentBackend> {
    if config.model_enabled {
        tracing::warn!("model_enabled is set but the `model` feature is not compiled in; using lexicon");
    }
    Arc::new(LexiconBackend)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBackend;

    #[async_trait]
    impl SentimentBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn score_batch(&self, _texts: &[String]) -> Result<Vec<f32>, Error> {
            Err(Error::Inference("model exploded".into()))
        }
    }

    struct MisalignedBackend;

    #[async_trait]
    impl SentimentBackend for MisalignedBackend {
        fn name(&self) -> &'static str {
            "misaligned"
        }

        async fn score_batch(&self, _texts: &[String]) -> Result<Vec<f32>, Error> {
            Ok(vec![0.9])
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(label_for_score(0.60), Sentiment::Positive);
        assert_eq!(label_for_score(0.40), Sentiment::Negative);
        assert_eq!(label_for_score(0.50), Sentiment::Neutral);
        assert_eq!(label_for_score(1.0), Sentiment::Positive);
        assert_eq!(label_for_score(0.0), Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_batch_output_matches_input_positionally() {
        let input = texts(&["good good good", "broken, want a refund", "it is a thing"]);
        let predictions = classify_batch(&LexiconBackend, &input).await;
        assert_eq!(predictions.len(), input.len());
        assert_eq!(predictions[0].label, Sentiment::Positive);
        assert_eq!(predictions[1].label, Sentiment::Negative);
        assert_eq!(predictions[2].label, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_failing_backend_falls_back_for_whole_batch() {
        let input = texts(&["great product", "terrible product"]);
        let predictions = classify_batch(&FailingBackend, &input).await;
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, Sentiment::Positive);
        assert_eq!(predictions[1].label, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_misaligned_backend_falls_back() {
        let input = texts(&["great product", "terrible product"]);
        let predictions = classify_batch(&MisalignedBackend, &input).await;
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[1].label, Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let predictions = classify_batch(&LexiconBackend, &[]).await;
        assert!(predictions.is_empty());
    }
}
