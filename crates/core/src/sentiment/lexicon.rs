//! Deterministic word-count sentiment scoring.
//!
//! The fallback strategy when no pretrained model is available: count fixed
//! positive/negative vocabulary hits and bias a neutral 0.5 score by the
//! difference. Pure, fast, and stable across runs.

use async_trait::async_trait;

use super::SentimentBackend;
use crate::Error;

const POSITIVE_WORDS: &[&str] =
    &["good", "great", "excellent", "love", "best", "amazing", "perfect", "fantastic", "awesome"];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "poor",
    "awful",
    "worst",
    "disappointed",
    "died",
    "broken",
    "refund",
    "terrible",
    "stopworking",
    "stopped",
];

/// How far one vocabulary hit moves the score from neutral.
const HIT_WEIGHT: f32 = 0.15;

/// Score a single text: `clamp(0.5 + 0.15 * (pos_hits - neg_hits), 0, 1)`.
///
/// Hits are case-insensitive substring membership, one per vocabulary word.
pub fn score_text(text: &str) -> f32 {
    let low = text.to_lowercase();
    let pos_hits = POSITIVE_WORDS.iter().filter(|w| low.contains(*w)).count();
    let neg_hits = NEGATIVE_WORDS.iter().filter(|w| low.contains(*w)).count();
    let base = 0.5 + HIT_WEIGHT * (pos_hits as f32 - neg_hits as f32);
    base.clamp(0.0, 1.0)
}

/// Score a batch; infallible and order-preserving.
pub fn score_batch(texts: &[String]) -> Vec<f32> {
    texts.iter().map(|t| score_text(t)).collect()
}

/// The deterministic strategy as a [`SentimentBackend`].
pub struct LexiconBackend;

#[async_trait]
impl SentimentBackend for LexiconBackend {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    async fn score_batch(&self, texts: &[String]) -> Result<Vec<f32>, Error> {
        Ok(score_batch(texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text_scores_half() {
        assert_eq!(score_text("it arrived in a box"), 0.5);
    }

    #[test]
    fn test_positive_hits_raise_score() {
        // "great" and "love": 0.5 + 2 * 0.15
        let score = score_text("Great phone, love the screen");
        assert!((score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_negative_hits_lower_score() {
        // "broken" and "refund": 0.5 - 2 * 0.15
        let score = score_text("arrived broken, asked for a refund");
        assert!((score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_score_is_clamped() {
        let text = "bad poor awful worst disappointed died broken refund terrible";
        assert_eq!(score_text(text), 0.0);
    }

    #[test]
    fn test_hits_count_once_per_word() {
        // Repeating one vocabulary word does not stack.
        assert_eq!(score_text("good good good"), score_text("good"));
    }

    #[test]
    fn test_batch_preserves_order() {
        let texts = vec!["excellent".to_string(), "terrible".to_string()];
        let scores = score_batch(&texts);
        assert!(scores[0] > 0.5);
        assert!(scores[1] < 0.5);
    }
}
