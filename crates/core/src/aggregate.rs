//! Batch aggregation and the recommendation decision policy.
//!
//! Everything here is pure arithmetic over an immutable `ReviewRecord`
//! batch: corpus counts, per-aspect buckets, and the ordered decision rules
//! that produce the final verdict.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::aspects::{ASPECT_KEYWORDS, GENERAL_ASPECT};
use crate::review::{AnalysisReport, AspectStat, Decision, Recommendation, ReviewRecord, Sentiment, Summary};

/// Fewer reviews than this yields INSUFFICIENT_DATA instead of a verdict.
pub const MIN_REVIEWS_FOR_DECISION: usize = 3;

/// Share of neutral reviews at or above which the verdict is NEUTRAL.
const NEUTRAL_DOMINANCE: f32 = 0.60;
/// Positive share required for a confident BUY...
const STRONG_POSITIVE: f32 = 0.60;
/// ...provided the negative share stays at or below this.
const ACCEPTABLE_NEGATIVE: f32 = 0.25;
/// Negative share at or above which the verdict is AVOID.
const STRONG_NEGATIVE: f32 = 0.45;
/// Positive/negative shares closer than this are treated as balanced.
const BALANCED_MARGIN: f32 = 0.15;

/// Corpus-level counts for a batch.
pub fn summarize(records: &[ReviewRecord]) -> Summary {
    let total = records.len();
    let positive = records.iter().filter(|r| r.sentiment == Sentiment::Positive).count();
    let negative = records.iter().filter(|r| r.sentiment == Sentiment::Negative).count();
    let neutral = total - positive - negative;
    let average_sentiment = if total == 0 { 0.0 } else { (positive as f32 - negative as f32) / total as f32 };

    Summary {
        total_reviews: total,
        positive_reviews: positive,
        negative_reviews: negative,
        neutral_reviews: neutral,
        average_sentiment,
    }
}

/// Per-aspect buckets in aspect-declaration order (`general` last).
///
/// A record with N aspects contributes to N buckets; reviews are not
/// partitioned exclusively to one aspect.
pub fn aspect_stats(records: &[ReviewRecord]) -> Vec<(String, AspectStat)> {
    struct Bucket {
        stat: AspectStat,
        score_sum: f32,
        score_count: usize,
    }

    let mut buckets: HashMap<&str, Bucket> = HashMap::new();
    for record in records {
        for aspect in &record.aspects {
            let bucket = buckets
                .entry(aspect.as_str())
                .or_insert_with(|| Bucket { stat: AspectStat::default(), score_sum: 0.0, score_count: 0 });
            bucket.stat.total += 1;
            match record.sentiment {
                Sentiment::Positive => bucket.stat.positive += 1,
                Sentiment::Negative => bucket.stat.negative += 1,
                Sentiment::Neutral => bucket.stat.neutral += 1,
            }
            if let Some(score) = record.score {
                bucket.score_sum += score;
                bucket.score_count += 1;
            }
        }
    }

    let declared = ASPECT_KEYWORDS.iter().map(|(aspect, _)| *aspect).chain(std::iter::once(GENERAL_ASPECT));

    declared
        .filter_map(|aspect| {
            buckets.remove(aspect).map(|bucket| {
                let mut stat = bucket.stat;
                if bucket.score_count > 0 {
                    stat.average_score = Some(bucket.score_sum / bucket.score_count as f32);
                }
                (aspect.to_string(), stat)
            })
        })
        .collect()
}

/// Apply the decision policy to a batch's summary and aspect buckets.
///
/// Rules are evaluated in strict priority order; the first match wins:
/// 1. neutral share >= 0.60 -> NEUTRAL
/// 2. positive >= 0.60 and negative <= 0.25 -> BUY
/// 3. negative >= 0.45 -> AVOID
/// 4. |positive - negative| < 0.15 -> CONSIDER
/// 5. the stronger side wins (BUY or AVOID)
///
/// Batches below [`MIN_REVIEWS_FOR_DECISION`] short-circuit to
/// INSUFFICIENT_DATA with empty evidence.
pub fn recommend(summary: &Summary, aspects: &[(String, AspectStat)]) -> Recommendation {
    let total = summary.total_reviews;
    if total < MIN_REVIEWS_FOR_DECISION {
        return Recommendation {
            decision: Decision::InsufficientData,
            explanation: "Not enough reviews to make a recommendation.".to_string(),
            positive_ratio: None,
            negative_ratio: None,
            top_positive_aspects: Vec::new(),
            top_negative_aspects: Vec::new(),
        };
    }

    let pos = summary.positive_reviews;
    let neg = summary.negative_reviews;
    let pos_ratio = pos as f32 / total as f32;
    let neg_ratio = neg as f32 / total as f32;
    let neu_ratio = summary.neutral_reviews as f32 / total as f32;

    let top_pos = top_aspects_by(aspects, |stat| stat.positive);
    let top_neg = top_aspects_by(aspects, |stat| stat.negative);

    let (decision, explanation) = if neu_ratio >= NEUTRAL_DOMINANCE {
        (
            Decision::Neutral,
            format!(
                "Most reviews are neutral ({}%). Not enough sentiment signal to recommend buying or avoiding.",
                (neu_ratio * 100.0) as u32
            ),
        )
    } else if pos_ratio >= STRONG_POSITIVE && neg_ratio <= ACCEPTABLE_NEGATIVE {
        (
            Decision::Buy,
            format!("Majority positive reviews ({pos}/{total}). Positive aspects: {}.", aspect_list(&top_pos)),
        )
    } else if neg_ratio >= STRONG_NEGATIVE {
        (
            Decision::Avoid,
            format!("High negative signal ({neg}/{total}). Negative aspects: {}.", aspect_list(&top_neg)),
        )
    } else if (pos_ratio - neg_ratio).abs() < BALANCED_MARGIN {
        (
            Decision::Consider,
            format!(
                "Mixed or balanced feedback ({pos}/{total} positive, {neg}/{total} negative). \
                 Consider reading sample reviews."
            ),
        )
    } else if pos_ratio > neg_ratio {
        (
            Decision::Buy,
            format!("More positive than negative reviews ({pos}/{total}). Check positives: {}.", aspect_list(&top_pos)),
        )
    } else {
        (
            Decision::Avoid,
            format!("More negative than positive reviews ({neg}/{total}). Check concerns: {}.", aspect_list(&top_neg)),
        )
    };

    Recommendation {
        decision,
        explanation,
        positive_ratio: Some(round3(pos_ratio)),
        negative_ratio: Some(round3(neg_ratio)),
        top_positive_aspects: top_pos,
        top_negative_aspects: top_neg,
    }
}

/// Assemble the full payload for a batch.
pub fn build_report(records: Vec<ReviewRecord>) -> AnalysisReport {
    let summary = summarize(&records);
    let aspects = aspect_stats(&records);
    let recommendation = recommend(&summary, &aspects);
    let aspect_summary: BTreeMap<String, AspectStat> = aspects.into_iter().collect();

    AnalysisReport { reviews: records, summary, aspect_summary, recommendation }
}

/// Top 3 aspects by the given count, descending; zero counts dropped.
///
/// The sort is stable and `aspects` arrives in declaration order, so ties
/// keep that order.
fn top_aspects_by(aspects: &[(String, AspectStat)], count: impl Fn(&AspectStat) -> usize) -> Vec<String> {
    let mut ranked: Vec<(&String, usize)> =
        aspects.iter().map(|(aspect, stat)| (aspect, count(stat))).filter(|(_, n)| *n > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(3).map(|(aspect, _)| aspect.clone()).collect()
}

fn aspect_list(aspects: &[String]) -> String {
    if aspects.is_empty() { GENERAL_ASPECT.to_string() } else { aspects.join(", ") }
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}
