//! Fragment cleaning and review-likelihood filtering.
//!
//! Both the extraction pass and the request pipeline filter candidate text
//! through the same predicate, so acceptance semantics cannot drift between
//! the two call sites. `clean_fragment` is applied before the predicate
//! everywhere: the dedup key for a candidate IS its cleaned text.

use regex::Regex;
use std::sync::OnceLock;

/// Minimum trimmed length for a fragment to count as a review.
pub const MIN_REVIEW_CHARS: usize = 40;

/// UI boilerplate stripped out of candidate fragments before any other
/// processing: marketplace badges, "read more" expanders, pagination labels.
fn boilerplate_markers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)read more|permalink|certified buyer|page \d+ of \d+|next|previous")
            .expect("hardcoded pattern is valid")
    })
}

fn word_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z]{2,}\s+[A-Za-z]{2,}").expect("hardcoded pattern is valid"))
}

fn personal_pronoun() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(i|my|me|we|they|he|she)\b").expect("hardcoded pattern is valid"))
}

/// Commerce UI phrases that disqualify a fragment outright: offer banners,
/// cart/pricing chrome, spec sheets, policy text.
const BOILERPLATE_DENYLIST: &[&str] = &[
    "bank offer",
    "available offers",
    "special price",
    "add to cart",
    "delivery by",
    "ratings & reviews",
    "secure delivery",
    "offers",
    "cashback",
    "seller",
    "specifications",
    "product description",
    "about this item",
    "warranty",
    "return policy",
];

/// Strong review indicators: trust badges, rating vocabulary, vote widgets.
/// Any hit accepts the fragment without consulting the generic pattern.
const REVIEW_INDICATORS: &[&str] = &[
    "certified buyer",
    "certified",
    "verified",
    "read more",
    "permalink",
    "★",
    "stars",
    "helpful",
    "reviewed",
    "review by",
];

/// Common product-feedback vocabulary for the generic acceptance rule.
const FEEDBACK_WORDS: &[&str] = &[
    "battery", "sound", "price", "quality", "work", "worked", "broke", "broken", "good", "bad", "refund",
];

/// Strip known UI boilerplate and collapse whitespace.
///
/// The result doubles as the candidate's dedup key, so near-identical
/// fragments picked up by different selectors collapse into one.
pub fn clean_fragment(text: &str) -> String {
    let stripped = boilerplate_markers().replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Heuristic: does this fragment read like a user review?
///
/// Rules, in order:
/// 1. Too short (< [`MIN_REVIEW_CHARS`] after trim) rejects.
/// 2. Any denylist phrase rejects, regardless of other signal.
/// 3. Any strong review indicator accepts.
/// 4. Otherwise accept only natural-language text: two alphabetic words,
///    sentence punctuation, and a personal pronoun or feedback word.
pub fn is_review(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_REVIEW_CHARS {
        return false;
    }

    let low = trimmed.to_lowercase();
    if BOILERPLATE_DENYLIST.iter().any(|bad| low.contains(bad)) {
        return false;
    }
    if REVIEW_INDICATORS.iter().any(|ind| low.contains(ind)) {
        return true;
    }

    word_pair().is_match(trimmed)
        && trimmed.contains(['.', '!', '?'])
        && (personal_pronoun().is_match(&low) || FEEDBACK_WORDS.iter().any(|w| low.contains(w)))
}
