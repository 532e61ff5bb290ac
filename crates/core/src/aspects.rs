//! Keyword-based aspect tagging.
//!
//! Maps review text to zero-or-more fixed product dimensions by
//! case-insensitive substring match. The mapping order is significant: it
//! defines first-match output order and the tie-break order used when
//! ranking aspects in the recommendation.

/// Sentinel aspect assigned by callers when nothing below matches.
pub const GENERAL_ASPECT: &str = "general";

/// Fixed aspect vocabulary: aspect name, then the substrings that map to it.
pub const ASPECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("battery", &["battery", "battery life", "charge", "charging"]),
    ("sound", &["sound", "bass", "treble", "audio", "microphone", "mic"]),
    ("build", &["build", "quality", "material", "durable", "broken"]),
    ("design", &["design", "look", "style", "color"]),
    ("value", &["price", "value", "expensive", "cheap", "cost"]),
    ("delivery", &["delivery", "shipping", "packaging"]),
    ("support", &["support", "warranty", "service", "customer support"]),
];

/// Tag a review with every aspect whose keyword list matches.
///
/// Output order follows the declared aspect order; each aspect appears at
/// most once. An empty result is NOT substituted here — the record
/// constructor maps it to [`GENERAL_ASPECT`].
pub fn tag_aspects(text: &str) -> Vec<String> {
    let low = text.to_lowercase();
    ASPECT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| low.contains(kw)))
        .map(|(aspect, _)| (*aspect).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_follow_declaration_order() {
        let tags = tag_aspects("Great SOUND but the battery drains fast");
        assert_eq!(tags, vec!["battery".to_string(), "sound".to_string()]);
    }

    #[test]
    fn test_aspect_appears_once() {
        let tags = tag_aspects("charging is slow and the battery is weak");
        assert_eq!(tags, vec!["battery".to_string()]);
    }

    #[test]
    fn test_no_match_yields_empty() {
        assert!(tag_aspects("arrived on time, nothing else to say").is_empty());
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let tags = tag_aspects("EXPENSIVE but the PACKAGING was neat");
        assert_eq!(tags, vec!["value".to_string(), "delivery".to_string()]);
    }
}
