//! Best-effort extraction of structured feedback from free-text model
//! output.
//!
//! The model is asked to embed a JSON object in its reply, but it often
//! wraps it in prose. Extraction takes the span from the first `{` to
//! the last `}` and attempts a strict decode; anything that fails yields
//! the mode's canned fallback payload, tagged so callers can tell the
//! two apart.

use serde::de::DeserializeOwned;

/// Reply substituted when the model returns nothing usable in coach mode.
pub const COACH_APOLOGY: &str = "I couldn't generate a response. Please try again.";

/// Outcome of a structured-decode attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    /// The model's own payload, decoded from its reply.
    Parsed(T),
    /// The canned fallback; the reply held no decodable object.
    Fallback(T),
}

impl<T> Extraction<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback(_))
    }

    pub fn inner(&self) -> &T {
        match self {
            Extraction::Parsed(value) | Extraction::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Extraction::Parsed(value) | Extraction::Fallback(value) => value,
        }
    }
}

/// Clean up a conversational reply.
///
/// Cannot fail structurally: an empty reply becomes the fixed apology.
pub fn extract_coach(raw: &str) -> String {
    let cleaned = sanitize_reply(raw);
    if cleaned.is_empty() {
        COACH_APOLOGY.to_string()
    } else {
        cleaned
    }
}

/// Decode a feedback payload out of free text, falling back to `fallback`
/// when no `{...}` span is present or the span does not decode.
pub fn extract_feedback<T: DeserializeOwned>(raw: &str, fallback: T) -> Extraction<T> {
    match json_span(raw).and_then(|span| serde_json::from_str(span).ok()) {
        Some(value) => Extraction::Parsed(value),
        None => Extraction::Fallback(fallback),
    }
}

/// The substring from the first `{` to the last `}`, greedy and not
/// nesting-aware.
fn json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Strip reasoning tags and markdown noise from a chat reply.
fn sanitize_reply(reply: &str) -> String {
    let tags_to_strip = [
        "thinking",
        "think",
        "reflection",
        "reasoning",
        "internal",
        "scratchpad",
    ];

    let mut result = reply.to_string();

    for tag in &tags_to_strip {
        let pattern = format!(r"(?is)<{tag}[^>]*>.*?</{tag}>", tag = tag);
        if let Ok(re) = regex::Regex::new(&pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }

    // Orphaned opening/closing tags left behind by the model.
    if let Ok(orphan_re) = regex::Regex::new(r"</?[\w]+[^>]*>") {
        result = orphan_re.replace_all(&result, "").to_string();
    }

    result = result.replace("**", "");

    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{JudgeFeedback, PracticeFeedback};

    #[test]
    fn test_coach_reply_trimmed() {
        assert_eq!(extract_coach("  A fine rebuttal.  \n"), "A fine rebuttal.");
    }

    #[test]
    fn test_coach_empty_reply_gets_apology() {
        assert_eq!(extract_coach(""), COACH_APOLOGY);
        assert_eq!(extract_coach("   \n "), COACH_APOLOGY);
    }

    #[test]
    fn test_coach_reply_strips_reasoning_tags() {
        let raw = "<thinking>weigh both sides</thinking>Consider the counterfactual.";
        assert_eq!(extract_coach(raw), "Consider the counterfactual.");
    }

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        let raw = r#"Sure! Here's the result: {
            "overallScore": 88, "argumentStrength": 85,
            "logicalConsistency": 80, "evidenceQuality": 75,
            "presentation": 90,
            "fallacies": ["straw man"], "strengths": ["clash"],
            "weaknesses": ["timing"],
            "speakerRoles": [],
            "detailedAnalysis": "close round",
            "winnerPrediction": "Opposition"
        } Hope that helps."#;

        let extraction = extract_feedback(raw, JudgeFeedback::fallback());
        assert!(!extraction.is_fallback());
        assert_eq!(extraction.inner().overall_score, 88);
        assert_eq!(extraction.inner().fallacies, vec!["straw man"]);
    }

    #[test]
    fn test_no_braces_yields_fallback() {
        let extraction =
            extract_feedback::<PracticeFeedback>("no JSON here", PracticeFeedback::fallback());
        assert!(extraction.is_fallback());
        assert_eq!(extraction.into_inner(), PracticeFeedback::fallback());
    }

    #[test]
    fn test_undecodable_span_yields_fallback() {
        let extraction = extract_feedback::<PracticeFeedback>(
            "{ definitely not json }",
            PracticeFeedback::fallback(),
        );
        assert!(extraction.is_fallback());
    }

    #[test]
    fn test_reversed_braces_yield_fallback() {
        let extraction =
            extract_feedback::<PracticeFeedback>("} backwards {", PracticeFeedback::fallback());
        assert!(extraction.is_fallback());
    }

    #[test]
    fn test_extraction_is_deterministic_and_idempotent() {
        let raw = "prose without structure";
        let first = extract_feedback::<PracticeFeedback>(raw, PracticeFeedback::fallback());
        let second = extract_feedback::<PracticeFeedback>(raw, PracticeFeedback::fallback());
        assert_eq!(first, second);

        let valid = r#"{"structure":60,"clarity":60,"logic":60,"tone":60,"overall":60,
            "strengths":[],"improvements":[],"detailedFeedback":"ok"}"#;
        let first = extract_feedback::<PracticeFeedback>(valid, PracticeFeedback::fallback());
        let second = extract_feedback::<PracticeFeedback>(valid, PracticeFeedback::fallback());
        assert_eq!(first, second);
        assert!(!first.is_fallback());
    }
}
