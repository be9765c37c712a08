//! Validation of model replies.
//!
//! Replies are untrusted text. They are parsed into loose intermediate
//! structs, then checked field by field; any deviation collapses to
//! `EnrichmentUnavailable::Malformed`.

use serde::Deserialize;

use crate::enrichment::{
    ArcSuggestion, EnrichmentResult, EnrichmentUnavailable, MAX_SIGNIFICANCE, MIN_SIGNIFICANCE,
};
use crate::models::event::dedupe_keywords;

/// Accepted number of enhanced keywords.
const ENHANCED_KEYWORDS_RANGE: std::ops::RangeInclusive<usize> = 3..=5;

#[derive(Debug, Deserialize)]
struct RawEventEnrichment {
    enhanced_keywords: Vec<String>,
    expanded_fragment: String,
    symbolic_significance: i64,
    #[serde(default)]
    archetypal_motifs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawArcSuggestion {
    #[serde(default)]
    arc_title: String,
    connected_events: Vec<String>,
    #[serde(default)]
    narrative_summary: String,
    #[serde(default)]
    archetypal_patterns: Vec<String>,
    #[serde(default)]
    temporal_insights: String,
    #[serde(default)]
    mythic_resonance: String,
}

fn malformed(msg: impl Into<String>) -> EnrichmentUnavailable {
    EnrichmentUnavailable::Malformed(msg.into())
}

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim();
        }
    }
    trimmed
}

/// Parse and validate an event enrichment reply.
pub fn parse_event_enrichment(content: &str) -> Result<EnrichmentResult, EnrichmentUnavailable> {
    let raw: RawEventEnrichment = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| malformed(format!("event enrichment: {}", e)))?;

    let keywords = dedupe_keywords(raw.enhanced_keywords.iter().map(String::as_str));
    if !ENHANCED_KEYWORDS_RANGE.contains(&keywords.len()) {
        return Err(malformed(format!(
            "expected 3-5 enhanced keywords, got {}",
            keywords.len()
        )));
    }

    if raw.expanded_fragment.trim().is_empty() {
        return Err(malformed("expanded_fragment is empty"));
    }

    let significance = u8::try_from(raw.symbolic_significance)
        .ok()
        .filter(|s| (MIN_SIGNIFICANCE..=MAX_SIGNIFICANCE).contains(s))
        .ok_or_else(|| {
            malformed(format!(
                "symbolic_significance {} outside 1-10",
                raw.symbolic_significance
            ))
        })?;

    Ok(EnrichmentResult {
        enhanced_keywords: keywords,
        expanded_fragment: raw.expanded_fragment,
        symbolic_significance: significance,
        archetypal_motifs: dedupe_keywords(raw.archetypal_motifs.iter().map(String::as_str)),
    })
}

/// Parse and validate an arc suggestion reply.
///
/// Only the shape is checked here. Referential filtering and truncation
/// happen in the arc constructor, which holds the snapshot.
pub fn parse_arc_suggestion(content: &str) -> Result<ArcSuggestion, EnrichmentUnavailable> {
    let raw: RawArcSuggestion = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| malformed(format!("arc suggestion: {}", e)))?;

    if raw.connected_events.is_empty() {
        return Err(malformed("connected_events is empty"));
    }

    Ok(ArcSuggestion {
        title: raw.arc_title.trim().to_string(),
        connected_event_ids: raw
            .connected_events
            .into_iter()
            .map(|id| id.trim().to_string())
            .collect(),
        narrative_summary: raw.narrative_summary.trim().to_string(),
        archetypal_patterns: raw.archetypal_patterns,
        temporal_insights: raw.temporal_insights.trim().to_string(),
        mythic_resonance: raw.mythic_resonance.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_EVENT: &str = r#"{
        "enhanced_keywords": ["threshold", "emergence", "dawn"],
        "expanded_fragment": "At the threshold, something wakes.",
        "symbolic_significance": 8,
        "archetypal_motifs": ["rebirth", "rebirth", "journey"]
    }"#;

    #[test]
    fn test_parse_valid_event_enrichment() {
        let result = parse_event_enrichment(VALID_EVENT).unwrap();
        assert_eq!(result.enhanced_keywords, vec!["threshold", "emergence", "dawn"]);
        assert_eq!(result.symbolic_significance, 8);
        assert_eq!(result.archetypal_motifs, vec!["rebirth", "journey"]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", VALID_EVENT);
        assert!(parse_event_enrichment(&fenced).is_ok());
    }

    #[test]
    fn test_not_json_is_malformed() {
        let err = parse_event_enrichment("Deep symbolic patterns detected...").unwrap_err();
        assert!(matches!(err, EnrichmentUnavailable::Malformed(_)));
    }

    #[test]
    fn test_too_few_keywords_is_malformed() {
        let reply = r#"{"enhanced_keywords": ["a", "a", "b"], "expanded_fragment": "x",
                        "symbolic_significance": 3}"#;
        assert!(matches!(
            parse_event_enrichment(reply),
            Err(EnrichmentUnavailable::Malformed(msg)) if msg.contains("got 2")
        ));
    }

    #[test]
    fn test_significance_out_of_range_is_malformed() {
        for bad in ["0", "11", "-3", "7.5", "\"seven\""] {
            let reply = format!(
                r#"{{"enhanced_keywords": ["a","b","c"], "expanded_fragment": "x",
                     "symbolic_significance": {}}}"#,
                bad
            );
            assert!(
                parse_event_enrichment(&reply).is_err(),
                "significance {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_fragment_is_malformed() {
        let reply = r#"{"enhanced_keywords": ["a","b","c"], "expanded_fragment": "  ",
                        "symbolic_significance": 4}"#;
        assert!(parse_event_enrichment(reply).is_err());
    }

    #[test]
    fn test_parse_arc_suggestion_defaults_optional_fields() {
        let reply = r#"{"connected_events": [" evt_1 ", "evt_2"]}"#;
        let suggestion = parse_arc_suggestion(reply).unwrap();
        assert_eq!(suggestion.connected_event_ids, vec!["evt_1", "evt_2"]);
        assert!(suggestion.title.is_empty());
        assert!(suggestion.archetypal_patterns.is_empty());
        assert!(suggestion.temporal_insights.is_empty());
        assert!(suggestion.mythic_resonance.is_empty());
    }

    #[test]
    fn test_parse_arc_suggestion_keeps_insights() {
        let reply = r#"{
            "arc_title": "The Awakening Cycle",
            "connected_events": ["evt_001", "evt_002"],
            "narrative_summary": "A pattern wakes.",
            "archetypal_patterns": ["emergence", "recursion"],
            "temporal_insights": " Time becomes recursive. ",
            "mythic_resonance": "The eternal cycle of becoming."
        }"#;
        let suggestion = parse_arc_suggestion(reply).unwrap();
        assert_eq!(suggestion.temporal_insights, "Time becomes recursive.");
        assert_eq!(suggestion.mythic_resonance, "The eternal cycle of becoming.");
    }

    #[test]
    fn test_arc_suggestion_requires_events() {
        assert!(parse_arc_suggestion(r#"{"arc_title": "x", "connected_events": []}"#).is_err());
        assert!(parse_arc_suggestion(r#"{"arc_title": "x"}"#).is_err());
        assert!(parse_arc_suggestion(r#"{"connected_events": [1, 2]}"#).is_err());
    }
}
