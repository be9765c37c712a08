//! Prompt text for the chat-completion adapter.

use std::fmt::Write;

use crate::models::{EventContent, SymbolicEvent};

pub const EVENT_SYSTEM_PROMPT: &str = "You analyse symbolic events for a mythic narrative graph. \
Reply with a single JSON object and nothing else.";

pub const ARC_SYSTEM_PROMPT: &str = "You sequence symbolic events into non-linear narrative arcs. \
Reply with a single JSON object and nothing else.";

/// User prompt asking for keywords, an expanded fragment and a rating.
pub fn event_enrichment_prompt(content: &EventContent) -> String {
    format!(
        "Analyse this symbolic event.\n\n\
         Title: {title}\n\
         Keywords: {keywords}\n\
         Fragment: {fragment}\n\n\
         Return:\n\
         1. 3 to 5 enhanced keywords capturing its deeper symbolic meaning\n\
         2. an expanded narrative fragment of 2-3 sentences with mythic resonance\n\
         3. a symbolic significance rating from 1 to 10\n\
         4. the archetypal motifs it evokes\n\n\
         JSON shape:\n\
         {{\"enhanced_keywords\": [\"...\"], \"expanded_fragment\": \"...\", \
         \"symbolic_significance\": 7, \"archetypal_motifs\": [\"...\"]}}",
        title = content.title(),
        keywords = content.keywords().join(", "),
        fragment = content.narrative_fragment(),
    )
}

/// User prompt asking for an arc through `candidates` starting at `seed_id`.
pub fn arc_suggestion_prompt(seed_id: &str, candidates: &[SymbolicEvent], depth: usize) -> String {
    let mut listing = String::new();
    for event in candidates {
        // Writing to a String cannot fail.
        let _ = writeln!(
            listing,
            "- {} | {} | {} | keywords: {} | {}",
            event.event_id,
            event.title,
            event.timestamp.to_rfc3339(),
            event.keywords.join(", "),
            event.narrative_fragment,
        );
    }

    format!(
        "Construct a narrative arc starting from event {seed_id}.\n\n\
         Available events:\n{listing}\n\
         Use at most {depth} events, the first one being {seed_id}, and only ids listed above. \
         Trace causal or resonant pathways and name the archetypal patterns.\n\n\
         JSON shape:\n\
         {{\"arc_title\": \"...\", \"connected_events\": [\"{seed_id}\", \"...\"], \
         \"narrative_summary\": \"...\", \"archetypal_patterns\": [\"...\"], \
         \"temporal_insights\": \"...\", \"mythic_resonance\": \"...\"}}"
    )
}
