//! Mythic resonance over a constructed arc.
//!
//! Local and cheap: no enrichment call, no state. Safe to call as often as
//! the presentation layer likes.

use crate::models::event::dedupe_keywords;
use crate::models::{EventSnapshot, MythicResonance, NarrativeArc, MAX_MOTIFS};

/// Compute the resonance view of `arc` against `snapshot`.
///
/// Ids that do not resolve are skipped.
pub fn compute_resonance(arc: &NarrativeArc, snapshot: &EventSnapshot) -> MythicResonance {
    let events: Vec<_> = arc.event_ids.iter().filter_map(|id| snapshot.get(id)).collect();

    let mut archetypal_motifs = dedupe_keywords(
        events
            .iter()
            .flat_map(|event| event.keywords.iter().map(String::as_str)),
    );
    archetypal_motifs.truncate(MAX_MOTIFS);

    MythicResonance {
        resonance_summary: resonance_summary(&arc.title, events.len(), &archetypal_motifs),
        archetypal_motifs,
    }
}

fn resonance_summary(title: &str, event_count: usize, motifs: &[String]) -> String {
    let noun = if event_count == 1 { "event" } else { "events" };
    if motifs.is_empty() {
        format!(
            "\"{}\" gathers {} {} without a recurring motif.",
            title, event_count, noun
        )
    } else {
        format!(
            "\"{}\" gathers {} {} into a recursive pattern of {}.",
            title,
            event_count,
            noun,
            motifs.join(", ")
        )
    }
}
