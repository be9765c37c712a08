//! Deterministic, enrichment-free fallbacks.
//!
//! Everything here is a pure function of its inputs: no clock, no
//! randomness. Retries and tests see identical output.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::enrichment::{EnrichmentResult, FALLBACK_SIGNIFICANCE};
use crate::models::{EventContent, EventSnapshot, SymbolicEvent};

/// Enrichment stand-in for an event draft: the draft's own values and a
/// midpoint significance.
pub fn fallback_enrichment(content: &EventContent) -> EnrichmentResult {
    EnrichmentResult {
        enhanced_keywords: content.keywords().to_vec(),
        expanded_fragment: content.narrative_fragment().to_string(),
        symbolic_significance: FALLBACK_SIGNIFICANCE,
        archetypal_motifs: Vec::new(),
    }
}

/// Number of distinct keywords of `candidate` that also tag `seed`.
pub fn shared_keyword_count(seed: &[String], candidate: &[String]) -> usize {
    let seed: HashSet<&str> = seed.iter().map(String::as_str).collect();
    candidate
        .iter()
        .map(String::as_str)
        .collect::<HashSet<&str>>()
        .intersection(&seed)
        .count()
}

/// Select the members of a fallback arc: the seed followed by up to
/// `depth - 1` other events.
///
/// Candidates are ranked by
/// 1. shared keyword count with the seed, descending
/// 2. absolute timestamp distance from the seed, ascending
/// 3. insertion order in the snapshot
pub fn select_arc_members(seed: &SymbolicEvent, snapshot: &EventSnapshot, depth: usize) -> Vec<String> {
    debug_assert!(depth >= 1, "depth is validated before selection");

    let mut ranked: Vec<(Reverse<usize>, u64, usize, &str)> = snapshot
        .iter()
        .enumerate()
        .filter(|(_, event)| event.event_id != seed.event_id)
        .map(|(position, event)| {
            let shared = shared_keyword_count(&seed.keywords, &event.keywords);
            let distance = event
                .timestamp
                .signed_duration_since(seed.timestamp)
                .num_milliseconds()
                .unsigned_abs();
            (Reverse(shared), distance, position, event.event_id.as_str())
        })
        .collect();
    ranked.sort_unstable();

    std::iter::once(seed.event_id.clone())
        .chain(
            ranked
                .into_iter()
                .take(depth.saturating_sub(1))
                .map(|(_, _, _, id)| id.to_string()),
        )
        .collect()
}

/// Title used when no enrichment title is available.
pub fn fallback_arc_title(seed: &SymbolicEvent) -> String {
    format!("Narrative Arc from {}", seed.title)
}

/// Seed keywords that recur in at least one other member, in seed order.
fn shared_threads<'a>(
    seed: &'a SymbolicEvent,
    members: &[String],
    snapshot: &EventSnapshot,
) -> Vec<&'a str> {
    let others: HashSet<&str> = members
        .iter()
        .filter(|id| **id != seed.event_id)
        .filter_map(|id| snapshot.get(id))
        .flat_map(|event| event.keywords.iter().map(String::as_str))
        .collect();
    seed.keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| others.contains(kw))
        .collect()
}

/// Summary used when no enrichment summary is available.
pub fn fallback_arc_summary(
    seed: &SymbolicEvent,
    members: &[String],
    snapshot: &EventSnapshot,
) -> String {
    let threads = shared_threads(seed, members, snapshot);
    let noun = if members.len() == 1 { "event" } else { "events" };
    if threads.is_empty() {
        format!(
            "A path of {} {} traced from \"{}\" by temporal proximity.",
            members.len(),
            noun,
            seed.title
        )
    } else {
        format!(
            "A path of {} {} traced from \"{}\" along the shared threads of {}.",
            members.len(),
            noun,
            seed.title,
            threads.join(", ")
        )
    }
}
