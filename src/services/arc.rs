//! Narrative arc construction.
//!
//! One request moves through `Idle → Enriching → {Completed | FallbackApplied}`.
//! The enrichment suggestion is untrusted: it is filtered against the
//! snapshot and truncated to the requested depth, never extended. When
//! enrichment is unavailable the deterministic selection in
//! [`crate::services::fallback`] is used instead. Either way the caller gets
//! a structurally valid arc, appended exactly once to the history.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::enrichment::{suggest_within, ArcSuggestion, EnrichmentPort};
use crate::models::{new_arc_id, EventSnapshot, NarrativeArc, SymbolicEvent};
use crate::repository::ArcRepository;
use crate::services::fallback::{fallback_arc_summary, fallback_arc_title, select_arc_members};
use crate::MythosError;

/// Smallest accepted arc depth.
pub const MIN_DEPTH: usize = 1;
/// Largest accepted arc depth.
pub const MAX_DEPTH: usize = 10;

/// Which branch produced an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionPath {
    Enriched,
    Fallback,
}

/// A constructed arc plus how it was made.
///
/// The interpretive fields come from the enrichment suggestion and stay
/// empty on the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArcConstruction {
    pub arc: NarrativeArc,
    pub path: ConstructionPath,
    pub archetypal_patterns: Vec<String>,
    pub temporal_insights: String,
    pub mythic_resonance: String,
}

/// Reject depths outside `[1, 10]`. Out-of-range values are not clamped.
pub fn validate_depth(depth: usize) -> Result<usize, MythosError> {
    if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(MythosError::Validation(format!(
            "depth must be between {} and {}, got {}",
            MIN_DEPTH, MAX_DEPTH, depth
        )))
    }
}

/// Reduce a suggestion to ids that resolve in `snapshot`: seed first, no
/// duplicates, at most `depth` entries.
pub fn filter_suggested_ids(
    seed_id: &str,
    suggested: &[String],
    snapshot: &EventSnapshot,
    depth: usize,
) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::from([seed_id]);
    let mut ids = vec![seed_id.to_string()];

    for id in suggested {
        if ids.len() >= depth {
            break;
        }
        if !snapshot.contains(id) {
            debug!(event_id = %id, "dropping suggested id missing from snapshot");
            continue;
        }
        if seen.insert(id.as_str()) {
            ids.push(id.clone());
        }
    }
    ids
}

pub struct ArcConstructor {
    enrichment: Arc<dyn EnrichmentPort>,
    history: Arc<dyn ArcRepository>,
    timeout: Duration,
}

impl ArcConstructor {
    pub fn new(
        enrichment: Arc<dyn EnrichmentPort>,
        history: Arc<dyn ArcRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            enrichment,
            history,
            timeout,
        }
    }

    /// Construct an arc and record it in the history.
    ///
    /// # Errors
    ///
    /// * `MythosError::Validation` if `depth` is outside `[1, 10]`
    /// * `MythosError::NotFound` if the seed is not in `snapshot`
    ///
    /// Enrichment failures are never returned; they select the fallback.
    pub async fn construct_arc(
        &self,
        seed_event_id: &str,
        depth: usize,
        snapshot: &EventSnapshot,
    ) -> Result<NarrativeArc, MythosError> {
        Ok(self.construct(seed_event_id, depth, snapshot).await?.arc)
    }

    /// Like [`construct_arc`](Self::construct_arc), also reporting the path
    /// taken and the suggestion's patterns and insights.
    pub async fn construct(
        &self,
        seed_event_id: &str,
        depth: usize,
        snapshot: &EventSnapshot,
    ) -> Result<ArcConstruction, MythosError> {
        let depth = validate_depth(depth)?;
        let seed = snapshot
            .get(seed_event_id)
            .ok_or_else(|| MythosError::event_not_found(seed_event_id))?;

        debug!(seed = %seed_event_id, depth, "arc construction: enriching");
        let outcome = suggest_within(
            self.enrichment.as_ref(),
            seed_event_id,
            snapshot.events(),
            depth,
            self.timeout,
        )
        .await;

        let construction = match outcome {
            Ok(suggestion) => {
                debug!(seed = %seed_event_id, "arc construction: completed");
                Self::from_suggestion(seed, suggestion, snapshot, depth)
            }
            Err(reason) => {
                warn!(
                    seed = %seed_event_id,
                    %reason,
                    "arc enrichment unavailable, applying fallback selection"
                );
                Self::from_fallback(seed, snapshot, depth)
            }
        };

        let arc = &construction.arc;
        debug_assert_eq!(arc.seed_id(), Some(seed_event_id));
        debug_assert!(arc.len() <= depth);

        self.history.append(arc.clone()).await?;
        info!(
            arc_id = %arc.arc_id,
            seed = %seed_event_id,
            events = arc.len(),
            path = ?construction.path,
            "narrative arc constructed"
        );

        Ok(construction)
    }

    fn from_suggestion(
        seed: &SymbolicEvent,
        suggestion: ArcSuggestion,
        snapshot: &EventSnapshot,
        depth: usize,
    ) -> ArcConstruction {
        let event_ids = filter_suggested_ids(
            &seed.event_id,
            &suggestion.connected_event_ids,
            snapshot,
            depth,
        );

        let title = if suggestion.title.is_empty() {
            fallback_arc_title(seed)
        } else {
            suggestion.title
        };
        let summary = if suggestion.narrative_summary.is_empty() {
            fallback_arc_summary(seed, &event_ids, snapshot)
        } else {
            suggestion.narrative_summary
        };

        ArcConstruction {
            arc: NarrativeArc {
                arc_id: new_arc_id(),
                title,
                event_ids,
                summary,
            },
            path: ConstructionPath::Enriched,
            archetypal_patterns: suggestion.archetypal_patterns,
            temporal_insights: suggestion.temporal_insights,
            mythic_resonance: suggestion.mythic_resonance,
        }
    }

    fn from_fallback(
        seed: &SymbolicEvent,
        snapshot: &EventSnapshot,
        depth: usize,
    ) -> ArcConstruction {
        let event_ids = select_arc_members(seed, snapshot, depth);
        ArcConstruction {
            arc: NarrativeArc {
                arc_id: new_arc_id(),
                title: fallback_arc_title(seed),
                summary: fallback_arc_summary(seed, &event_ids, snapshot),
                event_ids,
            },
            path: ConstructionPath::Fallback,
            archetypal_patterns: Vec::new(),
            temporal_insights: String::new(),
            mythic_resonance: String::new(),
        }
    }
}
