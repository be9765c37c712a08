use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A seed-first path through the event set.
///
/// `event_ids[0]` is always the seed, ids are unique, and every id resolved
/// in the snapshot the arc was built from. Arcs are append-only history
/// records and are never edited after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NarrativeArc {
    pub arc_id: String,
    pub title: String,
    pub event_ids: Vec<String>,
    pub summary: String,
}

impl NarrativeArc {
    /// The seed event id.
    pub fn seed_id(&self) -> Option<&str> {
        self.event_ids.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }
}
