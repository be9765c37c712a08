pub mod arc;
pub mod event;
pub mod resonance;
pub mod snapshot;

pub use arc::NarrativeArc;
pub use event::{normalize_keywords, EventContent, EventDraft, SymbolicEvent};
pub use resonance::{MythicResonance, MAX_MOTIFS};
pub use snapshot::EventSnapshot;

/// Generate a fresh event identifier (`evt_<uuid>`).
pub fn new_event_id() -> String {
    format!("evt_{}", uuid::Uuid::new_v4().simple())
}

/// Generate a fresh arc identifier (`arc_<uuid>`).
pub fn new_arc_id() -> String {
    format!("arc_{}", uuid::Uuid::new_v4().simple())
}
