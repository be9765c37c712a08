use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upper bound on `archetypal_motifs`.
pub const MAX_MOTIFS: usize = 5;

/// Derived, read-only view over an arc's events. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MythicResonance {
    pub resonance_summary: String,
    pub archetypal_motifs: Vec<String>,
}
