pub mod arc;
pub mod fallback;
pub mod ingest;
pub mod resonance;

pub use arc::{
    filter_suggested_ids, validate_depth, ArcConstruction, ArcConstructor, ConstructionPath,
    MAX_DEPTH, MIN_DEPTH,
};
pub use fallback::{fallback_enrichment, select_arc_members, shared_keyword_count};
pub use ingest::{IngestOutcome, IngestService};
pub use resonance::compute_resonance;
