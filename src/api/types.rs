use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enrichment::EnrichmentResult;
use crate::models::{MythicResonance, NarrativeArc, SymbolicEvent};
use crate::services::ConstructionPath;

/// Depth used when a query omits it.
pub const DEFAULT_DEPTH: usize = 3;

/// Action envelope: `{"action": "...", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum ActionRequest {
    /// Ingest a new symbolic event.
    IngestEvent(IngestEventRequest),
    /// Construct a narrative arc from a seed event.
    QueryNarrativeArc(QueryNarrativeArcRequest),
    /// Enrichment for an existing event, without storing anything.
    EnhanceEvent(EnhanceEventRequest),
    /// Mythic resonance of an arc over a set of events.
    ComputeResonance(ComputeResonanceRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IngestEventRequest {
    #[serde(default)]
    pub title: String,
    /// Comma-delimited keywords
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub narrative_fragment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryNarrativeArcRequest {
    #[serde(rename = "startEventId")]
    pub start_event_id: String,
    /// Snapshot to build from. When omitted, the handler's own stored events
    /// are used.
    #[serde(default)]
    pub events: Option<Vec<SymbolicEvent>>,
    /// Integer in [1, 10]; defaults to 3
    #[serde(default)]
    pub depth: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EnhanceEventRequest {
    pub event: SymbolicEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ComputeResonanceRequest {
    pub arc: NarrativeArc,
    /// Events the arc refers to. When omitted, the stored events are used.
    #[serde(default)]
    pub events: Option<Vec<SymbolicEvent>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestEventResponse {
    pub success: bool,
    pub event: SymbolicEvent,
    pub enhancement: EnrichmentResult,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstructionReport {
    pub path: ConstructionPath,
    pub archetypal_patterns: Vec<String>,
    pub temporal_insights: String,
    pub mythic_resonance: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryNarrativeArcResponse {
    pub success: bool,
    pub arc: NarrativeArc,
    pub construction: ConstructionReport,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhanceEventResponse {
    pub success: bool,
    pub enhancement: EnrichmentResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputeResonanceResponse {
    pub success: bool,
    pub resonance: MythicResonance,
}
