//! Enrichment port: the boundary to an external semantic-analysis capability.
//!
//! The `EnrichmentPort` trait abstracts event enrichment and arc suggestion so
//! the engine can run against a remote model, a local heuristic, or a test
//! double. Every failure is reported as [`EnrichmentUnavailable`]; callers
//! recover from it with the deterministic fallbacks in
//! [`crate::services::fallback`].

pub mod chat;
pub mod payload;
pub mod prompts;
pub mod provider;

use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EventContent, SymbolicEvent};

pub use chat::{ChatCompletionEnrichment, ChatSettings};
pub use provider::{create_enrichment_port, EnrichmentProviderConfig};

/// Lowest accepted `symbolic_significance`.
pub const MIN_SIGNIFICANCE: u8 = 1;
/// Highest accepted `symbolic_significance`.
pub const MAX_SIGNIFICANCE: u8 = 10;
/// Significance assigned when no enrichment is available.
pub const FALLBACK_SIGNIFICANCE: u8 = 5;

/// Semantic augmentation of an event draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnrichmentResult {
    pub enhanced_keywords: Vec<String>,
    pub expanded_fragment: String,
    pub symbolic_significance: u8,
    pub archetypal_motifs: Vec<String>,
}

/// A proposed arc. Untrusted: the arc constructor filters and truncates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArcSuggestion {
    pub title: String,
    pub connected_event_ids: Vec<String>,
    pub narrative_summary: String,
    pub archetypal_patterns: Vec<String>,
    #[serde(default)]
    pub temporal_insights: String,
    #[serde(default)]
    pub mythic_resonance: String,
}

/// Why enrichment could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrichmentUnavailable {
    #[error("enrichment is disabled")]
    Disabled,

    #[error("enrichment timed out after {0:?}")]
    Timeout(Duration),

    #[error("enrichment network failure: {0}")]
    Network(String),

    #[error("enrichment provider rejected the credentials")]
    Unauthorized,

    #[error("enrichment provider returned status {status}")]
    Api { status: u16 },

    #[error("malformed enrichment payload: {0}")]
    Malformed(String),
}

/// Port trait for the external semantic-analysis capability.
///
/// Implementations must never surface a structural error: anything that
/// goes wrong is an `EnrichmentUnavailable`.
#[async_trait]
pub trait EnrichmentPort: Send + Sync {
    /// Propose keywords, an expanded fragment and a significance rating.
    async fn enrich_event(
        &self,
        content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable>;

    /// Propose an arc of at most `depth` events starting at `seed_id`.
    async fn suggest_arc(
        &self,
        seed_id: &str,
        candidates: &[SymbolicEvent],
        depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable>;

    /// Whether the port is configured to reach anything at all.
    fn is_available(&self) -> bool;
}

/// Enrichment port that is always unavailable.
///
/// Used when no provider is configured, and in tests that exercise the
/// fallback path.
pub struct NoopEnrichment;

impl Default for NoopEnrichment {
    fn default() -> Self {
        Self::new()
    }
}

impl NoopEnrichment {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnrichmentPort for NoopEnrichment {
    async fn enrich_event(
        &self,
        _content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable> {
        Err(EnrichmentUnavailable::Disabled)
    }

    async fn suggest_arc(
        &self,
        _seed_id: &str,
        _candidates: &[SymbolicEvent],
        _depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable> {
        Err(EnrichmentUnavailable::Disabled)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Run `enrich_event` under a timeout budget. Expiry is `Timeout`.
pub async fn enrich_within(
    port: &dyn EnrichmentPort,
    content: &EventContent,
    budget: Duration,
) -> Result<EnrichmentResult, EnrichmentUnavailable> {
    if !port.is_available() {
        return Err(EnrichmentUnavailable::Disabled);
    }
    match tokio::time::timeout(budget, port.enrich_event(content)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichmentUnavailable::Timeout(budget)),
    }
}

/// Run `suggest_arc` under a timeout budget. Expiry is `Timeout`.
pub async fn suggest_within(
    port: &dyn EnrichmentPort,
    seed_id: &str,
    candidates: &[SymbolicEvent],
    depth: usize,
    budget: Duration,
) -> Result<ArcSuggestion, EnrichmentUnavailable> {
    if !port.is_available() {
        return Err(EnrichmentUnavailable::Disabled);
    }
    match tokio::time::timeout(budget, port.suggest_arc(seed_id, candidates, depth)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichmentUnavailable::Timeout(budget)),
    }
}
