//! Test harness: isolated contexts and enrichment test doubles.
//!
//! Every context owns fresh repositories, so tests run concurrently without
//! sharing state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mythos::enrichment::{
    ArcSuggestion, EnrichmentPort, EnrichmentResult, EnrichmentUnavailable, NoopEnrichment,
};
use mythos::init::AppContext;
use mythos::models::{EventContent, SymbolicEvent};

/// Budget used by contexts in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(200);

/// Outer deadline for dropping a request while enrichment is still pending.
/// Must stay below `TEST_TIMEOUT`.
pub const CANCEL_AFTER: Duration = Duration::from_millis(50);

/// Context with enrichment disabled: every path is the fallback.
pub fn fallback_context() -> Arc<AppContext> {
    Arc::new(AppContext::in_memory(test_enrichment_port(), TEST_TIMEOUT))
}

/// Context over a specific port.
pub fn context_with(port: Arc<dyn EnrichmentPort>) -> Arc<AppContext> {
    Arc::new(AppContext::in_memory(port, TEST_TIMEOUT))
}

/// Create a no-op enrichment port for testing.
pub fn test_enrichment_port() -> Arc<dyn EnrichmentPort> {
    Arc::new(NoopEnrichment::new())
}

/// Port that answers with fixed payloads and counts calls.
#[derive(Default)]
pub struct ScriptedEnrichment {
    pub event_result: Option<EnrichmentResult>,
    pub arc_suggestion: Option<ArcSuggestion>,
    pub event_calls: AtomicUsize,
    pub arc_calls: AtomicUsize,
}

impl ScriptedEnrichment {
    pub fn with_event(result: EnrichmentResult) -> Self {
        Self {
            event_result: Some(result),
            ..Default::default()
        }
    }

    pub fn with_arc(suggestion: ArcSuggestion) -> Self {
        Self {
            arc_suggestion: Some(suggestion),
            ..Default::default()
        }
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    pub fn arc_calls(&self) -> usize {
        self.arc_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrichmentPort for ScriptedEnrichment {
    async fn enrich_event(
        &self,
        _content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        self.event_result
            .clone()
            .ok_or(EnrichmentUnavailable::Malformed("no scripted event".into()))
    }

    async fn suggest_arc(
        &self,
        _seed_id: &str,
        _candidates: &[SymbolicEvent],
        _depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable> {
        self.arc_calls.fetch_add(1, Ordering::SeqCst);
        self.arc_suggestion
            .clone()
            .ok_or(EnrichmentUnavailable::Malformed("no scripted arc".into()))
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Port that claims availability and never answers.
pub struct StalledEnrichment;

#[async_trait]
impl EnrichmentPort for StalledEnrichment {
    async fn enrich_event(
        &self,
        _content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable> {
        std::future::pending().await
    }

    async fn suggest_arc(
        &self,
        _seed_id: &str,
        _candidates: &[SymbolicEvent],
        _depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable> {
        std::future::pending().await
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Port that always fails with the given reason.
pub struct FailingEnrichment(pub EnrichmentUnavailable);

#[async_trait]
impl EnrichmentPort for FailingEnrichment {
    async fn enrich_event(
        &self,
        _content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable> {
        Err(self.0.clone())
    }

    async fn suggest_arc(
        &self,
        _seed_id: &str,
        _candidates: &[SymbolicEvent],
        _depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable> {
        Err(self.0.clone())
    }

    fn is_available(&self) -> bool {
        true
    }
}
