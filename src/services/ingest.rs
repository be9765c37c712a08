//! Event ingestion: validate, optionally enrich, then store in one write.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::enrichment::{enrich_within, EnrichmentPort, EnrichmentResult, FALLBACK_SIGNIFICANCE};
use crate::models::{EventDraft, SymbolicEvent};
use crate::repository::EventRepository;
use crate::services::fallback::fallback_enrichment;
use crate::MythosError;

/// Result of one ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    pub event: SymbolicEvent,
    /// The enrichment that was applied (the fallback values when `enriched`
    /// is false).
    pub enhancement: EnrichmentResult,
    pub enriched: bool,
}

pub struct IngestService {
    events: Arc<dyn EventRepository>,
    enrichment: Arc<dyn EnrichmentPort>,
    timeout: Duration,
}

impl IngestService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        enrichment: Arc<dyn EnrichmentPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            events,
            enrichment,
            timeout,
        }
    }

    /// Ingest a draft.
    ///
    /// The enrichment call completes (or times out) before the repository
    /// write, so dropping this future early records nothing.
    ///
    /// # Errors
    ///
    /// `MythosError::Validation` for an empty title or fragment. Enrichment
    /// unavailability is not an error.
    pub async fn ingest(&self, draft: &EventDraft) -> Result<IngestOutcome, MythosError> {
        let content = draft.validate()?;

        let (enhancement, enriched) =
            match enrich_within(self.enrichment.as_ref(), &content, self.timeout).await {
                Ok(result) => (result, true),
                Err(reason) => {
                    warn!(title = %content.title(), %reason, "event enrichment unavailable, using draft values");
                    (fallback_enrichment(&content), false)
                }
            };

        let content = if enriched {
            content.with_enrichment(&enhancement)
        } else {
            content
        };

        let event = self.events.store(content).await?;
        info!(event_id = %event.event_id, enriched, "symbolic event ingested");

        Ok(IngestOutcome {
            event,
            enhancement,
            enriched,
        })
    }

    /// Enrichment for an existing event, for display only. The stored event
    /// is never modified.
    pub async fn enhance(&self, event: &SymbolicEvent) -> EnrichmentResult {
        let draft = EventDraft::new(
            event.title.clone(),
            event.keywords.join(","),
            if event.narrative_fragment.trim().is_empty() {
                event.title.clone()
            } else {
                event.narrative_fragment.clone()
            },
        );
        let content = match draft.validate() {
            Ok(content) => content,
            Err(_) => {
                return EnrichmentResult {
                    enhanced_keywords: event.keywords.clone(),
                    expanded_fragment: event.narrative_fragment.clone(),
                    symbolic_significance: FALLBACK_SIGNIFICANCE,
                    archetypal_motifs: Vec::new(),
                }
            }
        };

        match enrich_within(self.enrichment.as_ref(), &content, self.timeout).await {
            Ok(result) => result,
            Err(reason) => {
                warn!(event_id = %event.event_id, %reason, "enhancement unavailable, using fallback");
                fallback_enrichment(&content)
            }
        }
    }
}
