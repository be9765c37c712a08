//! Dispatch of `{action, data}` envelopes onto the services.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::api::error::ErrorResponse;
use crate::api::types::*;
use crate::init::AppContext;
use crate::models::{EventDraft, EventSnapshot, SymbolicEvent};
use crate::services::{compute_resonance, validate_depth};
use crate::MythosError;

/// Successful response of any action.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    IngestEvent(IngestEventResponse),
    QueryNarrativeArc(QueryNarrativeArcResponse),
    EnhanceEvent(EnhanceEventResponse),
    ComputeResonance(ComputeResonanceResponse),
}

/// JSON action handler over one application context.
///
/// Cheap to clone; concurrent calls share the context's repositories.
#[derive(Clone)]
pub struct ActionHandler {
    ctx: Arc<AppContext>,
}

impl ActionHandler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Handle a raw JSON envelope. Always produces a JSON response; parse
    /// failures become a `bad_request` error body.
    pub async fn handle_json(&self, raw: &str) -> Value {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => to_json(&ErrorResponse::bad_request(format!("invalid JSON: {}", e))),
        }
    }

    pub async fn handle_value(&self, value: Value) -> Value {
        let request = match serde_json::from_value::<ActionRequest>(value) {
            Ok(request) => request,
            Err(e) => {
                return to_json(&ErrorResponse::bad_request(format!(
                    "unrecognized action envelope: {}",
                    e
                )))
            }
        };
        match self.handle(request).await {
            Ok(response) => to_json(&response),
            Err(error) => to_json(&error),
        }
    }

    #[instrument(skip_all)]
    pub async fn handle(&self, request: ActionRequest) -> Result<ActionResponse, ErrorResponse> {
        let response = match request {
            ActionRequest::IngestEvent(req) => self.ingest_event(req).await,
            ActionRequest::QueryNarrativeArc(req) => self.query_narrative_arc(req).await,
            ActionRequest::EnhanceEvent(req) => Ok(self.enhance_event(req).await),
            ActionRequest::ComputeResonance(req) => self.compute_resonance(req).await,
        };
        response.map_err(|e| {
            debug!(kind = e.kind(), error = %e, "action failed");
            ErrorResponse::from(e)
        })
    }

    async fn ingest_event(&self, req: IngestEventRequest) -> Result<ActionResponse, MythosError> {
        let draft = EventDraft::new(req.title, req.keywords, req.narrative_fragment);
        let outcome = self.ctx.ingest_service.ingest(&draft).await?;

        let message = if outcome.enriched {
            format!("Symbolic event '{}' ingested", outcome.event.title)
        } else {
            format!(
                "Symbolic event '{}' ingested without enrichment",
                outcome.event.title
            )
        };

        Ok(ActionResponse::IngestEvent(IngestEventResponse {
            success: true,
            event: outcome.event,
            enhancement: outcome.enhancement,
            message,
        }))
    }

    async fn query_narrative_arc(
        &self,
        req: QueryNarrativeArcRequest,
    ) -> Result<ActionResponse, MythosError> {
        let depth = parse_depth(req.depth.as_ref())?;
        let snapshot = self.snapshot_from(req.events).await?;

        let construction = self
            .ctx
            .arc_constructor
            .construct(&req.start_event_id, depth, &snapshot)
            .await?;

        let count = construction.arc.len();
        Ok(ActionResponse::QueryNarrativeArc(QueryNarrativeArcResponse {
            success: true,
            message: format!(
                "Narrative arc constructed with {} event{}",
                count,
                if count == 1 { "" } else { "s" }
            ),
            arc: construction.arc,
            construction: ConstructionReport {
                path: construction.path,
                archetypal_patterns: construction.archetypal_patterns,
                temporal_insights: construction.temporal_insights,
                mythic_resonance: construction.mythic_resonance,
            },
        }))
    }

    async fn enhance_event(&self, req: EnhanceEventRequest) -> ActionResponse {
        let enhancement = self.ctx.ingest_service.enhance(&req.event).await;
        ActionResponse::EnhanceEvent(EnhanceEventResponse {
            success: true,
            enhancement,
        })
    }

    async fn compute_resonance(
        &self,
        req: ComputeResonanceRequest,
    ) -> Result<ActionResponse, MythosError> {
        let snapshot = self.snapshot_from(req.events).await?;
        Ok(ActionResponse::ComputeResonance(ComputeResonanceResponse {
            success: true,
            resonance: compute_resonance(&req.arc, &snapshot),
        }))
    }

    async fn snapshot_from(
        &self,
        events: Option<Vec<SymbolicEvent>>,
    ) -> Result<EventSnapshot, MythosError> {
        match events {
            Some(events) => EventSnapshot::from_events(events),
            None => self.ctx.events.snapshot().await,
        }
    }
}

/// Depth from the raw request value. Absent or null means the default;
/// anything that is not an integer in `[1, 10]` is rejected.
pub fn parse_depth(value: Option<&Value>) -> Result<usize, MythosError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_DEPTH),
        Some(raw) => {
            let depth = raw
                .as_u64()
                .and_then(|d| usize::try_from(d).ok())
                .ok_or_else(|| {
                    MythosError::Validation(format!(
                        "depth must be an integer between 1 and 10, got {}",
                        raw
                    ))
                })?;
            validate_depth(depth)
        }
    }
}

fn to_json<T: Serialize>(body: &T) -> Value {
    serde_json::to_value(body).unwrap_or_else(|e| {
        serde_json::json!({
            "success": false,
            "error": "internal_error",
            "message": format!("failed to serialize response: {}", e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_depth_defaults_when_absent() {
        assert_eq!(parse_depth(None).unwrap(), DEFAULT_DEPTH);
        assert_eq!(parse_depth(Some(&Value::Null)).unwrap(), DEFAULT_DEPTH);
    }

    #[test]
    fn test_depth_bounds() {
        assert_eq!(parse_depth(Some(&json!(1))).unwrap(), 1);
        assert_eq!(parse_depth(Some(&json!(10))).unwrap(), 10);
        assert!(parse_depth(Some(&json!(0))).is_err());
        assert!(parse_depth(Some(&json!(11))).is_err());
    }

    #[test]
    fn test_depth_rejects_non_integers() {
        for raw in [json!(-1), json!(2.5), json!("3"), json!([3])] {
            let err = parse_depth(Some(&raw)).unwrap_err();
            assert_eq!(err.kind(), "validation_error", "accepted {}", raw);
        }
    }
}
