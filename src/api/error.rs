use serde::Serialize;

use crate::MythosError;

/// Failure response at the JSON boundary. Never carries an event or arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub suggestion: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, suggestion: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            message,
            suggestion: suggestion.to_string(),
        }
    }

    /// The envelope itself could not be understood.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            "bad_request",
            message.into(),
            "Send {\"action\": <ingest_event|query_narrative_arc|enhance_event|compute_resonance>, \"data\": {...}}.",
        )
    }
}

impl From<MythosError> for ErrorResponse {
    fn from(err: MythosError) -> Self {
        let suggestion = match &err {
            MythosError::Validation(_) => {
                "Check required fields are non-empty and depth is an integer between 1 and 10."
            }
            MythosError::NotFound { .. } => {
                "Check the event id against the events supplied with the request."
            }
            MythosError::Conflict(_) => "Use an id that is not already recorded.",
            MythosError::Storage(_) | MythosError::Config(_) => "Retry the operation.",
        };
        Self::new(err.kind(), err.to_string(), suggestion)
    }
}
