use thiserror::Error;

/// Custom error type for Mythos operations.
///
/// Enrichment failures are deliberately absent: they live in
/// [`crate::enrichment::EnrichmentUnavailable`] and are always recovered
/// through the fallback heuristics.
#[derive(Debug, Error)]
pub enum MythosError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested entity was not found.
    #[error("Not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },

    /// An identifier is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Reading or writing the world file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MythosError {
    pub fn event_not_found(id: impl Into<String>) -> Self {
        MythosError::NotFound {
            entity_type: "event".to_string(),
            id: id.into(),
        }
    }

    pub fn arc_not_found(id: impl Into<String>) -> Self {
        MythosError::NotFound {
            entity_type: "arc".to_string(),
            id: id.into(),
        }
    }

    /// Stable machine-readable kind, used at the JSON boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            MythosError::Validation(_) => "validation_error",
            MythosError::NotFound { .. } => "not_found",
            MythosError::Conflict(_) => "conflict",
            MythosError::Storage(_) | MythosError::Config(_) => "internal_error",
        }
    }
}

impl From<serde_json::Error> for MythosError {
    fn from(err: serde_json::Error) -> Self {
        MythosError::Storage(format!("JSON serialization error: {}", err))
    }
}

impl From<std::io::Error> for MythosError {
    fn from(err: std::io::Error) -> Self {
        MythosError::Storage(format!("I/O error: {}", err))
    }
}
