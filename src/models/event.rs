use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enrichment::EnrichmentResult;
use crate::MythosError;

/// An immutable symbolic event.
///
/// Events are only ever produced by an [`EventRepository`](crate::repository::EventRepository)
/// (which owns id assignment and timestamps) or deserialized from a
/// caller-supplied snapshot. There is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SymbolicEvent {
    pub event_id: String,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub narrative_fragment: String,
}

/// Raw ingestion input, as it arrives over the boundary.
///
/// `keywords` is the comma-delimited text typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub keywords: String,
    pub narrative_fragment: String,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        keywords: impl Into<String>,
        narrative_fragment: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            keywords: keywords.into(),
            narrative_fragment: narrative_fragment.into(),
        }
    }

    /// Validate required fields and normalize keywords.
    ///
    /// # Errors
    ///
    /// Returns `MythosError::Validation` if the title or the narrative
    /// fragment is empty (after trimming).
    pub fn validate(&self) -> Result<EventContent, MythosError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MythosError::Validation("title must not be empty".into()));
        }
        if self.narrative_fragment.trim().is_empty() {
            return Err(MythosError::Validation(
                "narrative_fragment must not be empty".into(),
            ));
        }

        Ok(EventContent {
            title: title.to_string(),
            keywords: normalize_keywords(&self.keywords),
            narrative_fragment: self.narrative_fragment.clone(),
        })
    }
}

/// Validated event content, ready to be stored.
///
/// Can only be obtained through [`EventDraft::validate`], so a stored event
/// always has a non-empty title and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContent {
    title: String,
    keywords: Vec<String>,
    narrative_fragment: String,
}

impl EventContent {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn narrative_fragment(&self) -> &str {
        &self.narrative_fragment
    }

    /// Apply an enrichment result, keeping the original field wherever the
    /// enrichment value is unusable.
    pub fn with_enrichment(mut self, enrichment: &EnrichmentResult) -> Self {
        let keywords = dedupe_keywords(enrichment.enhanced_keywords.iter().map(String::as_str));
        if !keywords.is_empty() {
            self.keywords = keywords;
        }
        if !enrichment.expanded_fragment.trim().is_empty() {
            self.narrative_fragment = enrichment.expanded_fragment.clone();
        }
        self
    }

    /// Stamp identity onto the content. Only repositories call this.
    pub(crate) fn into_event(self, event_id: String, timestamp: DateTime<Utc>) -> SymbolicEvent {
        SymbolicEvent {
            event_id,
            title: self.title,
            timestamp,
            keywords: self.keywords,
            narrative_fragment: self.narrative_fragment,
        }
    }
}

/// Split comma-delimited keyword text into trimmed, non-empty, unique tokens
/// in first-seen order.
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    dedupe_keywords(raw.split(','))
}

pub(crate) fn dedupe_keywords<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        let token = token.trim();
        if token.is_empty() || out.iter().any(|k| k == token) {
            continue;
        }
        out.push(token.to_string());
    }
    out
}
