//! Test data builders for events and snapshots.
//!
//! Provides a fluent API for creating test events with sensible defaults.

use chrono::{DateTime, Duration, TimeZone, Utc};

use mythos::models::{EventDraft, EventSnapshot, SymbolicEvent};

/// Fixed origin for builder timestamps so distances are exact.
pub fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap()
}

/// Draft with comma-joined keywords.
pub fn draft(title: &str, keywords: &[&str], fragment: &str) -> EventDraft {
    EventDraft::new(title, keywords.join(", "), fragment)
}

/// Builder for already-identified events (snapshots, restores).
pub struct EventBuilder {
    event_id: String,
    title: String,
    timestamp: DateTime<Utc>,
    keywords: Vec<String>,
    narrative_fragment: String,
}

impl EventBuilder {
    pub fn new(event_id: impl Into<String>) -> Self {
        let event_id = event_id.into();
        Self {
            title: format!("Event {}", event_id),
            event_id,
            timestamp: origin(),
            keywords: Vec::new(),
            narrative_fragment: "A fragment of the pattern.".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Timestamp `minutes` after [`origin`] (negative for before).
    pub fn at_minute(mut self, minutes: i64) -> Self {
        self.timestamp = origin() + Duration::minutes(minutes);
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.narrative_fragment = fragment.into();
        self
    }

    pub fn build(self) -> SymbolicEvent {
        SymbolicEvent {
            event_id: self.event_id,
            title: self.title,
            timestamp: self.timestamp,
            keywords: self.keywords,
            narrative_fragment: self.narrative_fragment,
        }
    }
}

pub fn snapshot_of(events: Vec<SymbolicEvent>) -> EventSnapshot {
    EventSnapshot::from_events(events).expect("test events must have unique ids")
}
