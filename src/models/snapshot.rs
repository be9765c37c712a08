//! Immutable, insertion-ordered event sets used as the reference for one
//! arc construction or resonance computation.

use std::collections::HashMap;

use crate::models::SymbolicEvent;
use crate::MythosError;

#[derive(Debug, Clone, Default)]
pub struct EventSnapshot {
    events: Vec<SymbolicEvent>,
    index: HashMap<String, usize>,
}

impl EventSnapshot {
    /// Build a snapshot from caller-supplied events.
    ///
    /// # Errors
    ///
    /// Returns `MythosError::Validation` if two events share an `event_id`.
    pub fn from_events(events: Vec<SymbolicEvent>) -> Result<Self, MythosError> {
        let mut index = HashMap::with_capacity(events.len());
        for (position, event) in events.iter().enumerate() {
            if index.insert(event.event_id.clone(), position).is_some() {
                return Err(MythosError::Validation(format!(
                    "duplicate event_id '{}' in snapshot",
                    event.event_id
                )));
            }
        }
        Ok(Self { events, index })
    }

    /// Build a snapshot from events whose ids are already known to be unique
    /// (the repository enforces this on every write).
    pub(crate) fn from_unique(events: Vec<SymbolicEvent>) -> Self {
        let index = events
            .iter()
            .enumerate()
            .map(|(position, event)| (event.event_id.clone(), position))
            .collect();
        Self { events, index }
    }

    pub fn get(&self, event_id: &str) -> Option<&SymbolicEvent> {
        self.index.get(event_id).map(|&position| &self.events[position])
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.index.contains_key(event_id)
    }

    /// Insertion position of an event, used as the final ranking tie-break.
    pub fn position(&self, event_id: &str) -> Option<usize> {
        self.index.get(event_id).copied()
    }

    /// Ids from `ids` that this snapshot does not hold, in the given order.
    pub fn unresolved<'a>(&self, ids: &'a [String]) -> Vec<&'a str> {
        ids.iter()
            .map(String::as_str)
            .filter(|id| !self.contains(id))
            .collect()
    }

    pub fn events(&self) -> &[SymbolicEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolicEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn into_events(self) -> Vec<SymbolicEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(id: &str) -> SymbolicEvent {
        SymbolicEvent {
            event_id: id.to_string(),
            title: format!("Event {id}"),
            timestamp: Utc::now(),
            keywords: vec![],
            narrative_fragment: "text".to_string(),
        }
    }

    #[test]
    fn test_from_events_rejects_duplicates() {
        let err = EventSnapshot::from_events(vec![event("a"), event("b"), event("a")]).unwrap_err();
        assert!(matches!(err, MythosError::Validation(msg) if msg.contains("'a'")));
    }

    #[test]
    fn test_lookup_and_position() {
        let snapshot = EventSnapshot::from_events(vec![event("a"), event("b")]).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.position("b"), Some(1));
        assert_eq!(snapshot.get("a").map(|e| e.title.as_str()), Some("Event a"));
        assert!(!snapshot.contains("c"));
    }

    #[test]
    fn test_unresolved_keeps_order() {
        let snapshot = EventSnapshot::from_events(vec![event("a"), event("b")]).unwrap();
        let ids: Vec<String> = ["z", "a", "y", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(snapshot.unresolved(&ids), vec!["z", "y"]);
        assert!(snapshot.unresolved(&ids[1..2]).is_empty());
    }
}
