use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{new_event_id, EventContent, EventSnapshot, SymbolicEvent};
use crate::MythosError;

/// Repository trait for symbolic event storage.
///
/// The repository is the only place event ids and timestamps are assigned.
/// Writes are single-record appends; readers see an event fully formed or
/// not at all.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Assign a fresh id and timestamp to validated content and store it.
    async fn store(&self, content: EventContent) -> Result<SymbolicEvent, MythosError>;

    /// Insert an event that already carries its identity (world loading,
    /// imports). Existing ids are never overwritten.
    async fn restore(&self, event: SymbolicEvent) -> Result<(), MythosError>;

    async fn get(&self, event_id: &str) -> Result<SymbolicEvent, MythosError>;

    /// All events in insertion order.
    async fn list(&self) -> Result<Vec<SymbolicEvent>, MythosError>;

    /// Point-in-time view for arc construction.
    async fn snapshot(&self) -> Result<EventSnapshot, MythosError>;

    async fn count(&self) -> Result<usize, MythosError>;
}

#[derive(Default)]
struct EventLog {
    events: Vec<SymbolicEvent>,
    index: HashMap<String, usize>,
    latest: Option<DateTime<Utc>>,
}

impl EventLog {
    fn push(&mut self, event: SymbolicEvent) {
        self.latest = Some(match self.latest {
            Some(latest) => latest.max(event.timestamp),
            None => event.timestamp,
        });
        self.index.insert(event.event_id.clone(), self.events.len());
        self.events.push(event);
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_event_id();
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }
}

/// In-process event store guarded by a single writer lock.
#[derive(Default)]
pub struct InMemoryEventRepository {
    log: RwLock<EventLog>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn store(&self, content: EventContent) -> Result<SymbolicEvent, MythosError> {
        let mut log = self.log.write().await;

        // Never stamp earlier than anything already stored.
        let now = Utc::now();
        let timestamp = log.latest.map_or(now, |latest| latest.max(now));

        let event = content.into_event(log.fresh_id(), timestamp);
        log.push(event.clone());
        Ok(event)
    }

    async fn restore(&self, event: SymbolicEvent) -> Result<(), MythosError> {
        if event.event_id.trim().is_empty() {
            return Err(MythosError::Validation("event_id must not be empty".into()));
        }
        if event.title.trim().is_empty() {
            return Err(MythosError::Validation(format!(
                "event '{}' has an empty title",
                event.event_id
            )));
        }

        let mut log = self.log.write().await;
        if log.index.contains_key(&event.event_id) {
            return Err(MythosError::Conflict(format!(
                "event id '{}' already exists",
                event.event_id
            )));
        }
        log.push(event);
        Ok(())
    }

    async fn get(&self, event_id: &str) -> Result<SymbolicEvent, MythosError> {
        let log = self.log.read().await;
        log.index
            .get(event_id)
            .map(|&position| log.events[position].clone())
            .ok_or_else(|| MythosError::event_not_found(event_id))
    }

    async fn list(&self) -> Result<Vec<SymbolicEvent>, MythosError> {
        Ok(self.log.read().await.events.clone())
    }

    async fn snapshot(&self) -> Result<EventSnapshot, MythosError> {
        let events = self.log.read().await.events.clone();
        Ok(EventSnapshot::from_unique(events))
    }

    async fn count(&self) -> Result<usize, MythosError> {
        Ok(self.log.read().await.events.len())
    }
}
