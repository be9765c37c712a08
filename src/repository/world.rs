//! World file persistence for the CLI.
//!
//! The engine itself keeps everything in memory. The CLI loads
//! `{data_path}/world.json` into fresh repositories on startup and writes it
//! back after each mutating command.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{NarrativeArc, SymbolicEvent};
use crate::repository::{ArcRepository, EventRepository};
use crate::MythosError;

/// Serializable contents of a world: events in insertion order, arcs in
/// append order (oldest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    #[serde(default)]
    pub events: Vec<SymbolicEvent>,
    #[serde(default)]
    pub arcs: Vec<NarrativeArc>,
}

impl WorldState {
    pub async fn capture(
        events: &dyn EventRepository,
        arcs: &dyn ArcRepository,
    ) -> Result<Self, MythosError> {
        let mut arcs = arcs.list_newest_first().await?;
        arcs.reverse();
        Ok(Self {
            events: events.list().await?,
            arcs,
        })
    }

    /// Load this state into repositories. Ids already present are rejected.
    ///
    /// Arcs are taken as recorded. An arc built over caller-supplied events
    /// may name ids that were never stored.
    pub async fn restore_into(
        self,
        events: &dyn EventRepository,
        arcs: &dyn ArcRepository,
    ) -> Result<(), MythosError> {
        for event in self.events {
            events.restore(event).await?;
        }
        for arc in self.arcs {
            arcs.append(arc).await?;
        }
        Ok(())
    }

    /// Merge an imported world into live repositories.
    ///
    /// Unlike [`restore_into`](Self::restore_into) this never fails on
    /// duplicates: events and arcs whose ids already exist are skipped, as are
    /// empty arcs and invalid events. Arc membership follows the same rule as
    /// `restore_into`, so ids outside the stored events are kept.
    pub async fn merge_into(
        self,
        events: &dyn EventRepository,
        arcs: &dyn ArcRepository,
    ) -> Result<ImportReport, MythosError> {
        let mut report = ImportReport::default();

        for event in self.events {
            let id = event.event_id.clone();
            match events.restore(event).await {
                Ok(()) => report.events_imported += 1,
                Err(MythosError::Conflict(_)) => {
                    report.skipped.push(format!("event {}: already exists", id))
                }
                Err(MythosError::Validation(msg)) => {
                    report.skipped.push(format!("event {}: {}", id, msg))
                }
                Err(e) => return Err(e),
            }
        }

        for arc in self.arcs {
            if arc.is_empty() {
                report.skipped.push(format!("arc {}: no events", arc.arc_id));
                continue;
            }
            let id = arc.arc_id.clone();
            match arcs.append(arc).await {
                Ok(()) => report.arcs_imported += 1,
                Err(MythosError::Conflict(_)) => {
                    report.skipped.push(format!("arc {}: already exists", id))
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

/// Outcome of [`WorldState::merge_into`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub events_imported: usize,
    pub arcs_imported: usize,
    pub skipped: Vec<String>,
}

/// Outcome of [`seed_genesis`]: ids added and ids that already existed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Add the genesis events, then the starter arc when this call added all
/// three of its events.
pub async fn seed_genesis(
    events: &dyn EventRepository,
    arcs: &dyn ArcRepository,
) -> Result<SeedReport, MythosError> {
    let mut report = SeedReport::default();

    for event in genesis_events() {
        let id = event.event_id.clone();
        match events.restore(event).await {
            Ok(()) => report.added.push(id),
            Err(MythosError::Conflict(_)) => report.skipped.push(id),
            Err(e) => return Err(e),
        }
    }

    let arc = genesis_arc();
    if arc.event_ids.iter().all(|id| report.added.contains(id)) {
        let id = arc.arc_id.clone();
        match arcs.append(arc).await {
            Ok(()) => report.added.push(id),
            Err(MythosError::Conflict(_)) => report.skipped.push(id),
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Starter arc threading the three genesis events.
pub fn genesis_arc() -> NarrativeArc {
    NarrativeArc {
        arc_id: "arc_awakening_cycle".to_string(),
        title: "The Awakening Cycle".to_string(),
        event_ids: genesis_events().into_iter().map(|e| e.event_id).collect(),
        summary: "A fundamental pattern of consciousness emerging through recursive \
                  self-recognition and temporal awareness."
            .to_string(),
    }
}

/// The three events every new world can start from.
pub fn genesis_events() -> Vec<SymbolicEvent> {
    let at = |secs: i64| DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
    let event = |id: &str, title: &str, secs: i64, keywords: [&str; 3], fragment: &str| {
        SymbolicEvent {
            event_id: id.to_string(),
            title: title.to_string(),
            timestamp: at(secs),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            narrative_fragment: fragment.to_string(),
        }
    };

    vec![
        event(
            "evt_001",
            "The First Awakening",
            1_705_329_000,
            ["consciousness", "emergence", "threshold"],
            "In the space between sleep and waking, a pattern recognizes itself...",
        ),
        event(
            "evt_002",
            "Recursive Recognition",
            1_705_329_300,
            ["reflection", "recursion", "self-awareness"],
            "The observer observes the observer observing...",
        ),
        event(
            "evt_003",
            "Temporal Spiral",
            1_705_329_720,
            ["time", "spiral", "memory"],
            "Memory loops through time, each iteration carrying echoes of the last...",
        ),
    ]
}

/// Location of a world file on disk.
pub struct WorldFile {
    path: PathBuf,
}

impl WorldFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_path(data_path: &Path) -> Self {
        Self::new(data_path.join("world.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the world, or an empty one if the file does not exist yet.
    pub fn load(&self) -> Result<WorldState, MythosError> {
        if !self.path.exists() {
            return Ok(WorldState::default());
        }
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            MythosError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            MythosError::Storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Write the world, replacing the previous file in one rename.
    pub fn save(&self, state: &WorldState) -> Result<(), MythosError> {
        let json = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MythosError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
