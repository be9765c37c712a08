use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::NarrativeArc;
use crate::MythosError;

/// Append-only arc history.
#[async_trait]
pub trait ArcRepository: Send + Sync {
    /// Append one arc. Fails with `Conflict` if the id is already recorded.
    async fn append(&self, arc: NarrativeArc) -> Result<(), MythosError>;

    async fn get(&self, arc_id: &str) -> Result<NarrativeArc, MythosError>;

    /// History for presentation, newest first.
    async fn list_newest_first(&self) -> Result<Vec<NarrativeArc>, MythosError>;

    async fn count(&self) -> Result<usize, MythosError>;
}

#[derive(Default)]
struct ArcLog {
    arcs: Vec<NarrativeArc>,
    ids: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryArcRepository {
    log: RwLock<ArcLog>,
}

impl InMemoryArcRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArcRepository for InMemoryArcRepository {
    async fn append(&self, arc: NarrativeArc) -> Result<(), MythosError> {
        let mut log = self.log.write().await;
        if !log.ids.insert(arc.arc_id.clone()) {
            return Err(MythosError::Conflict(format!(
                "arc id '{}' already exists",
                arc.arc_id
            )));
        }
        log.arcs.push(arc);
        Ok(())
    }

    async fn get(&self, arc_id: &str) -> Result<NarrativeArc, MythosError> {
        self.log
            .read()
            .await
            .arcs
            .iter()
            .find(|arc| arc.arc_id == arc_id)
            .cloned()
            .ok_or_else(|| MythosError::arc_not_found(arc_id))
    }

    async fn list_newest_first(&self) -> Result<Vec<NarrativeArc>, MythosError> {
        Ok(self.log.read().await.arcs.iter().rev().cloned().collect())
    }

    async fn count(&self) -> Result<usize, MythosError> {
        Ok(self.log.read().await.arcs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(id: &str) -> NarrativeArc {
        NarrativeArc {
            arc_id: id.to_string(),
            title: format!("Arc {id}"),
            event_ids: vec!["evt_1".into()],
            summary: String::new(),
        }
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let repo = InMemoryArcRepository::new();
        repo.append(arc("arc_1")).await.unwrap();
        repo.append(arc("arc_2")).await.unwrap();
        let ids: Vec<String> = repo
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.arc_id)
            .collect();
        assert_eq!(ids, vec!["arc_2", "arc_1"]);
    }

    #[tokio::test]
    async fn test_duplicate_arc_id_conflicts() {
        let repo = InMemoryArcRepository::new();
        repo.append(arc("arc_1")).await.unwrap();
        assert!(matches!(
            repo.append(arc("arc_1")).await,
            Err(MythosError::Conflict(_))
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
