//! Shared initialization logic for the CLI and the JSON action handler.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{load_config, MythosConfig};
use crate::enrichment::{create_enrichment_port, EnrichmentPort};
use crate::repository::{
    ArcRepository, EventRepository, InMemoryArcRepository, InMemoryEventRepository, WorldFile,
    WorldState,
};
use crate::services::{ArcConstructor, IngestService};

/// Application context holding the stores and services.
///
/// Every context owns its own repositories, so several can coexist in one
/// process (tests do this).
pub struct AppContext {
    /// `None` for purely in-memory contexts
    pub data_path: Option<PathBuf>,
    pub config: MythosConfig,
    pub events: Arc<dyn EventRepository>,
    pub arcs: Arc<dyn ArcRepository>,
    pub enrichment: Arc<dyn EnrichmentPort>,
    pub ingest_service: IngestService,
    pub arc_constructor: ArcConstructor,
}

impl AppContext {
    /// Initialize a context backed by a data directory.
    ///
    /// Data path priority: explicit path > MYTHOS_DATA_PATH env > ./.mythos (if exists) > ~/.mythos
    pub async fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = explicit_path
            .or_else(|| std::env::var("MYTHOS_DATA_PATH").ok().map(PathBuf::from))
            .or_else(|| {
                let local_path = Path::new(".mythos");
                if local_path.exists() && local_path.is_dir() {
                    Some(local_path.to_path_buf())
                } else {
                    None
                }
            })
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".mythos"))
                    .unwrap_or_else(|| PathBuf::from(".mythos"))
            });

        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path);
        let enrichment = create_enrichment_port(&config.enrichment, config.enrichment_timeout(), |name| {
            std::env::var(name).ok()
        });

        let mut ctx = Self::assemble(config, enrichment);
        ctx.data_path = Some(data_path.clone());

        let world = WorldFile::in_data_path(&data_path).load()?;
        let (event_count, arc_count) = (world.events.len(), world.arcs.len());
        world
            .restore_into(ctx.events.as_ref(), ctx.arcs.as_ref())
            .await?;
        tracing::info!("World loaded ({} events, {} arcs)", event_count, arc_count);

        Ok(ctx)
    }

    /// In-memory context with an explicit enrichment port and budget.
    pub fn in_memory(enrichment: Arc<dyn EnrichmentPort>, timeout: Duration) -> Self {
        let config = MythosConfig {
            enrichment_timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ..MythosConfig::default()
        };
        Self::assemble(config, enrichment)
    }

    fn assemble(config: MythosConfig, enrichment: Arc<dyn EnrichmentPort>) -> Self {
        let timeout = config.enrichment_timeout();
        let events: Arc<dyn EventRepository> = Arc::new(InMemoryEventRepository::new());
        let arcs: Arc<dyn ArcRepository> = Arc::new(InMemoryArcRepository::new());

        let ingest_service = IngestService::new(events.clone(), enrichment.clone(), timeout);
        let arc_constructor = ArcConstructor::new(enrichment.clone(), arcs.clone(), timeout);

        Self {
            data_path: None,
            config,
            events,
            arcs,
            enrichment,
            ingest_service,
            arc_constructor,
        }
    }

    /// Write the world back to `{data_path}/world.json`. No-op in memory.
    pub async fn persist(&self) -> Result<()> {
        let Some(data_path) = &self.data_path else {
            return Ok(());
        };
        let state = WorldState::capture(self.events.as_ref(), self.arcs.as_ref()).await?;
        WorldFile::in_data_path(data_path).save(&state)?;
        tracing::debug!("World saved to {}", data_path.display());
        Ok(())
    }
}
