//! Engine configuration.
//!
//! Loaded with priority:
//! 1. `{data_path}/mythos.toml`
//! 2. `MYTHOS_ENRICHMENT_PROVIDER` (JSON) and `MYTHOS_ENRICHMENT_TIMEOUT_MS`
//!    env vars, which override the file
//! 3. Defaults

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::enrichment::EnrichmentProviderConfig;

const DEFAULT_ENRICHMENT_TIMEOUT_MS: u64 = 8_000;

fn default_enrichment_timeout_ms() -> u64 {
    DEFAULT_ENRICHMENT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MythosConfig {
    /// Budget for one enrichment call, in milliseconds
    #[serde(default = "default_enrichment_timeout_ms")]
    pub enrichment_timeout_ms: u64,
    #[serde(default)]
    pub enrichment: EnrichmentProviderConfig,
}

impl Default for MythosConfig {
    fn default() -> Self {
        Self {
            enrichment_timeout_ms: DEFAULT_ENRICHMENT_TIMEOUT_MS,
            enrichment: EnrichmentProviderConfig::default(),
        }
    }
}

impl MythosConfig {
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

/// Load configuration from the data directory and the process environment.
pub fn load_config(data_path: &Path) -> MythosConfig {
    load_config_with(data_path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with(data_path: &Path, env: impl Fn(&str) -> Option<String>) -> MythosConfig {
    let mut config = MythosConfig::default();

    let config_path = data_path.join("mythos.toml");
    if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<MythosConfig>(&contents) {
                Ok(parsed) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    config = parsed;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
            }
        }
    }

    if let Some(json) = env("MYTHOS_ENRICHMENT_PROVIDER") {
        match serde_json::from_str::<EnrichmentProviderConfig>(&json) {
            Ok(provider) => {
                tracing::info!("Loaded enrichment provider from MYTHOS_ENRICHMENT_PROVIDER env");
                config.enrichment = provider;
            }
            Err(e) => {
                tracing::warn!("Failed to parse MYTHOS_ENRICHMENT_PROVIDER: {}. Ignoring.", e);
            }
        }
    }

    if let Some(raw) = env("MYTHOS_ENRICHMENT_TIMEOUT_MS") {
        match raw.trim().parse::<u64>() {
            Ok(ms) => config.enrichment_timeout_ms = ms,
            Err(e) => {
                tracing::warn!("Invalid MYTHOS_ENRICHMENT_TIMEOUT_MS '{}': {}", raw, e);
            }
        }
    }

    if config.enrichment_timeout_ms == 0 {
        tracing::warn!(
            "enrichment_timeout_ms must be positive, using {}",
            DEFAULT_ENRICHMENT_TIMEOUT_MS
        );
        config.enrichment_timeout_ms = DEFAULT_ENRICHMENT_TIMEOUT_MS;
    }

    config
}
