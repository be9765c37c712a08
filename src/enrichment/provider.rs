//! Enrichment provider configuration and factory.
//!
//! Supports the chat-completion adapter (Groq by default) or no enrichment
//! at all. A provider that cannot be set up degrades to `NoopEnrichment`
//! instead of failing startup.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::enrichment::{ChatCompletionEnrichment, ChatSettings, EnrichmentPort, NoopEnrichment};

/// Enrichment provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EnrichmentProviderConfig {
    /// Never call out; every request takes the fallback path.
    Disabled,
    /// OpenAI-compatible chat completions.
    ChatCompletion {
        #[serde(default = "default_endpoint")]
        endpoint: String,
        #[serde(default = "default_model")]
        model: String,
        /// Name of the environment variable holding the API key
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_event_temperature")]
        event_temperature: f32,
        #[serde(default = "default_arc_temperature")]
        arc_temperature: f32,
    },
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_event_temperature() -> f32 {
    0.7
}

fn default_arc_temperature() -> f32 {
    0.8
}

impl Default for EnrichmentProviderConfig {
    fn default() -> Self {
        Self::ChatCompletion {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            event_temperature: default_event_temperature(),
            arc_temperature: default_arc_temperature(),
        }
    }
}

/// Create an enrichment port from provider configuration.
///
/// `timeout` is the engine's per-call budget; the HTTP client is given the
/// same ceiling so sockets do not outlive an abandoned call.
pub fn create_enrichment_port(
    config: &EnrichmentProviderConfig,
    timeout: Duration,
    env: impl Fn(&str) -> Option<String>,
) -> Arc<dyn EnrichmentPort> {
    match config {
        EnrichmentProviderConfig::Disabled => {
            info!("Enrichment disabled by configuration");
            Arc::new(NoopEnrichment::new())
        }
        EnrichmentProviderConfig::ChatCompletion {
            endpoint,
            model,
            api_key_env,
            event_temperature,
            arc_temperature,
        } => {
            let Some(api_key) = env(api_key_env).filter(|k| !k.trim().is_empty()) else {
                warn!(
                    "{} not set. Enrichment will be unavailable; using deterministic fallbacks.",
                    api_key_env
                );
                return Arc::new(NoopEnrichment::new());
            };

            let settings = ChatSettings {
                endpoint: endpoint.clone(),
                api_key,
                model: model.clone(),
                event_temperature: *event_temperature,
                arc_temperature: *arc_temperature,
                request_timeout: timeout,
            };

            match ChatCompletionEnrichment::new(settings) {
                Ok(port) => {
                    info!("Enrichment via {} ({})", endpoint, port.model());
                    Arc::new(port)
                }
                Err(e) => {
                    warn!("{}. Enrichment will be unavailable.", e);
                    Arc::new(NoopEnrichment::new())
                }
            }
        }
    }
}
