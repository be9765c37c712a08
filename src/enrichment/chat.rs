//! Enrichment over an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enrichment::payload::{parse_arc_suggestion, parse_event_enrichment};
use crate::enrichment::prompts::{
    arc_suggestion_prompt, event_enrichment_prompt, ARC_SYSTEM_PROMPT, EVENT_SYSTEM_PROMPT,
};
use crate::enrichment::{ArcSuggestion, EnrichmentPort, EnrichmentResult, EnrichmentUnavailable};
use crate::models::{EventContent, SymbolicEvent};
use crate::MythosError;

const EVENT_MAX_TOKENS: u32 = 512;
const ARC_MAX_TOKENS: u32 = 1024;

/// Connection settings for [`ChatCompletionEnrichment`].
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Base URL, e.g. `https://api.groq.com/openai/v1`
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub event_temperature: f32,
    pub arc_temperature: f32,
    /// Hard ceiling for one HTTP exchange. The engine's own budget is
    /// applied on top of this.
    pub request_timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Map a non-success HTTP status to an unavailability reason.
fn classify_status(status: StatusCode) -> EnrichmentUnavailable {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        EnrichmentUnavailable::Unauthorized
    } else {
        EnrichmentUnavailable::Api {
            status: status.as_u16(),
        }
    }
}

/// Chat-completion enrichment adapter.
pub struct ChatCompletionEnrichment {
    client: reqwest::Client,
    settings: ChatSettings,
}

impl ChatCompletionEnrichment {
    pub fn new(settings: ChatSettings) -> Result<Self, MythosError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MythosError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, EnrichmentUnavailable> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.settings.endpoint.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichmentUnavailable::Timeout(self.settings.request_timeout)
                } else {
                    EnrichmentUnavailable::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(classify_status(response.status()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentUnavailable::Malformed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| EnrichmentUnavailable::Malformed("empty completion".into()))
    }
}

#[async_trait]
impl EnrichmentPort for ChatCompletionEnrichment {
    async fn enrich_event(
        &self,
        content: &EventContent,
    ) -> Result<EnrichmentResult, EnrichmentUnavailable> {
        let prompt = event_enrichment_prompt(content);
        let reply = self
            .complete(
                EVENT_SYSTEM_PROMPT,
                &prompt,
                self.settings.event_temperature,
                EVENT_MAX_TOKENS,
            )
            .await?;
        debug!(model = %self.settings.model, "event enrichment reply received");
        parse_event_enrichment(&reply)
    }

    async fn suggest_arc(
        &self,
        seed_id: &str,
        candidates: &[SymbolicEvent],
        depth: usize,
    ) -> Result<ArcSuggestion, EnrichmentUnavailable> {
        let prompt = arc_suggestion_prompt(seed_id, candidates, depth);
        let reply = self
            .complete(
                ARC_SYSTEM_PROMPT,
                &prompt,
                self.settings.arc_temperature,
                ARC_MAX_TOKENS,
            )
            .await?;
        debug!(model = %self.settings.model, "arc suggestion reply received");
        parse_arc_suggestion(&reply)
    }

    fn is_available(&self) -> bool {
        !self.settings.api_key.is_empty()
    }
}
