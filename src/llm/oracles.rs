//! Collaborator trait implementations backed by [`OpenAiClient`].

use std::sync::Arc;

use async_trait::async_trait;
use skillsense_search::{
    Embedder, IntentOracle, IntentPayload, JudgmentOracle, JudgmentPayload, NarrativeOracle,
    ScoredCandidate, ServiceError,
};

use super::client::{ChatRequest, OpenAiClient};
use super::prompts;
use crate::config::ChatModelConfig;

fn decode<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, ServiceError> {
    serde_json::from_value(value)
        .map_err(|e| ServiceError::Malformed(format!("{what} payload did not match schema: {e}")))
}

/// Query decomposition via a JSON-mode chat model.
#[derive(Debug)]
pub struct LlmIntentOracle {
    client: Arc<OpenAiClient>,
    model: ChatModelConfig,
}

impl LlmIntentOracle {
    pub fn new(client: Arc<OpenAiClient>, model: ChatModelConfig) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl IntentOracle for LlmIntentOracle {
    async fn infer_intent(&self, query: &str) -> Result<IntentPayload, ServiceError> {
        let user = prompts::intent_user(query);
        let value = self
            .client
            .chat_json(ChatRequest {
                model: &self.model.model,
                temperature: self.model.temperature,
                system: prompts::INTENT_SYSTEM,
                user: &user,
            })
            .await?;
        decode(value, "intent")
    }
}

/// Per-candidate relevance scoring via a JSON-mode chat model.
#[derive(Debug)]
pub struct LlmJudgmentOracle {
    client: Arc<OpenAiClient>,
    model: ChatModelConfig,
}

impl LlmJudgmentOracle {
    pub fn new(client: Arc<OpenAiClient>, model: ChatModelConfig) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl JudgmentOracle for LlmJudgmentOracle {
    async fn judge(&self, query: &str, context: &str) -> Result<JudgmentPayload, ServiceError> {
        let user = prompts::judgment_user(query, context);
        let value = self
            .client
            .chat_json(ChatRequest {
                model: &self.model.model,
                temperature: self.model.temperature,
                system: prompts::JUDGMENT_SYSTEM,
                user: &user,
            })
            .await?;
        decode(value, "judgment")
    }
}

/// Recruiter summary via a plain-text chat model.
#[derive(Debug)]
pub struct LlmNarrativeOracle {
    client: Arc<OpenAiClient>,
    model: ChatModelConfig,
}

impl LlmNarrativeOracle {
    pub fn new(client: Arc<OpenAiClient>, model: ChatModelConfig) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl NarrativeOracle for LlmNarrativeOracle {
    async fn narrate(&self, query: &str, top: &[ScoredCandidate]) -> Result<String, ServiceError> {
        let user = prompts::narrative_user(query, top);
        let text = self
            .client
            .chat_text(ChatRequest {
                model: &self.model.model,
                temperature: self.model.temperature,
                system: prompts::NARRATIVE_SYSTEM,
                user: &user,
            })
            .await?;
        Ok(text)
    }
}

/// Query embeddings from the provider's embeddings endpoint.
#[derive(Debug)]
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError> {
        tracing::debug!(model = %self.model, "embedding request");
        Ok(self.client.embed(&self.model, text).await?)
    }
}
