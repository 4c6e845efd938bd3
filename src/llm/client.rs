//! Minimal OpenAI-compatible HTTP client.
//!
//! Only the two non-streaming endpoints the oracles need are covered:
//!
//! - **Chat Completions** (`/v1/chat/completions`), either as plain text or
//!   in JSON mode (`response_format: {"type": "json_object"}`)
//! - **Embeddings** (`/v1/embeddings`)

use std::time::Duration;

use serde::Deserialize;

use super::LlmError;

/// Deserialized chat completion response (the parts we read).
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// One chat completion request.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub temperature: f64,
    pub system: &'a str,
    pub user: &'a str,
}

/// Shared HTTP client for every oracle.
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    organization: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("organization", &self.organization)
            .finish()
    }
}

impl OpenAiClient {
    /// Create a client for `base_url` (without the `/v1` suffix).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Request`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        organization: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Request(format!("failed to build HTTP client: {e}")))?;
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_owned();
        Ok(Self {
            base_url,
            api_key,
            organization,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion and return the trimmed assistant text.
    pub async fn chat_text(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        let body = chat_body(&request, false);
        self.chat(&body, request.model).await
    }

    /// Run a chat completion in JSON mode and parse the assistant reply.
    ///
    /// Replies wrapped in Markdown code fences are unwrapped first.
    pub async fn chat_json(&self, request: ChatRequest<'_>) -> Result<serde_json::Value, LlmError> {
        let body = chat_body(&request, true);
        let content = self.chat(&body, request.model).await?;
        serde_json::from_str(strip_code_fences(&content)).map_err(|e| {
            LlmError::Parse(format!("{} returned invalid JSON: {e}", request.model))
        })
    }

    /// Embed `input` with `model`.
    pub async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, LlmError> {
        let body = serde_json::json!({
            "model": model,
            "input": input,
        });
        let response: EmbeddingResponse = self.post("/v1/embeddings", &body).await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::Parse(format!("{model} returned no embedding")))?;
        if embedding.is_empty() {
            return Err(LlmError::Parse(format!("{model} returned an empty embedding")));
        }
        Ok(embedding)
    }

    async fn chat(&self, body: &serde_json::Value, model: &str) -> Result<String, LlmError> {
        tracing::debug!(model, "chat completion request");
        let completion: ChatCompletion = self.post("/v1/chat/completions", body).await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse(format!("{model} returned no message content")))?;
        let content = content.trim();
        if content.is_empty() {
            return Err(LlmError::Parse(format!("{model} returned empty content")));
        }
        Ok(content.to_owned())
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, LlmError> {
        let url = format!("{}{endpoint}", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(format!("{endpoint}: {e}"))
            } else {
                LlmError::Request(format!("{endpoint}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LlmError::Parse(format!("{endpoint}: {e}")))
    }
}

fn chat_body(request: &ChatRequest<'_>, json_mode: bool) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": request.model,
        "temperature": request.temperature,
        "messages": [
            { "role": "system", "content": request.system },
            { "role": "user", "content": request.user },
        ],
    });
    if json_mode {
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                "response_format".into(),
                serde_json::json!({ "type": "json_object" }),
            );
        }
    }
    body
}

/// Map an HTTP error status to the appropriate [`LlmError`].
fn map_http_error(status: reqwest::StatusCode, body: &str) -> LlmError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 => LlmError::Auth(message),
        429 => LlmError::RateLimited(message),
        code => LlmError::Provider(format!("HTTP {code}: {message}")),
    }
}

/// Extract an error message from an OpenAI error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Strip a surrounding Markdown code fence (with optional language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}
