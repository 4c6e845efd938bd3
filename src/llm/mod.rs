//! OpenAI-compatible oracles for the search pipeline.
//!
//! [`OpenAiClient`] speaks `/v1/chat/completions` and `/v1/embeddings`.
//! The types in [`oracles`] wrap it behind the collaborator traits that
//! `skillsense-search` consumes.

pub mod client;
pub mod oracles;
pub mod prompts;

pub use client::OpenAiClient;
pub use oracles::{LlmIntentOracle, LlmJudgmentOracle, LlmNarrativeOracle, OpenAiEmbedder};

use skillsense_search::ServiceError;

/// Errors from the LLM provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Credentials were rejected (HTTP 401).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider throttled the request (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded the client timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other non-success status.
    #[error("provider error: {0}")]
    Provider(String),

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(_) => ServiceError::Timeout(err.to_string()),
            LlmError::Parse(_) => ServiceError::Malformed(err.to_string()),
            LlmError::Auth(_)
            | LlmError::RateLimited(_)
            | LlmError::Request(_)
            | LlmError::Provider(_) => ServiceError::Unavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_errors_map_onto_service_errors() {
        assert!(matches!(
            ServiceError::from(LlmError::Timeout("30s".into())),
            ServiceError::Timeout(_)
        ));
        assert!(matches!(
            ServiceError::from(LlmError::Parse("not json".into())),
            ServiceError::Malformed(_)
        ));
        let err = ServiceError::from(LlmError::Auth("bad key".into()));
        assert_eq!(
            err.to_string(),
            "service unavailable: authentication failed: bad key"
        );
    }
}
