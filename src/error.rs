//! Error types for the skillsense host.

use crate::llm::LlmError;

/// Top-level error type for the skillsense host.
#[derive(Debug, thiserror::Error)]
pub enum SkillSenseError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Language model provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Profile catalog loading or lookup error.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Candidate search error.
    #[error("search error: {0}")]
    Search(#[from] skillsense_search::SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SkillSenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_convert_and_display() {
        let err: SkillSenseError = skillsense_search::SearchError::RetrievalUnavailable.into();
        assert_eq!(err.to_string(), "search error: candidate retrieval unavailable");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SkillSenseError = io.into();
        assert!(matches!(err, SkillSenseError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
