//! Error types for the skillsense-search crate.
//!
//! [`SearchError`] is what callers of the pipeline see. Its messages are
//! stable and deliberately opaque: collaborator failures are logged with
//! their cause but never leak through `Display`.
//!
//! [`ServiceError`] is what collaborators (oracles, indices, the profile
//! store) return to the pipeline.

/// Errors surfaced by [`crate::SearchOrchestrator::search`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query text was empty or whitespace only.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// `skip`/`limit` were outside the accepted range.
    #[error("invalid page: {0}")]
    InvalidPage(String),

    /// Every applicable retrieval source failed. Callers should retry later.
    #[error("candidate retrieval unavailable")]
    RetrievalUnavailable,

    /// An unexpected stage failure. The cause is logged, not returned.
    #[error("search pipeline failed")]
    PipelineFailure,

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for skillsense-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The collaborator could not be reached or rejected the request.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured timeout.
    #[error("service timed out: {0}")]
    Timeout(String),

    /// The collaborator answered, but not in the agreed schema.
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_retrieval_unavailable() {
        assert_eq!(
            SearchError::RetrievalUnavailable.to_string(),
            "candidate retrieval unavailable"
        );
    }

    #[test]
    fn display_pipeline_failure_is_opaque() {
        assert_eq!(
            SearchError::PipelineFailure.to_string(),
            "search pipeline failed"
        );
    }

    #[test]
    fn display_invalid_query() {
        let err = SearchError::InvalidQuery("query must not be blank".into());
        assert_eq!(err.to_string(), "invalid query: query must not be blank");
    }

    #[test]
    fn display_invalid_page() {
        let err = SearchError::InvalidPage("limit must be between 1 and 50".into());
        assert_eq!(err.to_string(), "invalid page: limit must be between 1 and 50");
    }

    #[test]
    fn display_service_errors() {
        assert_eq!(
            ServiceError::Unavailable("connection refused".into()).to_string(),
            "service unavailable: connection refused"
        );
        assert_eq!(
            ServiceError::Timeout("exceeded 30s".into()).to_string(),
            "service timed out: exceeded 30s"
        );
        assert_eq!(
            ServiceError::Malformed("missing score".into()).to_string(),
            "malformed response: missing score"
        );
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
        assert_send_sync::<ServiceError>();
    }
}
