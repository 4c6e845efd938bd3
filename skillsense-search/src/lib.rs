//! # skillsense-search
//!
//! Hybrid candidate retrieval and ranking for recruiter queries.
//!
//! A free-text query such as "Senior Python developer with Django, 5+ years"
//! is decomposed into structured intent, answered by a semantic source and
//! a lexical source concurrently, fused by reciprocal rank, narrowed by a
//! hard skill filter, and judged one candidate at a time by an AI oracle.
//! The caller receives one page of scored candidates plus a short narrative
//! over the global top matches.
//!
//! ## Design
//!
//! - Every external service (oracles, indexes, profile store) sits behind a
//!   trait in [`oracle`] or [`retrieval`] and is injected via
//!   [`SearchServices`]
//! - Retrieval degrades gracefully: if one source fails the other still
//!   answers
//! - Intent extraction never fails; it falls back to the raw query
//! - Ranking is deterministic for fixed collaborator answers
//! - Nothing is spawned, so dropping a search future cancels all its work
//!
//! ## Security
//!
//! - Query text is logged only at trace level
//! - No network listeners; this is a library

pub mod config;
pub mod error;
pub mod oracle;
pub mod orchestrator;
pub mod retrieval;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError, ServiceError};
pub use oracle::{
    Embedder, IntentOracle, IntentPayload, JudgmentOracle, JudgmentPayload, NarrativeOracle,
};
pub use orchestrator::search::{SearchOrchestrator, SearchServices};
pub use retrieval::{LexicalIndex, ProfileStore, VectorIndex};
pub use types::{
    Candidate, CandidateId, Certification, Education, Language, Project, QueryIntent,
    ScoredCandidate, SearchResult, SkillSet, WorkExperience,
};

/// Run one search with a freshly built orchestrator.
///
/// Convenience wrapper for one-shot callers. Long-lived callers should
/// build a [`SearchOrchestrator`] once and share it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, otherwise the
/// same errors as [`SearchOrchestrator::search`].
///
/// # Examples
///
/// ```no_run
/// # use skillsense_search::SearchServices;
/// # async fn example(services: SearchServices) -> skillsense_search::Result<()> {
/// let config = skillsense_search::SearchConfig::default();
/// let result = skillsense_search::search(
///     "Senior Python developer with Django",
///     0,
///     10,
///     config,
///     services,
/// )
/// .await?;
/// for item in &result.items {
///     println!("{} {:.0}", item.candidate.display_name(), item.match_score);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    skip: usize,
    limit: usize,
    config: SearchConfig,
    services: SearchServices,
) -> Result<SearchResult> {
    SearchOrchestrator::new(config, services)?
        .search(query, skip, limit)
        .await
}
