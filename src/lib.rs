//! SkillSense: hybrid AI-assisted candidate search.
//!
//! This crate hosts the [`skillsense_search`] pipeline: it wires the
//! pipeline's collaborator traits to an OpenAI-compatible provider
//! ([`llm`]) and an in-memory profile catalog ([`catalog`]), loads
//! configuration ([`config`]), and ships the `skillsense` command-line
//! binary.

pub mod catalog;
pub mod config;
pub mod error;
pub mod llm;

use std::sync::Arc;

pub use catalog::ProfileCatalog;
pub use config::SkillSenseConfig;
pub use error::{Result, SkillSenseError};
pub use skillsense_search::{SearchOrchestrator, SearchResult, SearchServices};

use llm::{
    LlmIntentOracle, LlmJudgmentOracle, LlmNarrativeOracle, OpenAiClient, OpenAiEmbedder,
};

/// Shortest query, in characters, accepted from users.
pub const MIN_QUERY_CHARS: usize = 3;

/// Reject queries shorter than [`MIN_QUERY_CHARS`] once trimmed.
///
/// # Errors
///
/// Returns [`SkillSenseError::Search`] wrapping
/// [`skillsense_search::SearchError::InvalidQuery`].
pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Err(skillsense_search::SearchError::InvalidQuery(format!(
            "query must be at least {MIN_QUERY_CHARS} characters"
        ))
        .into());
    }
    Ok(())
}

/// Build the collaborator set for `config`, backed by `catalog`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the API key cannot be
/// resolved, or the HTTP client cannot be built.
pub fn build_services(
    config: &SkillSenseConfig,
    catalog: Arc<ProfileCatalog>,
) -> Result<SearchServices> {
    config.validate()?;
    let api_key = config.llm.api_key.resolve()?;
    let client = Arc::new(OpenAiClient::new(
        config.llm.base_url.clone(),
        api_key,
        config.llm.organization.clone(),
        config.search.timeout(),
    )?);

    Ok(SearchServices {
        intent: Arc::new(LlmIntentOracle::new(client.clone(), config.llm.intent.clone())),
        embedder: Arc::new(OpenAiEmbedder::new(
            client.clone(),
            config.llm.embedding_model.clone(),
        )),
        vector_index: catalog.clone(),
        lexical_index: catalog.clone(),
        profiles: catalog,
        judge: Arc::new(LlmJudgmentOracle::new(client.clone(), config.llm.judgment.clone())),
        narrator: Arc::new(LlmNarrativeOracle::new(client, config.llm.narrative.clone())),
    })
}

/// Build a ready-to-use orchestrator for `config`, backed by `catalog`.
///
/// # Errors
///
/// Same as [`build_services`], plus [`SkillSenseError::Search`] if the
/// search section is rejected by the pipeline.
pub fn build_orchestrator(
    config: &SkillSenseConfig,
    catalog: Arc<ProfileCatalog>,
) -> Result<SearchOrchestrator> {
    let services = build_services(config, catalog)?;
    Ok(SearchOrchestrator::new(config.search.clone(), services)?)
}
