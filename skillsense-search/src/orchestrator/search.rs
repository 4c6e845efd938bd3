//! Core search orchestrator: intent, concurrent retrieval, fusion, filter,
//! judgment, pagination, summary.
//!
//! The orchestrator is the only component that knows the end-to-end
//! contract. Stage-local failures that have a defined fallback are handled
//! by the stage; everything else is logged here and surfaced as a single
//! opaque [`SearchError`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::config::{SearchConfig, MAX_PAGE_SIZE};
use crate::error::{SearchError, ServiceError};
use crate::oracle::{Embedder, IntentOracle, JudgmentOracle, NarrativeOracle};
use crate::retrieval::{
    LexicalIndex, LexicalRetriever, ProfileStore, Retriever, SemanticRetriever, VectorIndex,
};
use crate::types::{CandidateRef, FusedCandidate, QueryIntent, SearchResult};

use super::filter::HardFilter;
use super::fusion::fuse;
use super::intent::QueryIntentExtractor;
use super::relevance::RelevanceScorer;
use super::summary::{SummaryComposer, SUMMARY_TOP_N};

/// Summary returned when no candidate survives retrieval and hard filtering.
pub const NO_MATCHING_CANDIDATES: &str = "No candidates matched the basic search criteria.";

/// Collaborator handles injected into the orchestrator.
///
/// Every handle is shared read-only by all concurrent searches.
#[derive(Clone)]
pub struct SearchServices {
    pub intent: Arc<dyn IntentOracle>,
    pub embedder: Arc<dyn Embedder>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub lexical_index: Arc<dyn LexicalIndex>,
    pub profiles: Arc<dyn ProfileStore>,
    pub judge: Arc<dyn JudgmentOracle>,
    pub narrator: Arc<dyn NarrativeOracle>,
}

/// Runs the full candidate search pipeline.
pub struct SearchOrchestrator {
    config: SearchConfig,
    extractor: QueryIntentExtractor,
    retrievers: Vec<Box<dyn Retriever>>,
    filter: HardFilter,
    scorer: RelevanceScorer,
    composer: SummaryComposer,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("config", &self.config)
            .field(
                "retrievers",
                &self.retrievers.iter().map(|r| r.source()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    /// Build an orchestrator with the semantic and lexical retrievers.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(config: SearchConfig, services: SearchServices) -> Result<Self, SearchError> {
        config.validate()?;
        let timeout = config.timeout();

        let retrievers: Vec<Box<dyn Retriever>> = vec![
            Box::new(SemanticRetriever::new(
                services.embedder,
                services.vector_index,
                config.retrieval_limit,
            )),
            Box::new(LexicalRetriever::new(
                services.lexical_index,
                config.retrieval_limit,
            )),
        ];

        Ok(Self {
            extractor: QueryIntentExtractor::new(services.intent, timeout),
            retrievers,
            filter: HardFilter::new(services.profiles, timeout),
            scorer: RelevanceScorer::new(services.judge, timeout, config.max_concurrent_judgments),
            composer: SummaryComposer::new(services.narrator, timeout),
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for candidates matching `query` and return one page.
    ///
    /// # Pipeline
    ///
    /// 1. Extract intent (falls back to the raw query on any failure)
    /// 2. Query every applicable retriever concurrently, then join
    /// 3. Fuse rankings with reciprocal-rank fusion
    /// 4. Hydrate and hard-filter on required skills, keeping fused order
    /// 5. Judge every survivor concurrently, then join, threshold and sort
    /// 6. Slice the requested page
    /// 7. Summarise the global top three
    ///
    /// Dropping the returned future abandons every in-flight sub-task; no
    /// work is spawned that could outlive the call.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidQuery`] for blank `query`
    /// - [`SearchError::InvalidPage`] unless `1 <= limit <= 50`
    /// - [`SearchError::RetrievalUnavailable`] if every applicable retriever
    ///   fails
    /// - [`SearchError::PipelineFailure`] for any other stage failure
    pub async fn search(
        &self,
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<SearchResult, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query must not be blank".into()));
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(SearchError::InvalidPage(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        match AssertUnwindSafe(self.run(query, skip, limit))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("search pipeline panicked");
                Err(SearchError::PipelineFailure)
            }
        }
    }

    async fn run(
        &self,
        query: &str,
        skip: usize,
        limit: usize,
    ) -> Result<SearchResult, SearchError> {
        tracing::trace!(query, skip, limit, "search started");
        let page = skip / limit + 1;

        let intent = self.extractor.extract(query).await;

        let fused = self.retrieve(&intent).await?;
        tracing::debug!(fused = fused.len(), "retrieval fused");

        let candidates = self
            .filter
            .filter(&fused, &intent)
            .await
            .map_err(|err| pipeline_failure("hard filter", &err))?;

        if candidates.is_empty() {
            return Ok(SearchResult {
                summary: NO_MATCHING_CANDIDATES.to_owned(),
                total: 0,
                page,
                page_size: limit,
                items: Vec::new(),
            });
        }

        let scored = self.scorer.score(query, candidates).await;
        let total = scored.len();

        let top = &scored[..total.min(SUMMARY_TOP_N)];
        let summary = self
            .composer
            .compose(query, top)
            .await
            .map_err(|err| pipeline_failure("summary", &err))?;

        let items = scored.into_iter().skip(skip).take(limit).collect();

        Ok(SearchResult {
            summary,
            total,
            page,
            page_size: limit,
            items,
        })
    }

    /// Fan out to every applicable retriever and fuse what comes back.
    ///
    /// A failing source contributes an empty list. Only when every
    /// applicable source fails is the search aborted.
    async fn retrieve(&self, intent: &QueryIntent) -> Result<Vec<FusedCandidate>, SearchError> {
        let timeout = self.config.timeout();

        let futures: Vec<_> = self
            .retrievers
            .iter()
            .filter(|retriever| {
                let applies = retriever.applies_to(intent);
                if !applies {
                    tracing::debug!(source = %retriever.source(), "retrieval source skipped");
                }
                applies
            })
            .map(|retriever| async move {
                let source = retriever.source();
                let outcome =
                    match tokio::time::timeout(timeout, retriever.retrieve(intent)).await {
                        Ok(result) => result,
                        Err(_) => Err(ServiceError::Timeout(format!(
                            "{source} retrieval exceeded {}s",
                            timeout.as_secs()
                        ))),
                    };
                (source, outcome)
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        let mut lists: Vec<Vec<CandidateRef>> = Vec::new();
        let mut failures = 0usize;

        for (source, outcome) in outcomes {
            match outcome {
                Ok(refs) => {
                    tracing::debug!(%source, count = refs.len(), "retrieval source returned");
                    lists.push(refs);
                }
                Err(err) => {
                    tracing::warn!(%source, error = %err, "retrieval source failed");
                    failures += 1;
                }
            }
        }

        if lists.is_empty() && failures > 0 {
            tracing::error!(failures, "every retrieval source failed");
            return Err(SearchError::RetrievalUnavailable);
        }

        Ok(fuse(&lists))
    }
}

fn pipeline_failure(stage: &'static str, err: &ServiceError) -> SearchError {
    tracing::error!(stage, error = %err, "search pipeline failed");
    SearchError::PipelineFailure
}
