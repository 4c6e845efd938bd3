//! Retrieval sources and the index/store contracts behind them.
//!
//! Each retrieval strategy implements [`Retriever`] to provide a uniform
//! interface to the orchestrator. The two shipped adapters are
//! [`SemanticRetriever`] (embedding + vector index) and
//! [`LexicalRetriever`] (skill terms + full-text index).
//!
//! All implementations must be `Send + Sync` for concurrent retrieval.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::oracle::Embedder;
use crate::orchestrator::fusion::reciprocal_rank;
use crate::types::{Candidate, CandidateId, CandidateRef, QueryIntent, RetrievalSource};

/// Nearest-neighbour search over profile embeddings.
///
/// Returns ids ordered by ascending distance, at most `limit` of them.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn nearest(
        &self,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<CandidateId>, ServiceError>;
}

/// Full-text search over profile text.
///
/// `terms` is a space-separated term list. Returns ids ordered by
/// descending relevance, at most `limit` of them.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    async fn search(&self, terms: &str, limit: usize) -> Result<Vec<CandidateId>, ServiceError>;
}

/// Source of full candidate profiles.
///
/// `Ok(None)` means the id is unknown (for example, the profile was
/// deleted after indexing). `Err` means the store itself is unreachable.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: CandidateId) -> Result<Option<Candidate>, ServiceError>;
}

/// A pluggable retrieval strategy.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Which [`RetrievalSource`] this implementation represents.
    fn source(&self) -> RetrievalSource;

    /// Whether this source has anything to search for in `intent`.
    ///
    /// A source that does not apply is not queried and its empty result is
    /// not counted as a failure.
    fn applies_to(&self, intent: &QueryIntent) -> bool {
        let _ = intent;
        true
    }

    /// Run the retrieval, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the backing index or embedder fails.
    async fn retrieve(&self, intent: &QueryIntent) -> Result<Vec<CandidateRef>, ServiceError>;
}

/// Vector-similarity retrieval over `intent.semantic_query`.
pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    limit: usize,
}

impl SemanticRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, limit: usize) -> Self {
        Self {
            embedder,
            index,
            limit,
        }
    }
}

#[async_trait]
impl Retriever for SemanticRetriever {
    fn source(&self) -> RetrievalSource {
        RetrievalSource::Semantic
    }

    async fn retrieve(&self, intent: &QueryIntent) -> Result<Vec<CandidateRef>, ServiceError> {
        let embedding = self.embedder.embed(&intent.semantic_query).await?;
        if embedding.is_empty() {
            return Err(ServiceError::Malformed("embedder returned an empty vector".into()));
        }
        let ids = self.index.nearest(&embedding, self.limit).await?;
        Ok(rank_ids(RetrievalSource::Semantic, ids, self.limit))
    }
}

/// Full-text retrieval over the union of required and optional skills.
pub struct LexicalRetriever {
    index: Arc<dyn LexicalIndex>,
    limit: usize,
}

impl LexicalRetriever {
    pub fn new(index: Arc<dyn LexicalIndex>, limit: usize) -> Self {
        Self { index, limit }
    }

    /// The lexical query for `intent`: every skill, space-joined.
    pub fn terms(intent: &QueryIntent) -> String {
        intent.all_skills().iter().collect::<Vec<_>>().join(" ")
    }
}

#[async_trait]
impl Retriever for LexicalRetriever {
    fn source(&self) -> RetrievalSource {
        RetrievalSource::Lexical
    }

    fn applies_to(&self, intent: &QueryIntent) -> bool {
        !intent.all_skills().is_empty()
    }

    async fn retrieve(&self, intent: &QueryIntent) -> Result<Vec<CandidateRef>, ServiceError> {
        let terms = Self::terms(intent);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self.index.search(&terms, self.limit).await?;
        Ok(rank_ids(RetrievalSource::Lexical, ids, self.limit))
    }
}

/// Convert an ordered id list into ranked refs.
///
/// Repeated ids keep their first (best) position, and the list is capped at
/// `limit` in case the index ignored it.
pub fn rank_ids(source: RetrievalSource, ids: Vec<CandidateId>, limit: usize) -> Vec<CandidateRef> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .take(limit)
        .enumerate()
        .map(|(rank, id)| CandidateRef {
            id,
            source,
            rank,
            contribution: reciprocal_rank(rank),
        })
        .collect()
}
