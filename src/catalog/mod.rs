//! Read-only in-memory profile catalog.
//!
//! Loaded once from a JSON file of the form:
//!
//! ```json
//! {
//!   "profiles": [
//!     { "id": 1, "name": "Ada", "skills": ["Python"], "embedding": [0.1, 0.2] }
//!   ]
//! }
//! ```
//!
//! The catalog serves all three retrieval contracts: [`ProfileStore`],
//! [`VectorIndex`] (exact L2 nearest neighbours) and [`LexicalIndex`]
//! (see [`lexical`]). It never changes after loading, so one instance is
//! shared by every concurrent search.

pub mod lexical;

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skillsense_search::{
    Candidate, CandidateId, LexicalIndex, ProfileStore, ServiceError, VectorIndex,
};

use crate::error::{Result, SkillSenseError};
use lexical::TermIndex;

/// One profile as stored in the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Precomputed profile embedding. Profiles without one are invisible
    /// to semantic retrieval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    profiles: Vec<CatalogEntry>,
}

#[derive(Debug)]
pub struct ProfileCatalog {
    profiles: BTreeMap<CandidateId, Candidate>,
    embeddings: BTreeMap<CandidateId, Vec<f32>>,
    dimension: Option<usize>,
    terms: TermIndex,
}

impl ProfileCatalog {
    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid catalog
    /// JSON, or fails the checks in [`ProfileCatalog::from_entries`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            SkillSenseError::Catalog(format!("{} is not a valid catalog: {e}", path.display()))
        })?;
        let catalog = Self::from_entries(file.profiles)?;
        tracing::info!(
            path = %path.display(),
            profiles = catalog.len(),
            embedded = catalog.embeddings.len(),
            "profile catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from entries.
    ///
    /// # Errors
    ///
    /// Returns [`SkillSenseError::Catalog`] on a duplicate id, an empty
    /// embedding, or embeddings of differing dimension.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut catalog = Self {
            profiles: BTreeMap::new(),
            embeddings: BTreeMap::new(),
            dimension: None,
            terms: TermIndex::default(),
        };

        for CatalogEntry {
            candidate,
            embedding,
        } in entries
        {
            let id = candidate.id;
            if catalog.profiles.contains_key(&id) {
                return Err(SkillSenseError::Catalog(format!("duplicate profile id {id}")));
            }
            if let Some(embedding) = embedding {
                catalog.check_dimension(id, embedding.len())?;
                catalog.embeddings.insert(id, embedding);
            }
            catalog.terms.insert(&candidate);
            catalog.profiles.insert(id, candidate);
        }
        Ok(catalog)
    }

    fn check_dimension(&mut self, id: CandidateId, len: usize) -> Result<()> {
        if len == 0 {
            return Err(SkillSenseError::Catalog(format!(
                "profile {id} has an empty embedding"
            )));
        }
        match self.dimension {
            None => {
                self.dimension = Some(len);
                Ok(())
            }
            Some(dim) if dim == len => Ok(()),
            Some(dim) => Err(SkillSenseError::Catalog(format!(
                "profile {id} embedding has {len} dimensions, expected {dim}"
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Embedding dimension shared by every embedded profile.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[async_trait]
impl ProfileStore for ProfileCatalog {
    async fn get(&self, id: CandidateId) -> std::result::Result<Option<Candidate>, ServiceError> {
        Ok(self.profiles.get(&id).cloned())
    }
}

#[async_trait]
impl VectorIndex for ProfileCatalog {
    async fn nearest(
        &self,
        embedding: &[f32],
        limit: usize,
    ) -> std::result::Result<Vec<CandidateId>, ServiceError> {
        let Some(dim) = self.dimension else {
            return Ok(Vec::new());
        };
        if embedding.len() != dim {
            return Err(ServiceError::Malformed(format!(
                "query embedding has {} dimensions, catalog has {dim}",
                embedding.len()
            )));
        }

        let mut scored: Vec<(f32, CandidateId)> = self
            .embeddings
            .iter()
            .map(|(id, e)| (l2_distance(embedding, e), *id))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Ok(scored.into_iter().take(limit).map(|(_, id)| id).collect())
    }
}

#[async_trait]
impl LexicalIndex for ProfileCatalog {
    async fn search(
        &self,
        terms: &str,
        limit: usize,
    ) -> std::result::Result<Vec<CandidateId>, ServiceError> {
        Ok(self.terms.search(terms, limit))
    }
}
