//! Hydration and hard filtering of the fused ranking.
//!
//! Every fused id is looked up in the profile store. Ids the store no
//! longer knows are dropped silently, then candidates lacking any required
//! skill are discarded. Fused order is preserved throughout.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;

use crate::error::ServiceError;
use crate::retrieval::ProfileStore;
use crate::types::{Candidate, FusedCandidate, QueryIntent};

/// Narrows the fused ranking to hydrated candidates holding every
/// required skill.
pub struct HardFilter {
    store: Arc<dyn ProfileStore>,
    timeout: Duration,
}

impl HardFilter {
    pub fn new(store: Arc<dyn ProfileStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Hydrate and filter `fused`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the profile store fails or times out for
    /// any id. A missing profile is not an error.
    pub async fn filter(
        &self,
        fused: &[FusedCandidate],
        intent: &QueryIntent,
    ) -> Result<Vec<Candidate>, ServiceError> {
        let hydrated = try_join_all(fused.iter().map(|fc| self.hydrate(fc))).await?;

        let total = hydrated.len();
        let present: Vec<Candidate> = hydrated.into_iter().flatten().collect();
        let missing = total - present.len();
        if missing > 0 {
            tracing::debug!(missing, "dropped fused ids absent from the profile store");
        }

        let kept: Vec<Candidate> = present
            .into_iter()
            .filter(|candidate| satisfies_required(candidate, intent))
            .collect();

        tracing::debug!(fused = total, kept = kept.len(), "hard filter applied");
        Ok(kept)
    }

    async fn hydrate(&self, fused: &FusedCandidate) -> Result<Option<Candidate>, ServiceError> {
        tokio::time::timeout(self.timeout, self.store.get(fused.id))
            .await
            .map_err(|_| {
                ServiceError::Timeout(format!(
                    "profile store exceeded {}s for candidate {}",
                    self.timeout.as_secs(),
                    fused.id
                ))
            })?
    }
}

/// Whether `candidate` holds every skill in `intent.required_skills`.
pub fn satisfies_required(candidate: &Candidate, intent: &QueryIntent) -> bool {
    intent
        .required_skills
        .iter()
        .all(|skill| candidate.has_skill(skill))
}
