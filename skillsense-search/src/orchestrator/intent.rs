//! Query intent extraction with local fallback.
//!
//! The intent oracle is asked to decompose the query. Any failure
//! (transport error, timeout, or a payload that fails validation) is
//! recovered here: downstream stages receive [`QueryIntent::fallback`],
//! which searches on the raw query with no skill constraints.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ServiceError;
use crate::oracle::IntentOracle;
use crate::types::QueryIntent;

/// Turns raw query text into a [`QueryIntent`].
pub struct QueryIntentExtractor {
    oracle: Arc<dyn IntentOracle>,
    timeout: Duration,
}

impl QueryIntentExtractor {
    pub fn new(oracle: Arc<dyn IntentOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Extract intent from `raw`. Never fails.
    pub async fn extract(&self, raw: &str) -> QueryIntent {
        match self.try_extract(raw).await {
            Ok(intent) => {
                tracing::debug!(
                    required = intent.required_skills.len(),
                    optional = intent.optional_skills.len(),
                    min_experience_years = ?intent.min_experience_years,
                    "query intent extracted"
                );
                intent
            }
            Err(err) => {
                tracing::warn!(error = %err, "intent extraction degraded, searching on raw query");
                QueryIntent::fallback(raw)
            }
        }
    }

    async fn try_extract(&self, raw: &str) -> Result<QueryIntent, ServiceError> {
        tracing::trace!(query = raw, "requesting query intent");
        let payload = tokio::time::timeout(self.timeout, self.oracle.infer_intent(raw))
            .await
            .map_err(|_| {
                ServiceError::Timeout(format!(
                    "intent oracle exceeded {}s",
                    self.timeout.as_secs()
                ))
            })??;
        payload.validate()
    }
}
