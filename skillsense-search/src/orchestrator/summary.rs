//! Narrative summary over the best matches.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ServiceError;
use crate::oracle::NarrativeOracle;
use crate::types::ScoredCandidate;

/// How many top-scored candidates the narrative covers.
pub const SUMMARY_TOP_N: usize = 3;

/// Summary returned when no candidate survives scoring.
pub const NO_QUALIFYING_CANDIDATES: &str =
    "No candidates met the search criteria after detailed analysis.";

/// Writes the recruiter-facing summary.
pub struct SummaryComposer {
    oracle: Arc<dyn NarrativeOracle>,
    timeout: Duration,
}

impl SummaryComposer {
    pub fn new(oracle: Arc<dyn NarrativeOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// Compose a summary of `top`, which must already be sorted by score.
    ///
    /// Only the first [`SUMMARY_TOP_N`] entries are passed on. An empty
    /// slice yields [`NO_QUALIFYING_CANDIDATES`] without calling the oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the narrative oracle fails or times out.
    pub async fn compose(
        &self,
        query: &str,
        top: &[ScoredCandidate],
    ) -> Result<String, ServiceError> {
        if top.is_empty() {
            return Ok(NO_QUALIFYING_CANDIDATES.to_owned());
        }
        let top = &top[..top.len().min(SUMMARY_TOP_N)];

        let summary = tokio::time::timeout(self.timeout, self.oracle.narrate(query, top))
            .await
            .map_err(|_| {
                ServiceError::Timeout(format!(
                    "narrative oracle exceeded {}s",
                    self.timeout.as_secs()
                ))
            })??;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ServiceError::Malformed(
                "narrative oracle returned an empty summary".into(),
            ));
        }
        Ok(summary.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candidate;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNarrator {
        seen: Mutex<Vec<Vec<u64>>>,
        reply: String,
    }

    #[async_trait]
    impl NarrativeOracle for RecordingNarrator {
        async fn narrate(
            &self,
            _query: &str,
            top: &[ScoredCandidate],
        ) -> Result<String, ServiceError> {
            self.seen
                .lock()
                .expect("lock")
                .push(top.iter().map(|s| s.candidate.id.0).collect());
            Ok(self.reply.clone())
        }
    }

    fn scored(id: u64, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: Candidate::new(id),
            match_score: score,
            reasoning: "fits".into(),
        }
    }

    fn narrator(reply: &str) -> Arc<RecordingNarrator> {
        Arc::new(RecordingNarrator {
            reply: reply.into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn empty_input_returns_canned_message_without_oracle_call() {
        let oracle = narrator("unused");
        let composer = SummaryComposer::new(oracle.clone(), Duration::from_secs(5));
        let summary = composer.compose("q", &[]).await.expect("compose");
        assert_eq!(summary, NO_QUALIFYING_CANDIDATES);
        assert!(oracle.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn only_top_three_reach_the_oracle() {
        let oracle = narrator("  Three strong matches.  ");
        let composer = SummaryComposer::new(oracle.clone(), Duration::from_secs(5));
        let top = vec![scored(4, 90.0), scored(2, 80.0), scored(9, 70.0), scored(1, 60.0)];
        let summary = composer.compose("q", &top).await.expect("compose");
        assert_eq!(summary, "Three strong matches.");
        let seen = oracle.seen.lock().expect("lock").clone();
        assert_eq!(seen, vec![vec![4u64, 2, 9]]);
    }

    #[tokio::test]
    async fn blank_narrative_is_malformed() {
        let composer = SummaryComposer::new(narrator("   "), Duration::from_secs(5));
        let result = composer.compose("q", &[scored(1, 50.0)]).await;
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }
}
