//! Per-candidate relevance judgment with bounded fan-out.
//!
//! Every filtered candidate is judged independently against the original
//! query. Judgments run concurrently (optionally capped), are joined, then
//! thresholded and sorted.
//!
//! # Ordering
//!
//! Results are collected in input (fused) order regardless of which
//! judgment finishes first, and the score sort is stable, so equal scores
//! keep fused order. The final ranking therefore depends only on the
//! oracle's answers, never on their arrival order.
//!
//! # Failures
//!
//! A judgment that errors, times out, panics or fails validation excludes
//! that one candidate. The rest of the batch is unaffected.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::stream::{self, StreamExt};

use crate::error::ServiceError;
use crate::oracle::{Judgment, JudgmentOracle};
use crate::types::{Candidate, ScoredCandidate};

/// Candidates must score strictly above this to be returned.
pub const RELEVANCE_THRESHOLD: f64 = 35.0;

/// Scores filtered candidates through the judgment oracle.
pub struct RelevanceScorer {
    oracle: Arc<dyn JudgmentOracle>,
    timeout: Duration,
    max_in_flight: Option<usize>,
}

impl RelevanceScorer {
    pub fn new(
        oracle: Arc<dyn JudgmentOracle>,
        timeout: Duration,
        max_in_flight: Option<usize>,
    ) -> Self {
        Self {
            oracle,
            timeout,
            max_in_flight,
        }
    }

    /// Judge every candidate, keep those above [`RELEVANCE_THRESHOLD`], and
    /// sort by descending score.
    pub async fn score(&self, query: &str, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let submitted = candidates.len();
        let in_flight = self
            .max_in_flight
            .unwrap_or(submitted)
            .clamp(1, submitted.max(1));

        let judged: Vec<Option<ScoredCandidate>> = stream::iter(candidates)
            .map(|candidate| self.judge_one(query, candidate))
            .buffered(in_flight)
            .collect()
            .await;

        let answered = judged.iter().filter(|j| j.is_some()).count();
        let mut scored: Vec<ScoredCandidate> = judged
            .into_iter()
            .flatten()
            .filter(|s| s.match_score > RELEVANCE_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));

        tracing::debug!(
            submitted,
            answered,
            kept = scored.len(),
            "relevance scoring complete"
        );
        scored
    }

    async fn judge_one(&self, query: &str, candidate: Candidate) -> Option<ScoredCandidate> {
        let context = candidate_context(&candidate);
        match self.request_judgment(query, &context).await {
            Ok(Judgment { score, reasoning }) => Some(ScoredCandidate {
                candidate,
                match_score: score,
                reasoning,
            }),
            Err(err) => {
                tracing::warn!(
                    candidate = %candidate.id,
                    error = %err,
                    "judgment failed, excluding candidate"
                );
                None
            }
        }
    }

    async fn request_judgment(&self, query: &str, context: &str) -> Result<Judgment, ServiceError> {
        let call = AssertUnwindSafe(self.oracle.judge(query, context))
            .catch_unwind()
            .map(|outcome| {
                outcome.unwrap_or_else(|_| {
                    Err(ServiceError::Unavailable("judgment oracle panicked".into()))
                })
            });
        let payload = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                ServiceError::Timeout(format!(
                    "judgment oracle exceeded {}s",
                    self.timeout.as_secs()
                ))
            })??;
        payload.validate()
    }
}

/// Compact textual profile handed to the judgment oracle.
pub fn candidate_context(candidate: &Candidate) -> String {
    let summary = candidate
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("none");

    let skills = if candidate.skills.is_empty() {
        "none".to_owned()
    } else {
        candidate.skills.join(", ")
    };

    let roles: Vec<String> = candidate
        .work_experiences
        .iter()
        .map(|w| format!("{} at {}", w.position, w.company))
        .collect();
    let experience = if roles.is_empty() {
        "none".to_owned()
    } else {
        roles.join("; ")
    };

    format!("Summary: {summary}\nSkills: {skills}\nExperience: {experience}")
}
