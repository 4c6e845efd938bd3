//! Contracts for the AI-backed collaborators the pipeline consumes.
//!
//! Each oracle answers in a fixed schema ([`IntentPayload`],
//! [`JudgmentPayload`]). Decoding tolerates the usual model quirks: numbers
//! sent as strings, floats where an integer belongs, `null` in place of a
//! list. Payloads are validated before the pipeline uses them; a payload
//! that fails validation is treated exactly like a failed call, which
//! routes it into the consuming stage's fallback or exclusion path.
//!
//! All implementations must be `Send + Sync`: one handle is shared by every
//! concurrent request.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::types::{QueryIntent, ScoredCandidate, SkillSet};

/// Lowest and highest legal judgment scores.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;

/// Reasoning recorded when the oracle scored a candidate without saying why.
pub const DEFAULT_REASONING: &str = "No reasoning provided.";

/// Raw output of the intent oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub semantic_query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(
        default,
        alias = "optional_skills",
        deserialize_with = "null_as_default"
    )]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_years")]
    pub experience_years: Option<i64>,
}

impl IntentPayload {
    /// Checks the payload and converts it into a [`QueryIntent`].
    ///
    /// A blank `semantic_query` is malformed. Blank skills are dropped, and
    /// a negative experience floor is treated as absent.
    pub fn validate(self) -> Result<QueryIntent, ServiceError> {
        let semantic_query = self.semantic_query.trim();
        if semantic_query.is_empty() {
            return Err(ServiceError::Malformed(
                "intent payload has an empty semantic_query".into(),
            ));
        }

        let min_experience_years = self
            .experience_years
            .and_then(|years| u32::try_from(years).ok());

        Ok(QueryIntent {
            semantic_query: semantic_query.to_owned(),
            required_skills: self.required_skills.into_iter().collect::<SkillSet>(),
            optional_skills: self.nice_to_have_skills.into_iter().collect::<SkillSet>(),
            min_experience_years,
        })
    }
}

/// Raw output of the judgment oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JudgmentPayload {
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// A validated relevance judgment.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    pub score: f64,
    pub reasoning: String,
}

impl JudgmentPayload {
    /// Checks the payload: the score must be present, finite and within
    /// [`SCORE_RANGE`]. Blank reasoning becomes [`DEFAULT_REASONING`].
    pub fn validate(self) -> Result<Judgment, ServiceError> {
        let score = self
            .score
            .ok_or_else(|| ServiceError::Malformed("judgment payload has no score".into()))?;
        if !score.is_finite() || !SCORE_RANGE.contains(&score) {
            return Err(ServiceError::Malformed(format!(
                "judgment score {score} is outside 0-100"
            )));
        }

        let reasoning = self
            .reasoning
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REASONING.to_owned());

        Ok(Judgment { score, reasoning })
    }
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A JSON number, or a string holding one.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Anything that is not numeric reads as `None`; validation rejects it.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(numeric))
}

/// Integers pass through, finite floats truncate, anything else is `None`.
fn lenient_years<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(value.as_i64().or_else(|| {
        numeric(&value)
            .filter(|years| years.is_finite())
            .map(|years| years.trunc() as i64)
    }))
}

/// Decomposes a recruiting query into structured intent.
#[async_trait]
pub trait IntentOracle: Send + Sync {
    async fn infer_intent(&self, query: &str) -> Result<IntentPayload, ServiceError>;
}

/// Turns text into an embedding vector for the vector index.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ServiceError>;
}

/// Judges how well one candidate matches the original query.
///
/// `context` is the compact profile text built by the relevance scorer.
#[async_trait]
pub trait JudgmentOracle: Send + Sync {
    async fn judge(&self, query: &str, context: &str) -> Result<JudgmentPayload, ServiceError>;
}

/// Writes the recruiter-facing narrative over the best matches.
#[async_trait]
pub trait NarrativeOracle: Send + Sync {
    async fn narrate(&self, query: &str, top: &[ScoredCandidate]) -> Result<String, ServiceError>;
}
