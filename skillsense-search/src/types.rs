//! Core types flowing through the search pipeline.
//!
//! Every stage produces fresh values; nothing here is mutated once a later
//! stage has seen it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, totally ordered candidate identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CandidateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A set of skill names.
///
/// Membership is case-insensitive and whitespace-trimmed; the first
/// spelling seen is kept and insertion order is preserved so that joined
/// lexical queries are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `skill` unless it is blank or already present (ignoring case).
    ///
    /// Returns `true` if the skill was added.
    pub fn insert(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.contains(skill) {
            return false;
        }
        self.0.push(skill.to_owned());
        true
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        self.0.iter().any(|s| s.to_lowercase() == needle)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns `self ∪ other`, keeping `self`'s entries first.
    pub fn union(&self, other: &SkillSet) -> SkillSet {
        let mut merged = self.clone();
        for skill in other.iter() {
            merged.insert(skill);
        }
        merged
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.0
    }
}

/// Structured reading of a recruiting query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Phrase used for vector retrieval. Never empty.
    pub semantic_query: String,
    /// Skills every returned candidate must hold.
    pub required_skills: SkillSet,
    /// Skills that strengthen a candidate but are not mandatory.
    pub optional_skills: SkillSet,
    /// Minimum years of commercial experience, if the query states one.
    pub min_experience_years: Option<u32>,
}

impl QueryIntent {
    /// The intent used when the query cannot be decomposed: the raw query
    /// verbatim and no skill constraints.
    pub fn fallback(raw_query: &str) -> Self {
        Self {
            semantic_query: raw_query.to_owned(),
            required_skills: SkillSet::new(),
            optional_skills: SkillSet::new(),
            min_experience_years: None,
        }
    }

    /// `required_skills ∪ optional_skills`.
    pub fn all_skills(&self) -> SkillSet {
        self.required_skills.union(&self.optional_skills)
    }
}

/// Which retrieval strategy produced a [`CandidateRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetrievalSource {
    /// Vector-similarity search over profile embeddings.
    Semantic,
    /// Full-text search over profile text.
    Lexical,
}

impl RetrievalSource {
    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Lexical => "lexical",
        }
    }
}

impl fmt::Display for RetrievalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a single source's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRef {
    pub id: CandidateId,
    pub source: RetrievalSource,
    /// Zero-based position in the source's ranking.
    pub rank: usize,
    /// Reciprocal-rank contribution of this entry to the fused score.
    pub contribution: f64,
}

/// A candidate id with its reciprocal-rank-fused score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedCandidate {
    pub id: CandidateId,
    pub fused_score: f64,
}

/// A role held by a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub position: String,
    pub company: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub technologies_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuing_organization: Option<String>,
    pub date_issued: Option<String>,
}

/// Profile snapshot hydrated from the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// Generated summary of the profile.
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(default)]
    pub education_history: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl Candidate {
    /// A profile with only an id; the remaining fields are empty.
    pub fn new(id: impl Into<CandidateId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            surname: None,
            email: None,
            linkedin_url: None,
            github_url: None,
            summary: None,
            skills: Vec::new(),
            work_experiences: Vec::new(),
            education_history: Vec::new(),
            projects: Vec::new(),
            languages: Vec::new(),
            certifications: Vec::new(),
        }
    }

    /// Case-insensitive check against the candidate's skill list.
    pub fn has_skill(&self, skill: &str) -> bool {
        let needle = skill.trim().to_lowercase();
        self.skills
            .iter()
            .any(|s| s.trim().to_lowercase() == needle)
    }

    /// "Name Surname", falling back to the id for anonymous profiles.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            format!("Candidate #{}", self.id)
        } else {
            parts.join(" ")
        }
    }
}

/// A candidate annotated by the judgment oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Relevance on a 0–100 scale. Authoritative for final ordering.
    pub match_score: f64,
    pub reasoning: String,
}

/// The paginated, annotated answer to one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Narrative over the global top matches.
    pub summary: String,
    /// Number of candidates above the relevance threshold, before slicing.
    pub total: usize,
    /// One-based page number, `skip / limit + 1`.
    pub page: usize,
    pub page_size: usize,
    pub items: Vec<ScoredCandidate>,
}
