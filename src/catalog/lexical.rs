//! Term index over profile text.
//!
//! Every query term must occur in a profile for it to match. Matches are
//! ranked by the summed frequency of the query terms, ties by ascending id.

use std::collections::{BTreeMap, HashMap};

use skillsense_search::{Candidate, CandidateId};

/// Split `text` into lowercase terms.
///
/// Letters, digits, `+`, `#` and inner dots are kept so that `C++`, `C#`
/// and `Node.js` survive as single terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Text the lexical index sees for one profile.
pub fn searchable_text(candidate: &Candidate) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(candidate.summary.as_deref());
    parts.extend(candidate.skills.iter().map(String::as_str));
    for work in &candidate.work_experiences {
        parts.push(&work.position);
        parts.push(&work.company);
        parts.extend(work.description.as_deref());
        parts.extend(work.technologies_used.iter().map(String::as_str));
    }
    for project in &candidate.projects {
        parts.push(&project.name);
        parts.extend(project.description.as_deref());
    }
    for cert in &candidate.certifications {
        parts.push(&cert.name);
    }
    parts.join(" ")
}

#[derive(Debug, Default)]
pub struct TermIndex {
    postings: BTreeMap<CandidateId, HashMap<String, u32>>,
}

impl TermIndex {
    pub fn insert(&mut self, candidate: &Candidate) {
        let mut freqs: HashMap<String, u32> = HashMap::new();
        for term in tokenize(&searchable_text(candidate)) {
            *freqs.entry(term).or_default() += 1;
        }
        self.postings.insert(candidate.id, freqs);
    }

    pub fn search(&self, terms: &str, limit: usize) -> Vec<CandidateId> {
        let mut query = tokenize(terms);
        query.sort();
        query.dedup();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(u32, CandidateId)> = self
            .postings
            .iter()
            .filter_map(|(id, freqs)| {
                query
                    .iter()
                    .map(|term| freqs.get(term).copied())
                    .sum::<Option<u32>>()
                    .map(|score| (score, *id))
            })
            .collect();

        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        hits.into_iter().take(limit).map(|(_, id)| id).collect()
    }
}
