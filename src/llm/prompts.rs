//! Prompt text for the three chat oracles.

use skillsense_search::ScoredCandidate;

pub const INTENT_SYSTEM: &str = "\
You analyse recruiting queries. Decompose the query into a JSON object with exactly these keys:
- \"semantic_query\": the core role description for semantic search, stripped of hard filters (string, never empty)
- \"required_skills\": skills the candidate MUST have (array of strings)
- \"nice_to_have_skills\": skills that are a plus but not mandatory (array of strings)
- \"experience_years\": minimum years of commercial experience as an integer, or null if not stated
Be precise. Put concrete technologies such as Python, React or SQL in the skill arrays. Reply with JSON only.";

pub const JUDGMENT_SYSTEM: &str = "\
You rate how well a candidate profile matches a recruiting query. Reply with a JSON object with exactly these keys:
- \"score\": a number from 0 to 100
- \"reasoning\": one or two sentences explaining the score
Reply with JSON only.";

pub const NARRATIVE_SYSTEM: &str = "\
You are a recruiting assistant. Write a concise summary for a recruiter. \
Point out the best two or three candidates and explain why they fit the query. \
Reply with plain prose, no headings.";

pub fn intent_user(query: &str) -> String {
    format!("Query: \"{query}\"")
}

pub fn judgment_user(query: &str, context: &str) -> String {
    format!("Query: \"{query}\"\n--- Candidate profile ---\n{context}\n---")
}

pub fn narrative_user(query: &str, top: &[ScoredCandidate]) -> String {
    format!(
        "Original query: \"{query}\"\n--- Candidates ---\n{}\n---\nYour summary:",
        narrative_context(top)
    )
}

/// One block per candidate: name, rounded match percentage and reasoning.
pub fn narrative_context(top: &[ScoredCandidate]) -> String {
    top.iter()
        .map(|s| {
            format!(
                "Candidate: {}\nMatch: {:.0}%\nReasoning: {}",
                s.candidate.display_name(),
                s.match_score,
                s.reasoning
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
