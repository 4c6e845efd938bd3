//! Reciprocal Rank Fusion: `score = Σ 1/(k + rank_i)`.
//!
//! Combines the rankings of independent retrieval sources without
//! comparing their raw scores. Rank position is the only input, so a
//! candidate a source did not return simply receives no contribution from
//! that source.

use std::collections::HashMap;

use crate::types::{CandidateId, CandidateRef, FusedCandidate};

/// RRF smoothing constant.
pub const RRF_K: f64 = 60.0;

/// Contribution of the entry at zero-based `rank`.
pub fn reciprocal_rank(rank: usize) -> f64 {
    1.0 / (RRF_K + rank as f64)
}

/// Fuse ranked lists into one ranking.
///
/// Contributions are summed per id across all lists. Output is sorted by
/// descending fused score, ties broken by ascending id.
pub fn fuse(ranked_lists: &[Vec<CandidateRef>]) -> Vec<FusedCandidate> {
    let mut scores: HashMap<CandidateId, f64> = HashMap::new();

    for list in ranked_lists {
        for entry in list {
            *scores.entry(entry.id).or_default() += entry.contribution;
        }
    }

    let mut fused: Vec<FusedCandidate> = scores
        .into_iter()
        .map(|(id, fused_score)| FusedCandidate { id, fused_score })
        .collect();

    fused.sort_by(|a, b| {
        b.fused_score
            .total_cmp(&a.fused_score)
            .then_with(|| a.id.cmp(&b.id))
    });

    fused
}
