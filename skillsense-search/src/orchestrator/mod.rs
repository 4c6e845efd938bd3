//! Search orchestrator: intent, concurrent retrieval, fusion, filter, judgment.
//!
//! This module sequences the pipeline stages. Retrieval sources are
//! queried concurrently and fused by reciprocal rank; survivors of the hard
//! filter are judged concurrently and returned sorted by relevance, with a
//! narrative summary over the global top matches.

pub mod filter;
pub mod fusion;
pub mod intent;
pub mod relevance;
pub mod search;
pub mod summary;
