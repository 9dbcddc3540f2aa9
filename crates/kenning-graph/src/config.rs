//! Engine tuning parameters.

use serde::{Deserialize, Serialize};

/// Tunable parameters of the concept network engine.
///
/// The defaults reproduce the engine's reference behaviour; front ends
/// load this from the `[engine]` section of their config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// PageRank damping factor.
    pub damping: f64,
    /// Number of PageRank power iterations.
    pub iterations: usize,
    /// Learner level assumed when none is given.
    pub default_user_level: i32,
    /// Recommendation list length when none is given.
    pub max_recommendations: usize,
    /// Maximum number of search results.
    pub search_limit: usize,
    /// Queries shorter than this (in characters) return nothing.
    pub min_query_len: usize,
    /// Categories with more members than this are split by connectivity.
    pub subcluster_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            iterations: 50,
            default_user_level: 5,
            max_recommendations: 5,
            search_limit: 10,
            min_query_len: 2,
            subcluster_threshold: 3,
        }
    }
}
