//! Concept recommendations.
//!
//! Candidates come from two places, in this order: the seed's direct
//! neighbors near the learner's level, then same-category concepts at the
//! learner's level. The merged list is sorted by score (stable, so equal
//! scores keep that order) and truncated.

use crate::query::ConceptSummary;
use crate::types::KnowledgeGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Largest `|low - level|` for a neighbor to be recommended.
pub const NEIGHBOR_LEVEL_WINDOW: u32 = 2;

/// Largest `|low - level|` for a category peer to be recommended.
pub const CATEGORY_LEVEL_WINDOW: u32 = 1;

/// Where a recommendation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// A direct neighbor of the seed.
    DirectConnection,
    /// A concept sharing the seed's category.
    SameCategory,
}

impl RecommendationSource {
    /// Human-readable reason shown with the recommendation.
    pub fn reason(&self) -> &'static str {
        match self {
            RecommendationSource::DirectConnection => "Directly related concept",
            RecommendationSource::SameCategory => "Same category, appropriate level",
        }
    }
}

/// A recommended concept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The recommended concept.
    #[serde(flatten)]
    pub concept: ConceptSummary,
    /// Ranking score; higher is better.
    pub score: f64,
    /// Which candidate pool produced it.
    pub source: RecommendationSource,
    /// Why it was recommended.
    pub reason: String,
}

impl Recommendation {
    fn new(concept: ConceptSummary, score: f64, source: RecommendationSource) -> Self {
        Self {
            concept,
            score,
            source,
            reason: source.reason().to_string(),
        }
    }
}

/// Recommend up to `max` concepts to study around `concept_id` for a
/// learner at `user_level`.
///
/// - neighbors with `|low - level| <= 2`, scored `centrality + 2 - |delta|`
/// - category peers with `|low - level| <= 1`, scored `2 - |delta|`
///
/// The seed is never recommended. Unknown ids yield an empty list.
pub fn generate_recommendations(
    graph: &KnowledgeGraph,
    concept_id: &str,
    user_level: i32,
    max: usize,
) -> Vec<Recommendation> {
    let Some(seed) = graph.get_node(concept_id) else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::from([seed.id()]);
    let mut recommendations = Vec::new();

    for neighbor in graph.neighbors(concept_id) {
        let delta = neighbor.difficulty().low.abs_diff(user_level);
        if delta <= NEIGHBOR_LEVEL_WINDOW && seen.insert(neighbor.id()) {
            recommendations.push(Recommendation::new(
                ConceptSummary::from(neighbor),
                neighbor.centrality + f64::from(NEIGHBOR_LEVEL_WINDOW - delta),
                RecommendationSource::DirectConnection,
            ));
        }
    }

    for peer in graph.iter_nodes() {
        if peer.category() != seed.category() {
            continue;
        }
        let delta = peer.difficulty().low.abs_diff(user_level);
        if delta <= CATEGORY_LEVEL_WINDOW && seen.insert(peer.id()) {
            recommendations.push(Recommendation::new(
                ConceptSummary::from(peer),
                1.0 + f64::from(CATEGORY_LEVEL_WINDOW - delta),
                RecommendationSource::SameCategory,
            ));
        }
    }

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(max);

    log::debug!(
        "{} recommendation(s) for '{}' at level {}",
        recommendations.len(),
        concept_id,
        user_level
    );
    recommendations
}

// ============================================================================
// Tests
// ============================================================================
