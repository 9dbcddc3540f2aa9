//! The concept network engine.
//!
//! [`ConceptNetworkEngine`] owns a built [`KnowledgeGraph`] and answers
//! every query against it. The graph is built once in the constructor and
//! never changes; the only mutable state is the learning path cache.

use crate::builder::{BuildReport, GraphBuilder};
use crate::cluster::{ConceptCluster, cluster_concepts};
use crate::config::EngineConfig;
use crate::paths::{self, PathCache, PathCacheStats};
use crate::persistence::{ExportedNetwork, export_network};
use crate::query::{self, ConceptDetails, ConceptNetwork, ConceptSummary, NetworkFilter};
use crate::recommend::{Recommendation, generate_recommendations};
use crate::stats::{NetworkStatistics, calculate_network_statistics, top_nodes_by_centrality};
use crate::types::{ConceptRecord, KnowledgeGraph};
use crate::validation::{ValidationResult, validate_graph};
use kenning_core::Result;
use std::collections::HashMap;

/// Builds a concept graph once and serves read-only queries over it.
#[derive(Clone, Debug)]
pub struct ConceptNetworkEngine {
    graph: KnowledgeGraph,
    report: BuildReport,
    config: EngineConfig,
    path_cache: PathCache,
}

impl ConceptNetworkEngine {
    /// Build an engine with default parameters.
    ///
    /// # Errors
    ///
    /// Fails if a concept record is invalid or two records share an id.
    pub fn new(concepts: &[ConceptRecord]) -> Result<Self> {
        Self::with_config(concepts, EngineConfig::default())
    }

    /// Build an engine with the given parameters.
    ///
    /// # Errors
    ///
    /// See [`ConceptNetworkEngine::new`].
    pub fn with_config(concepts: &[ConceptRecord], config: EngineConfig) -> Result<Self> {
        let (graph, report) = GraphBuilder::new()
            .with_config(config.clone())
            .build(concepts)?;

        Ok(Self {
            graph,
            report,
            config,
            path_cache: PathCache::new(),
        })
    }

    /// The built graph.
    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    /// What happened while building.
    pub fn build_report(&self) -> &BuildReport {
        &self.report
    }

    /// Engine parameters.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------------

    /// Learning path between two concepts named by title, as titles.
    ///
    /// Titles resolve by case-insensitive substring (first match wins).
    /// Returns `None` if either title matches nothing or the target is
    /// unreachable. Results, including `None` for unreachable pairs, are
    /// cached per id pair.
    pub fn find_learning_path(&mut self, from_title: &str, to_title: &str) -> Option<Vec<String>> {
        let from_id = paths::resolve_title(&self.graph, from_title)?.id().to_string();
        let to_id = paths::resolve_title(&self.graph, to_title)?.id().to_string();

        if let Some(cached) = self.path_cache.get(&from_id, &to_id) {
            log::debug!("Path cache hit: {from_id} -> {to_id}");
            return cached;
        }
        log::debug!("Path cache miss: {from_id} -> {to_id}");

        let titles = paths::find_optimal_learning_path(&self.graph, &from_id, &to_id).map(|ids| {
            ids.iter()
                .filter_map(|id| self.graph.get_node(id))
                .map(|node| node.title().to_string())
                .collect::<Vec<_>>()
        });

        self.path_cache.insert(&from_id, &to_id, titles.clone());
        titles
    }

    /// Cheapest learning path between two ids, as ids.
    pub fn find_optimal_learning_path(
        &self,
        source_id: &str,
        target_id: &str,
    ) -> Option<Vec<String>> {
        paths::find_optimal_learning_path(&self.graph, source_id, target_id)
    }

    /// Fewest-hops path from `source_id` to every reachable concept.
    pub fn shortest_paths(&self, source_id: &str) -> HashMap<String, Vec<String>> {
        paths::calculate_shortest_paths(&self.graph, source_id)
    }

    /// Path cache counters.
    pub fn path_cache_stats(&self) -> PathCacheStats {
        self.path_cache.stats()
    }

    // ------------------------------------------------------------------------
    // Recommendations and queries
    // ------------------------------------------------------------------------

    /// Recommendations around `concept_id` for a learner at `user_level`.
    pub fn generate_recommendations(
        &self,
        concept_id: &str,
        user_level: i32,
        max: usize,
    ) -> Vec<Recommendation> {
        generate_recommendations(&self.graph, concept_id, user_level, max)
    }

    /// Recommendations using the configured level and list length.
    pub fn default_recommendations(&self, concept_id: &str) -> Vec<Recommendation> {
        self.generate_recommendations(
            concept_id,
            self.config.default_user_level,
            self.config.max_recommendations,
        )
    }

    /// Text search over titles, categories, and tags.
    pub fn search_concepts(&self, query: &str) -> Vec<ConceptSummary> {
        query::search_concepts(
            &self.graph,
            query,
            self.config.min_query_len,
            self.config.search_limit,
        )
    }

    /// Details for one concept.
    pub fn get_concept_details(&self, concept_id: &str) -> Option<ConceptDetails> {
        query::concept_details(&self.graph, concept_id)
    }

    /// Visualization view under `filter`.
    pub fn build_concept_network(&self, filter: &NetworkFilter) -> ConceptNetwork {
        query::build_concept_network(&self.graph, filter)
    }

    /// Category clusters, split by connectivity where large.
    pub fn cluster_concepts(&self) -> Vec<ConceptCluster> {
        cluster_concepts(&self.graph, self.config.subcluster_threshold)
    }

    /// Network statistics.
    pub fn calculate_network_statistics(&self) -> NetworkStatistics {
        calculate_network_statistics(&self.graph)
    }

    /// The `limit` most central concepts, as `(id, centrality)`.
    pub fn top_concepts_by_centrality(&self, limit: usize) -> Vec<(String, f64)> {
        top_nodes_by_centrality(&self.graph, limit)
    }

    /// Every node, edge, and the statistics.
    pub fn export_network_data(&self) -> ExportedNetwork {
        export_network(&self.graph)
    }

    /// Structural checks over the graph and the build report.
    pub fn validate(&self) -> ValidationResult {
        validate_graph(&self.graph, &self.report)
    }
}

// ============================================================================
// Tests
// ============================================================================
