//! Knowledge graph construction.
//!
//! [`build_knowledge_graph`] turns the concept database into nodes, typed
//! and weighted edges, and the adjacency index. [`GraphBuilder`] runs that
//! and then the centrality pass, which is how the engine builds its graph.
//!
//! Connections are undirected: if `a` lists `b` and `b` lists `a`, only
//! the first declaration (in database order) creates an edge.

use crate::centrality::compute_centrality;
use crate::config::EngineConfig;
use crate::types::{ConceptRecord, ConnectionType, KnowledgeGraph};
use kenning_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Words that mark a concept as applied when found in its title or tags.
pub const APPLICATION_INDICATORS: [&str; 8] = [
    "application",
    "applied",
    "real-world",
    "practical",
    "physics",
    "engineering",
    "economics",
    "computer science",
];

/// Minimum difficulty gap for a prerequisite connection.
pub const PREREQUISITE_GAP: i64 = 2;

/// Starting weight of every edge.
pub const BASE_WEIGHT: f64 = 1.0;

/// Upper bound on edge weight.
pub const MAX_WEIGHT: f64 = 3.0;

const SAME_CATEGORY_BONUS: f64 = 0.5;
const SHARED_TAG_BONUS: f64 = 0.2;
const DIFFICULTY_PROXIMITY_STEP: f64 = 0.1;

// ============================================================================
// Build report
// ============================================================================

/// A connection that names a concept id missing from the database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingRef {
    /// The declaring concept.
    pub from: String,
    /// The missing id.
    pub to: String,
}

/// What happened during a build.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuildReport {
    /// Nodes created (one per concept).
    pub nodes_created: usize,
    /// Edges created.
    pub edges_created: usize,
    /// Connections skipped because the pair was already connected.
    pub duplicate_connections: usize,
    /// Connections to unknown ids.
    pub dangling_refs: Vec<DanglingRef>,
    /// Concepts that list themselves as a connection.
    pub self_refs: Vec<String>,
}

// ============================================================================
// Connection inference
// ============================================================================

/// Infer the type of a connection from `source` to `target`.
///
/// A difficulty gap of [`PREREQUISITE_GAP`] or more always wins. Otherwise
/// an application indicator in either concept's title or tags makes it an
/// application; anything else is related.
pub fn determine_connection_type(source: &ConceptRecord, target: &ConceptRecord) -> ConnectionType {
    let gap = i64::from(target.difficulty_range.low) - i64::from(source.difficulty_range.high);
    if gap >= PREREQUISITE_GAP {
        return ConnectionType::Prerequisite;
    }

    let source_text = source.searchable_text();
    let target_text = target.searchable_text();
    let applied = APPLICATION_INDICATORS
        .iter()
        .any(|word| source_text.contains(word) || target_text.contains(word));

    if applied {
        ConnectionType::Application
    } else {
        ConnectionType::Related
    }
}

/// Weight of a connection: base 1.0, +0.5 for a shared category, +0.2 per
/// shared tag, plus up to 1.0 for close starting difficulty. Capped at 3.0.
pub fn calculate_connection_weight(source: &ConceptRecord, target: &ConceptRecord) -> f64 {
    let mut weight = BASE_WEIGHT;

    if source.category == target.category {
        weight += SAME_CATEGORY_BONUS;
    }

    let shared_tags = source
        .tags
        .iter()
        .filter(|tag| target.tags.contains(tag))
        .count();
    weight += SHARED_TAG_BONUS * shared_tags as f64;

    let low_gap = source.difficulty_range.low.abs_diff(target.difficulty_range.low) as f64;
    weight += (1.0 - low_gap * DIFFICULTY_PROXIMITY_STEP).max(0.0);

    weight.min(MAX_WEIGHT)
}

// ============================================================================
// Build
// ============================================================================

/// Build nodes, edges, and adjacency from a concept database.
///
/// Centrality fields are left at zero; see [`GraphBuilder`] for the full
/// build.
///
/// # Errors
///
/// Returns [`Error::InvalidData`] if a record fails
/// [`ConceptRecord::validate`] or two records share an id.
pub fn build_knowledge_graph(concepts: &[ConceptRecord]) -> Result<(KnowledgeGraph, BuildReport)> {
    let mut graph = KnowledgeGraph::new();
    let mut report = BuildReport::default();
    let mut seen: HashSet<&str> = HashSet::with_capacity(concepts.len());

    for concept in concepts {
        concept.validate()?;
        if !seen.insert(concept.id.as_str()) {
            return Err(Error::invalid_data(format!(
                "duplicate concept id '{}'",
                concept.id
            )));
        }
        graph.add_node(concept.clone());
        report.nodes_created += 1;
    }

    for (source, concept) in concepts.iter().enumerate() {
        for related_id in &concept.connections {
            let Some(target) = graph.position(related_id) else {
                log::warn!(
                    "Concept '{}' references unknown concept '{}'",
                    concept.id,
                    related_id
                );
                report.dangling_refs.push(DanglingRef {
                    from: concept.id.clone(),
                    to: related_id.clone(),
                });
                continue;
            };

            if target == source {
                log::debug!("Concept '{}' lists itself as a connection", concept.id);
                report.self_refs.push(concept.id.clone());
                continue;
            }

            if graph.has_edge_between(&concept.id, related_id) {
                report.duplicate_connections += 1;
                continue;
            }

            let related = &concepts[target];
            let connection_type = determine_connection_type(concept, related);
            let weight = calculate_connection_weight(concept, related);
            graph.insert_edge(source, target, connection_type, weight);
            report.edges_created += 1;
        }
    }

    Ok((graph, report))
}

/// Builds a knowledge graph and computes its centrality metrics.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    config: EngineConfig,
}

impl GraphBuilder {
    /// Create a builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given engine parameters.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the graph, then compute degree, betweenness, and PageRank.
    ///
    /// # Errors
    ///
    /// See [`build_knowledge_graph`].
    pub fn build(&self, concepts: &[ConceptRecord]) -> Result<(KnowledgeGraph, BuildReport)> {
        let started = Instant::now();
        let (mut graph, report) = build_knowledge_graph(concepts)?;

        compute_centrality(&mut graph, self.config.damping, self.config.iterations);

        log::info!(
            "Built concept graph: {} nodes, {} edges, {} dangling reference(s) in {:?}",
            report.nodes_created,
            report.edges_created,
            report.dangling_refs.len(),
            started.elapsed()
        );

        Ok((graph, report))
    }
}

// ============================================================================
// Tests
// ============================================================================
