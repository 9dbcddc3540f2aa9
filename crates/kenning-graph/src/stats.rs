//! Network statistics.
//!
//! Headline numbers (size, density, average degree, category count,
//! difficulty span) plus category and connection-type breakdowns and
//! centrality rankings.

use crate::types::KnowledgeGraph;
use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Types
// ============================================================================

/// Statistics about a built concept graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    /// Number of concepts.
    pub total_nodes: usize,
    /// Number of connections.
    pub total_edges: usize,
    /// `edges / (n(n-1)/2) * 100`, rounded to a whole percent.
    pub density: f64,
    /// `2 * edges / n`, rounded to one decimal.
    pub average_degree: f64,
    /// Number of distinct categories.
    pub categories: usize,
    /// `max(high) - min(low) + 1` over all concepts.
    pub difficulty_span: i64,
    /// Concepts per category.
    pub category_distribution: BTreeMap<String, usize>,
    /// Edges per connection type.
    pub connection_type_distribution: BTreeMap<String, usize>,
    /// Concepts with no connections.
    pub orphan_count: usize,
    /// Connected components of the undirected graph.
    pub component_count: usize,
    /// Id of the concept with the highest centrality.
    pub most_central: Option<String>,
}

// ============================================================================
// Functions
// ============================================================================

/// Compute statistics for a graph.
pub fn calculate_network_statistics(graph: &KnowledgeGraph) -> NetworkStatistics {
    let total_nodes = graph.node_count();
    let total_edges = graph.edge_count();
    let n = total_nodes as f64;
    let e = total_edges as f64;

    let density = if total_nodes < 2 {
        0.0
    } else {
        (e / (n * (n - 1.0) / 2.0) * 100.0).round()
    };

    let average_degree = if total_nodes == 0 {
        0.0
    } else {
        (2.0 * e / n * 10.0).round() / 10.0
    };

    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for node in graph.iter_nodes() {
        *category_distribution
            .entry(node.category().to_string())
            .or_insert(0) += 1;
    }

    let mut connection_type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for edge in graph.iter_edges() {
        *connection_type_distribution
            .entry(edge.connection_type.name().to_string())
            .or_insert(0) += 1;
    }

    let difficulty_span = match (
        graph.iter_nodes().map(|n| n.difficulty().low).min(),
        graph.iter_nodes().map(|n| n.difficulty().high).max(),
    ) {
        (Some(low), Some(high)) => i64::from(high) - i64::from(low) + 1,
        _ => 0,
    };

    let orphan_count = graph.iter_nodes().filter(|n| n.degree() == 0).count();
    let component_count = if total_nodes == 0 {
        0
    } else {
        connected_components(&graph.graph)
    };

    let most_central = top_nodes_by_centrality(graph, 1)
        .into_iter()
        .next()
        .map(|(id, _)| id);

    NetworkStatistics {
        total_nodes,
        total_edges,
        density,
        average_degree,
        categories: category_distribution.len(),
        difficulty_span,
        category_distribution,
        connection_type_distribution,
        orphan_count,
        component_count,
        most_central,
    }
}

/// One-line summary of graph size.
pub fn quick_summary(graph: &KnowledgeGraph) -> String {
    format!("{} concepts, {} connections", graph.node_count(), graph.edge_count())
}

/// Top `limit` concepts by canonical centrality, highest first. Ties keep
/// database order.
pub fn top_nodes_by_centrality(graph: &KnowledgeGraph, limit: usize) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = graph
        .iter_nodes()
        .map(|node| (node.id().to_string(), node.centrality))
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores.truncate(limit);
    scores
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::types::ConceptRecord;

    fn create_test_graph() -> KnowledgeGraph {
        let concepts = vec![
            ConceptRecord::new("a", "A", "basics")
                .with_difficulty(1, 2)
                .with_connections(["b", "c"]),
            ConceptRecord::new("b", "B", "basics")
                .with_difficulty(4, 5)
                .with_connections(["c"]),
            ConceptRecord::new("c", "C", "advanced").with_difficulty(5, 8),
            ConceptRecord::new("orphan", "Orphan", "basics").with_difficulty(3, 3),
        ];
        GraphBuilder::new().build(&concepts).unwrap().0
    }

    #[test]
    fn test_statistics_basic_counts() {
        let stats = calculate_network_statistics(&create_test_graph());
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.categories, 2);
    }

    #[test]
    fn test_statistics_density_and_average_degree() {
        let stats = calculate_network_statistics(&create_test_graph());
        // 3 / (4 * 3 / 2) = 0.5
        assert_eq!(stats.density, 50.0);
        // 2 * 3 / 4 = 1.5
        assert_eq!(stats.average_degree, 1.5);
    }

    #[test]
    fn test_statistics_average_degree_rounds_to_one_decimal() {
        let concepts = vec![
            ConceptRecord::new("a", "A", "x").with_connections(["b"]),
            ConceptRecord::new("b", "B", "x"),
            ConceptRecord::new("c", "C", "x"),
        ];
        let (graph, _) = GraphBuilder::new().build(&concepts).unwrap();
        let stats = calculate_network_statistics(&graph);
        // 2 / 3 = 0.666..
        assert_eq!(stats.average_degree, 0.7);
        // 1 / 3 * 100 = 33.3..
        assert_eq!(stats.density, 33.0);
    }

    #[test]
    fn test_statistics_difficulty_span() {
        let stats = calculate_network_statistics(&create_test_graph());
        // min low 1, max high 8
        assert_eq!(stats.difficulty_span, 8);
    }

    #[test]
    fn test_statistics_distributions() {
        let stats = calculate_network_statistics(&create_test_graph());
        assert_eq!(stats.category_distribution["basics"], 3);
        assert_eq!(stats.category_distribution["advanced"], 1);

        // a->b and a->c have gaps of 2 and 3; b->c has a gap of 0.
        assert_eq!(stats.connection_type_distribution["prerequisite"], 2);
        assert_eq!(stats.connection_type_distribution["related"], 1);
    }

    #[test]
    fn test_statistics_orphans_and_components() {
        let stats = calculate_network_statistics(&create_test_graph());
        assert_eq!(stats.orphan_count, 1);
        assert_eq!(stats.component_count, 2);
    }

    #[test]
    fn test_statistics_most_central() {
        let graph = create_test_graph();
        let stats = calculate_network_statistics(&graph);
        let top = graph
            .iter_nodes()
            .map(|n| n.centrality)
            .fold(0.0, f64::max);
        let most = stats.most_central.unwrap();
        assert_eq!(graph.get_node(&most).unwrap().centrality, top);
    }

    #[test]
    fn test_statistics_empty_graph() {
        let stats = calculate_network_statistics(&KnowledgeGraph::new());
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.average_degree, 0.0);
        assert_eq!(stats.difficulty_span, 0);
        assert_eq!(stats.component_count, 0);
        assert!(stats.most_central.is_none());
    }

    #[test]
    fn test_statistics_single_node() {
        let (graph, _) = GraphBuilder::new()
            .build(&[ConceptRecord::new("a", "A", "x").with_difficulty(2, 4)])
            .unwrap();
        let stats = calculate_network_statistics(&graph);
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.difficulty_span, 3);
        assert_eq!(stats.component_count, 1);
    }

    #[test]
    fn test_statistics_span_covers_full_level_range() {
        let (graph, _) = GraphBuilder::new()
            .build(&[
                ConceptRecord::new("a", "A", "x").with_difficulty(i32::MIN, i32::MIN),
                ConceptRecord::new("b", "B", "x").with_difficulty(i32::MAX, i32::MAX),
            ])
            .unwrap();
        let stats = calculate_network_statistics(&graph);
        assert_eq!(stats.difficulty_span, 1 << 32);
    }

    #[test]
    fn test_quick_summary() {
        assert_eq!(quick_summary(&create_test_graph()), "4 concepts, 3 connections");
    }

    #[test]
    fn test_top_nodes_by_centrality() {
        let graph = create_test_graph();
        let top = top_nodes_by_centrality(&graph, 2);
        assert_eq!(top.len(), 2);
        assert!(top[0].1 >= top[1].1);
        assert_eq!(top[0].1, 1.0);
        assert!(top_nodes_by_centrality(&KnowledgeGraph::new(), 5).is_empty());
    }

    #[test]
    fn test_statistics_serialization() {
        let stats = calculate_network_statistics(&create_test_graph());
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: NetworkStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats);
    }
}
