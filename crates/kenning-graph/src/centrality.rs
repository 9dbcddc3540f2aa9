//! Centrality analysis.
//!
//! Computed once, right after the edges are built, over the undirected
//! adjacency index. All three measures are deterministic for a fixed
//! concept order: traversal follows adjacency insertion order and nothing
//! runs in parallel.

use crate::paths::bfs_parents;
use crate::types::KnowledgeGraph;

/// Compute degree, betweenness, and PageRank centrality and store them on
/// every node. `centrality` is set to the normalized PageRank score.
pub fn compute_centrality(graph: &mut KnowledgeGraph, damping: f64, iterations: usize) {
    let degree = degree_centrality(graph);
    let betweenness = betweenness_centrality(graph);
    let page_rank = normalize_by_max(&page_rank_scores(graph, damping, iterations));

    for (pos, node) in graph.nodes.iter_mut().enumerate() {
        node.degree_centrality = degree[pos];
        node.betweenness_centrality = betweenness[pos];
        node.page_rank_centrality = page_rank[pos];
        node.centrality = page_rank[pos];
    }

    log::debug!(
        "Centrality computed for {} nodes ({} PageRank iterations, damping {})",
        graph.node_count(),
        iterations,
        damping
    );
}

/// `(in + out) / (n - 1)` per node; all zero when `n <= 1`.
pub fn degree_centrality(graph: &KnowledgeGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let denominator = (n - 1) as f64;
    graph
        .iter_nodes()
        .map(|node| node.degree() as f64 / denominator)
        .collect()
}

/// Single-path betweenness, normalized so the busiest node scores 1.0.
///
/// For every ordered pair (source, target), only the one shortest path
/// found by BFS is credited: each node strictly between the endpoints
/// gains one. Pairs that are adjacent credit nothing.
pub fn betweenness_centrality(graph: &KnowledgeGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut counts = vec![0usize; n];

    for source in 0..n {
        let parents = bfs_parents(graph, source);
        for target in (0..n).filter(|&t| t != source) {
            let mut current = match parents[target] {
                Some(parent) => parent,
                None => continue,
            };
            while current != source {
                counts[current] += 1;
                match parents[current] {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
        }
    }

    let raw: Vec<f64> = counts.into_iter().map(|c| c as f64).collect();
    normalize_by_max(&raw)
}

/// Raw (unnormalized) PageRank after a fixed number of synchronous
/// power iterations over the undirected adjacency.
///
/// Each iteration computes
/// `rank(n) = (1 - d) / N + d * sum(rank(m) / |adj(m)|)` over the
/// neighbors `m` of `n`. Isolated nodes keep only the teleport term.
pub fn page_rank_scores(graph: &KnowledgeGraph, damping: f64, iterations: usize) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let count = n as f64;
    let mut ranks = vec![1.0 / count; n];

    for _ in 0..iterations {
        let mut next = vec![(1.0 - damping) / count; n];
        for (pos, rank) in next.iter_mut().enumerate() {
            let incoming: f64 = graph
                .adjacent(pos)
                .iter()
                .map(|&neighbor| {
                    let out = graph.adjacent(neighbor).len();
                    if out > 0 {
                        ranks[neighbor] / out as f64
                    } else {
                        0.0
                    }
                })
                .sum();
            *rank += damping * incoming;
        }
        ranks = next;
    }

    ranks
}

/// Divide every value by the maximum. All zeros if the maximum is not
/// positive.
fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        values.iter().map(|v| v / max).collect()
    } else {
        vec![0.0; values.len()]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_knowledge_graph;
    use crate::types::ConceptRecord;

    fn concept(id: &str, connections: &[&str]) -> ConceptRecord {
        ConceptRecord::new(id, id.to_uppercase(), "algebra")
            .with_difficulty(3, 4)
            .with_connections(connections.iter().copied())
    }

    fn build(concepts: Vec<ConceptRecord>) -> KnowledgeGraph {
        build_knowledge_graph(&concepts).unwrap().0
    }

    /// a - b - c
    fn path_graph() -> KnowledgeGraph {
        build(vec![
            concept("a", &["b"]),
            concept("b", &["a", "c"]),
            concept("c", &["b"]),
        ])
    }

    /// hub connected to four spokes
    fn star_graph() -> KnowledgeGraph {
        build(vec![
            concept("hub", &["s1", "s2", "s3", "s4"]),
            concept("s1", &[]),
            concept("s2", &[]),
            concept("s3", &[]),
            concept("s4", &[]),
        ])
    }

    // ------------------------------------------------------------------------
    // Degree
    // ------------------------------------------------------------------------

    #[test]
    fn test_degree_centrality_star() {
        let graph = star_graph();
        let degree = degree_centrality(&graph);
        assert_eq!(degree[0], 1.0);
        for spoke in &degree[1..] {
            assert!((spoke - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degree_centrality_single_node() {
        let graph = build(vec![concept("solo", &[])]);
        assert_eq!(degree_centrality(&graph), vec![0.0]);
    }

    #[test]
    fn test_degree_centrality_empty() {
        let graph = KnowledgeGraph::new();
        assert!(degree_centrality(&graph).is_empty());
    }

    // ------------------------------------------------------------------------
    // Betweenness
    // ------------------------------------------------------------------------

    #[test]
    fn test_betweenness_path_middle_is_highest() {
        let graph = path_graph();
        let betweenness = betweenness_centrality(&graph);
        assert_eq!(betweenness, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_betweenness_star_hub() {
        let graph = star_graph();
        let betweenness = betweenness_centrality(&graph);
        assert_eq!(betweenness[0], 1.0);
        assert!(betweenness[1..].iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_betweenness_credits_only_first_bfs_path() {
        // a connects to b and c, both connect to d: two shortest paths a->d.
        // BFS from a discovers b first, so only b is credited for a->d.
        let graph = build(vec![
            concept("a", &["b", "c"]),
            concept("b", &["d"]),
            concept("c", &["d"]),
            concept("d", &[]),
        ]);
        let betweenness = betweenness_centrality(&graph);
        // a->d and d->a both route through b; b<->c both route through a.
        assert_eq!(betweenness, vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_betweenness_no_paths_is_zero() {
        let graph = build(vec![concept("a", &["b"]), concept("b", &[])]);
        assert_eq!(betweenness_centrality(&graph), vec![0.0, 0.0]);
    }

    // ------------------------------------------------------------------------
    // PageRank
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_rank_mass_is_conserved_without_isolated_nodes() {
        let graph = path_graph();
        for iterations in [1, 5, 50] {
            let ranks = page_rank_scores(&graph, 0.85, iterations);
            let total: f64 = ranks.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "total = {total}");
        }
    }

    #[test]
    fn test_page_rank_zero_iterations_is_uniform() {
        let graph = star_graph();
        let ranks = page_rank_scores(&graph, 0.85, 0);
        assert!(ranks.iter().all(|&r| (r - 0.2).abs() < 1e-12));
    }

    #[test]
    fn test_page_rank_isolated_node_keeps_teleport_term() {
        let graph = build(vec![concept("a", &["b"]), concept("b", &[]), concept("z", &[])]);
        let ranks = page_rank_scores(&graph, 0.85, 50);
        assert!((ranks[2] - 0.15 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_centrality_normalizes_page_rank() {
        let mut graph = star_graph();
        compute_centrality(&mut graph, 0.85, 50);

        let hub = graph.get_node("hub").unwrap();
        assert!((hub.page_rank_centrality - 1.0).abs() < 1e-12);
        assert_eq!(hub.centrality, hub.page_rank_centrality);

        let max = graph
            .iter_nodes()
            .map(|n| n.page_rank_centrality)
            .fold(0.0, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
        for node in graph.iter_nodes() {
            assert!((0.0..=1.0).contains(&node.page_rank_centrality));
        }
    }

    #[test]
    fn test_compute_centrality_is_deterministic() {
        let mut first = path_graph();
        let mut second = path_graph();
        compute_centrality(&mut first, 0.85, 50);
        compute_centrality(&mut second, 0.85, 50);

        for (x, y) in first.iter_nodes().zip(second.iter_nodes()) {
            assert_eq!(x.centrality, y.centrality);
            assert_eq!(x.betweenness_centrality, y.betweenness_centrality);
            assert_eq!(x.degree_centrality, y.degree_centrality);
        }
    }

    #[test]
    fn test_compute_centrality_isolated_node() {
        let mut graph = build(vec![
            concept("a", &["b"]),
            concept("b", &[]),
            concept("island", &[]),
        ]);
        compute_centrality(&mut graph, 0.85, 50);

        let island = graph.get_node("island").unwrap();
        assert_eq!(island.degree_centrality, 0.0);
        assert_eq!(island.betweenness_centrality, 0.0);
    }

    #[test]
    fn test_normalize_by_max_all_zero() {
        assert_eq!(normalize_by_max(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert_eq!(normalize_by_max(&[1.0, 4.0]), vec![0.25, 1.0]);
    }
}
