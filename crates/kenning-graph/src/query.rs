//! Read-only queries and their response types.
//!
//! All response types derive `Serialize`/`Deserialize`; front ends hand
//! them straight to JSON.

use crate::types::{ConceptRecord, ConnectionType, DifficultyRange, GraphNode, KnowledgeGraph};
use serde::{Deserialize, Serialize};

// ============================================================================
// Summaries
// ============================================================================

/// The short form of a concept used in search results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptSummary {
    /// Concept id.
    pub id: String,
    /// Concept title.
    pub title: String,
    /// Concept category.
    pub category: String,
    /// Difficulty band.
    pub difficulty_range: DifficultyRange,
}

impl From<&ConceptRecord> for ConceptSummary {
    fn from(concept: &ConceptRecord) -> Self {
        Self {
            id: concept.id.clone(),
            title: concept.title.clone(),
            category: concept.category.clone(),
            difficulty_range: concept.difficulty_range,
        }
    }
}

impl From<&GraphNode> for ConceptSummary {
    fn from(node: &GraphNode) -> Self {
        Self::from(&node.concept)
    }
}

/// A neighbor as listed in [`ConceptDetails`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectedConcept {
    /// Neighbor id.
    pub id: String,
    /// Neighbor title.
    pub title: String,
    /// Neighbor category.
    pub category: String,
    /// Type of the connecting edge.
    pub connection_type: ConnectionType,
}

/// Everything known about one concept.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConceptDetails {
    /// The concept record.
    #[serde(flatten)]
    pub concept: ConceptRecord,
    /// Canonical (PageRank) centrality.
    pub centrality: f64,
    /// Degree centrality.
    pub degree_centrality: f64,
    /// Betweenness centrality.
    pub betweenness_centrality: f64,
    /// Number of neighbors.
    pub connection_count: usize,
    /// Neighbors, in adjacency order.
    pub connected_concepts: Vec<ConnectedConcept>,
}

// ============================================================================
// Search / details
// ============================================================================

/// Case-insensitive substring search over title, category, and tags.
///
/// Queries shorter than `min_len` characters return nothing. At most
/// `limit` results are returned, in database order.
pub fn search_concepts(
    graph: &KnowledgeGraph,
    query: &str,
    min_len: usize,
    limit: usize,
) -> Vec<ConceptSummary> {
    if query.chars().count() < min_len {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    graph
        .iter_nodes()
        .filter(|node| {
            let concept = &node.concept;
            concept.title.to_lowercase().contains(&needle)
                || concept.category.to_lowercase().contains(&needle)
                || concept
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .take(limit)
        .map(ConceptSummary::from)
        .collect()
}

/// Details for one concept, or `None` if the id is unknown.
pub fn concept_details(graph: &KnowledgeGraph, id: &str) -> Option<ConceptDetails> {
    let node = graph.get_node(id)?;

    let connected_concepts: Vec<ConnectedConcept> = graph
        .neighbors(id)
        .into_iter()
        .filter_map(|neighbor| {
            let edge = graph.edge_between(id, neighbor.id())?;
            Some(ConnectedConcept {
                id: neighbor.id().to_string(),
                title: neighbor.title().to_string(),
                category: neighbor.category().to_string(),
                connection_type: edge.connection_type,
            })
        })
        .collect();

    Some(ConceptDetails {
        concept: node.concept.clone(),
        centrality: node.centrality,
        degree_centrality: node.degree_centrality,
        betweenness_centrality: node.betweenness_centrality,
        connection_count: connected_concepts.len(),
        connected_concepts,
    })
}

// ============================================================================
// Network view
// ============================================================================

/// Filter for [`build_concept_network`]. `None` means "no restriction".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkFilter {
    /// Keep only nodes of this category.
    pub category: Option<String>,
    /// Keep only links of these types.
    pub connection_types: Option<Vec<ConnectionType>>,
}

impl NetworkFilter {
    /// No filtering.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to the given link types.
    pub fn with_connection_types(
        mut self,
        types: impl IntoIterator<Item = ConnectionType>,
    ) -> Self {
        self.connection_types = Some(types.into_iter().collect());
        self
    }

    fn keeps_node(&self, node: &GraphNode) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| node.category() == category)
    }

    fn keeps_type(&self, connection_type: ConnectionType) -> bool {
        self.connection_types
            .as_ref()
            .is_none_or(|types| types.contains(&connection_type))
    }
}

/// A node of the visualization view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    /// Concept id.
    pub id: String,
    /// Concept title.
    pub title: String,
    /// Concept category.
    pub category: String,
    /// Difficulty band.
    pub difficulty_range: DifficultyRange,
    /// Canonical centrality.
    pub centrality: f64,
    /// Neighbor count in the full graph.
    pub connections: usize,
}

/// A link of the visualization view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    /// Declaring concept id.
    pub source: String,
    /// Referenced concept id.
    pub target: String,
    /// Connection type.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Edge weight.
    pub weight: f64,
}

/// A visualization-ready `{nodes, links}` view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptNetwork {
    /// Nodes that passed the filter.
    pub nodes: Vec<NetworkNode>,
    /// Links whose type passed the filter and whose endpoints both survived.
    pub links: Vec<NetworkLink>,
}

/// Build the `{nodes, links}` view under `filter`.
pub fn build_concept_network(graph: &KnowledgeGraph, filter: &NetworkFilter) -> ConceptNetwork {
    let kept: Vec<bool> = graph.iter_nodes().map(|node| filter.keeps_node(node)).collect();

    let nodes = graph
        .iter_nodes()
        .zip(&kept)
        .filter(|(_, keep)| **keep)
        .map(|(node, _)| NetworkNode {
            id: node.id().to_string(),
            title: node.title().to_string(),
            category: node.category().to_string(),
            difficulty_range: node.difficulty(),
            centrality: node.centrality,
            connections: graph.neighbor_count(node.id()),
        })
        .collect();

    let survives = |id: &str| graph.position(id).is_some_and(|pos| kept[pos]);
    let links = graph
        .iter_edges()
        .filter(|edge| filter.keeps_type(edge.connection_type))
        .filter(|edge| survives(&edge.source) && survives(&edge.target))
        .map(|edge| NetworkLink {
            source: edge.source.clone(),
            target: edge.target.clone(),
            connection_type: edge.connection_type,
            weight: edge.weight,
        })
        .collect();

    ConceptNetwork { nodes, links }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    fn sample() -> KnowledgeGraph {
        let concepts = vec![
            ConceptRecord::new("quad", "Quadratic Equations", "algebra")
                .with_difficulty(4, 6)
                .with_tags(["polynomials"])
                .with_connections(["linear", "proj"]),
            ConceptRecord::new("linear", "Linear Equations", "algebra")
                .with_difficulty(2, 3)
                .with_connections(["quad"]),
            ConceptRecord::new("qm", "Quantum Mechanics", "physics").with_difficulty(12, 14),
            ConceptRecord::new("proj", "Projectile Motion", "mechanics")
                .with_difficulty(5, 7)
                .with_tags(["physics"]),
        ];
        GraphBuilder::new().build(&concepts).unwrap().0
    }

    // ------------------------------------------------------------------------
    // search_concepts
    // ------------------------------------------------------------------------

    #[test]
    fn test_search_matches_titles_case_insensitively() {
        let graph = sample();
        // "equations" also contains "qu".
        let results = search_concepts(&graph, "qu", 2, 10);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["quad", "linear", "qm"]);
    }

    #[test]
    fn test_search_matches_category_and_tags() {
        let graph = sample();
        // "physics" is qm's category and proj's tag.
        let results = search_concepts(&graph, "PHYSICS", 2, 10);
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["qm", "proj"]);
    }

    #[test]
    fn test_search_short_query_returns_nothing() {
        let graph = sample();
        assert!(search_concepts(&graph, "q", 2, 10).is_empty());
        assert!(search_concepts(&graph, "", 2, 10).is_empty());
    }

    #[test]
    fn test_search_respects_limit() {
        let graph = sample();
        assert_eq!(search_concepts(&graph, "e", 1, 2).len(), 2);
    }

    #[test]
    fn test_search_summary_fields() {
        let graph = sample();
        let results = search_concepts(&graph, "linear", 2, 10);
        assert_eq!(
            results,
            vec![ConceptSummary {
                id: "linear".into(),
                title: "Linear Equations".into(),
                category: "algebra".into(),
                difficulty_range: DifficultyRange::new(2, 3),
            }]
        );
    }

    // ------------------------------------------------------------------------
    // concept_details
    // ------------------------------------------------------------------------

    #[test]
    fn test_concept_details_resolves_neighbors() {
        let graph = sample();
        let details = concept_details(&graph, "quad").unwrap();

        assert_eq!(details.concept.title, "Quadratic Equations");
        assert_eq!(details.connection_count, 2);
        let ids: Vec<_> = details
            .connected_concepts
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["linear", "proj"]);
        assert_eq!(details.connected_concepts[1].category, "mechanics");
        assert_eq!(
            details.connected_concepts[1].connection_type,
            ConnectionType::Application
        );
    }

    #[test]
    fn test_concept_details_unknown_id() {
        let graph = sample();
        assert!(concept_details(&graph, "missing").is_none());
    }

    #[test]
    fn test_concept_details_serializes_flat() {
        let graph = sample();
        let details = concept_details(&graph, "qm").unwrap();
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["id"], "qm");
        assert_eq!(json["connection_count"], 0);
        assert!(json["centrality"].is_number());
    }

    // ------------------------------------------------------------------------
    // build_concept_network
    // ------------------------------------------------------------------------

    #[test]
    fn test_network_unfiltered() {
        let graph = sample();
        let network = build_concept_network(&graph, &NetworkFilter::all());
        assert_eq!(network.nodes.len(), 4);
        assert_eq!(network.links.len(), 2);
    }

    #[test]
    fn test_network_category_filter_drops_dangling_links() {
        let graph = sample();
        let network = build_concept_network(&graph, &NetworkFilter::all().with_category("algebra"));

        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.links.len(), 1);
        assert_eq!(network.links[0].source, "quad");
        assert_eq!(network.links[0].target, "linear");
    }

    #[test]
    fn test_network_type_filter() {
        let graph = sample();
        let network = build_concept_network(
            &graph,
            &NetworkFilter::all().with_connection_types([ConnectionType::Application]),
        );
        assert_eq!(network.nodes.len(), 4);
        assert_eq!(network.links.len(), 1);
        assert_eq!(network.links[0].target, "proj");
    }

    #[test]
    fn test_network_link_serializes_type() {
        let graph = sample();
        let network = build_concept_network(&graph, &NetworkFilter::all());
        let json = serde_json::to_value(&network).unwrap();
        assert!(json["links"][0]["type"].is_string());
    }
}
