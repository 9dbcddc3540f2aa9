//! Core graph types.
//!
//! - [`ConceptRecord`]: a concept as it appears in the concept database
//! - [`GraphNode`] / [`GraphEdge`]: the built graph's nodes and edges
//! - [`KnowledgeGraph`]: nodes, edges, and the symmetric adjacency index
//!
//! The graph mirrors its edges into a petgraph `DiGraph` (direction is the
//! declaring concept to the referenced concept) so that structural checks
//! can use petgraph's algorithms. Traversals use the insertion-ordered
//! adjacency index instead, which keeps BFS tie-breaking deterministic.

use kenning_core::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Concept records
// ============================================================================

/// Inclusive difficulty band of a concept, serialized as `[low, high]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct DifficultyRange {
    /// Easiest level at which the concept is taught.
    pub low: i32,
    /// Hardest level at which the concept is taught.
    pub high: i32,
}

impl DifficultyRange {
    /// Create a new range.
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }
}

impl From<[i32; 2]> for DifficultyRange {
    fn from([low, high]: [i32; 2]) -> Self {
        Self { low, high }
    }
}

impl From<DifficultyRange> for [i32; 2] {
    fn from(range: DifficultyRange) -> Self {
        [range.low, range.high]
    }
}

/// A concept from the concept database. Read-only input to the builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    /// Unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Subject category (e.g. "algebra").
    pub category: String,
    /// Free-form tags, in database order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Difficulty band.
    pub difficulty_range: DifficultyRange,
    /// Ids of related concepts, in database order.
    #[serde(default)]
    pub connections: Vec<String>,
}

impl ConceptRecord {
    /// Create a concept with no tags, no connections, and difficulty `[1, 1]`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            tags: Vec::new(),
            difficulty_range: DifficultyRange::new(1, 1),
            connections: Vec::new(),
        }
    }

    /// Set the difficulty band.
    pub fn with_difficulty(mut self, low: i32, high: i32) -> Self {
        self.difficulty_range = DifficultyRange::new(low, high);
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the connection ids.
    pub fn with_connections<I, S>(mut self, connections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connections = connections.into_iter().map(Into::into).collect();
        self
    }

    /// Check the record's required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for an empty id or title, or a
    /// difficulty range whose low end exceeds its high end.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_data("concept has an empty id"));
        }
        if self.title.trim().is_empty() {
            return Err(Error::invalid_data(format!(
                "concept '{}' has an empty title",
                self.id
            )));
        }
        let DifficultyRange { low, high } = self.difficulty_range;
        if low > high {
            return Err(Error::invalid_data(format!(
                "concept '{}' has difficulty range [{low}, {high}] with low > high",
                self.id
            )));
        }
        Ok(())
    }

    /// Lowercased title and tags, joined by spaces.
    pub(crate) fn searchable_text(&self) -> String {
        let mut text = self.title.to_lowercase();
        for tag in &self.tags {
            text.push(' ');
            text.push_str(&tag.to_lowercase());
        }
        text
    }
}

// ============================================================================
// Connection type
// ============================================================================

/// Inferred type of a connection between two concepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// The source sits well below the target in difficulty.
    Prerequisite,
    /// One side is an applied or real-world use of the other.
    Application,
    /// Anything else.
    Related,
}

impl ConnectionType {
    /// All connection types, in declaration order.
    pub const ALL: [ConnectionType; 3] = [
        ConnectionType::Prerequisite,
        ConnectionType::Application,
        ConnectionType::Related,
    ];

    /// Lowercase name used in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionType::Prerequisite => "prerequisite",
            ConnectionType::Application => "application",
            ConnectionType::Related => "related",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConnectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "prerequisite" => Ok(ConnectionType::Prerequisite),
            "application" => Ok(ConnectionType::Application),
            "related" => Ok(ConnectionType::Related),
            other => Err(Error::parse(format!("unknown connection type: {other}"))),
        }
    }
}

// ============================================================================
// Nodes and edges
// ============================================================================

/// A concept in the built graph, with its computed metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphNode {
    /// The wrapped concept.
    #[serde(flatten)]
    pub concept: ConceptRecord,
    /// Edges that point at this concept.
    pub in_degree: usize,
    /// Edges this concept declared.
    pub out_degree: usize,
    /// `(in + out) / (n - 1)`.
    pub degree_centrality: f64,
    /// Normalized count of BFS shortest paths passing through this node.
    pub betweenness_centrality: f64,
    /// Normalized PageRank score.
    pub page_rank_centrality: f64,
    /// Canonical ranking score; equal to `page_rank_centrality`.
    pub centrality: f64,
}

impl GraphNode {
    /// Wrap a concept with zeroed metrics.
    pub fn new(concept: ConceptRecord) -> Self {
        Self {
            concept,
            in_degree: 0,
            out_degree: 0,
            degree_centrality: 0.0,
            betweenness_centrality: 0.0,
            page_rank_centrality: 0.0,
            centrality: 0.0,
        }
    }

    /// The concept id.
    pub fn id(&self) -> &str {
        &self.concept.id
    }

    /// The concept title.
    pub fn title(&self) -> &str {
        &self.concept.title
    }

    /// The concept category.
    pub fn category(&self) -> &str {
        &self.concept.category
    }

    /// The concept difficulty band.
    pub fn difficulty(&self) -> DifficultyRange {
        self.concept.difficulty_range
    }

    /// Total degree (in + out).
    pub fn degree(&self) -> usize {
        self.in_degree + self.out_degree
    }
}

/// An undirected, typed, weighted connection. `source` is the concept
/// that declared the connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Declaring concept id.
    pub source: String,
    /// Referenced concept id.
    pub target: String,
    /// Inferred connection type.
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    /// Weight in `[1.0, 3.0]`.
    pub weight: f64,
}

// ============================================================================
// KnowledgeGraph
// ============================================================================

/// The built concept graph.
///
/// Node positions are stable: the i-th concept added is at position i,
/// which is also its petgraph `NodeIndex`.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeGraph {
    pub(crate) graph: DiGraph<String, ConnectionType>,
    pub(crate) node_indices: HashMap<String, NodeIndex>,
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,
    edge_lookup: HashMap<(String, String), usize>,
    adjacency: Vec<Vec<usize>>,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its position. Ids must be unique; the
    /// builder checks this before calling.
    pub(crate) fn add_node(&mut self, concept: ConceptRecord) -> usize {
        let id = concept.id.clone();
        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(id, idx);
        self.nodes.push(GraphNode::new(concept));
        self.adjacency.push(Vec::new());
        debug_assert_eq!(idx.index(), self.nodes.len() - 1);
        idx.index()
    }

    /// Insert an edge between two existing positions, updating degrees
    /// and both adjacency lists. Callers check for duplicates first.
    pub(crate) fn insert_edge(
        &mut self,
        source: usize,
        target: usize,
        connection_type: ConnectionType,
        weight: f64,
    ) {
        let source_id = self.nodes[source].id().to_string();
        let target_id = self.nodes[target].id().to_string();

        self.graph.add_edge(
            NodeIndex::new(source),
            NodeIndex::new(target),
            connection_type,
        );
        self.edge_lookup
            .insert((source_id.clone(), target_id.clone()), self.edges.len());
        self.edges.push(GraphEdge {
            source: source_id,
            target: target_id,
            connection_type,
            weight,
        });

        self.nodes[source].out_degree += 1;
        self.nodes[target].in_degree += 1;
        self.adjacency[source].push(target);
        self.adjacency[target].push(source);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if a node with this id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Position of a node, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.node_indices.get(id).map(|idx| idx.index())
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.position(id).map(|pos| &self.nodes[pos])
    }

    /// Node at a position. Panics on an out-of-range position.
    pub(crate) fn node_at(&self, pos: usize) -> &GraphNode {
        &self.nodes[pos]
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges in creation order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Iterate over nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Iterate over edges in creation order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// Neighbor positions of a position, in insertion order.
    pub(crate) fn adjacent(&self, pos: usize) -> &[usize] {
        &self.adjacency[pos]
    }

    /// Neighbors of a node, in insertion order. Empty for unknown ids.
    pub fn neighbors(&self, id: &str) -> Vec<&GraphNode> {
        self.position(id)
            .map(|pos| self.adjacency[pos].iter().map(|&n| &self.nodes[n]).collect())
            .unwrap_or_default()
    }

    /// Number of neighbors of a node (0 for unknown ids).
    pub fn neighbor_count(&self, id: &str) -> usize {
        self.position(id)
            .map(|pos| self.adjacency[pos].len())
            .unwrap_or(0)
    }

    /// The symmetric adjacency index as id lists.
    pub fn adjacency_list(&self) -> HashMap<String, Vec<String>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| {
                let neighbors = self.adjacency[pos]
                    .iter()
                    .map(|&n| self.nodes[n].id().to_string())
                    .collect();
                (node.id().to_string(), neighbors)
            })
            .collect()
    }

    /// The edge declared from `from` to `to`. Direction matters.
    pub fn edge_from_to(&self, from: &str, to: &str) -> Option<&GraphEdge> {
        self.edge_lookup
            .get(&(from.to_string(), to.to_string()))
            .map(|&i| &self.edges[i])
    }

    /// The edge connecting `a` and `b` in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edge_from_to(a, b).or_else(|| self.edge_from_to(b, a))
    }

    /// True if `a` and `b` are connected in either direction.
    pub fn has_edge_between(&self, a: &str, b: &str) -> bool {
        self.edge_between(a, b).is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
