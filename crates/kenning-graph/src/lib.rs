//! Concept network engine for Kenning.
//!
//! Builds a knowledge graph over a concept database, precomputes
//! centrality, and serves path, recommendation, and query operations.
//!
//! # Modules
//!
//! - [`types`]: concept records, nodes, edges, and [`KnowledgeGraph`]
//! - [`builder`]: connection inference, weighting, and graph construction
//! - [`centrality`]: degree, betweenness, and PageRank
//! - [`paths`]: BFS paths, learning-cost search, and the path cache
//! - [`recommend`]: level-aware recommendations
//! - [`query`]: search, details, and the network view
//! - [`cluster`]: category clustering
//! - [`stats`]: network statistics
//! - [`validation`]: integrity checks
//! - [`persistence`]: concept loading and network export
//! - [`engine`]: [`ConceptNetworkEngine`], which ties it all together

#![doc = include_str!("../README.md")]

pub mod builder;
pub mod centrality;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod paths;
pub mod persistence;
pub mod query;
pub mod recommend;
pub mod stats;
pub mod types;
pub mod validation;

pub use builder::{BuildReport, DanglingRef, GraphBuilder, build_knowledge_graph};
pub use cluster::ConceptCluster;
pub use config::EngineConfig;
pub use engine::ConceptNetworkEngine;
pub use paths::{PathCache, PathCacheStats};
pub use persistence::{
    ExportMetadata, ExportedNetwork, load_concepts, load_concepts_from_str, load_export,
    save_export,
};
pub use query::{
    ConceptDetails, ConceptNetwork, ConceptSummary, ConnectedConcept, NetworkFilter, NetworkLink,
    NetworkNode,
};
pub use recommend::{Recommendation, RecommendationSource};
pub use stats::NetworkStatistics;
pub use types::{
    ConceptRecord, ConnectionType, DifficultyRange, GraphEdge, GraphNode, KnowledgeGraph,
};
pub use validation::{ValidationIssue, ValidationResult};
