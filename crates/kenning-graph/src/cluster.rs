//! Category clustering.
//!
//! Concepts are grouped by category first. A category larger than the
//! threshold is split into the connected components of its internal edges
//! (edges with both endpoints in the category); if that yields only one
//! component the category stays whole.

use crate::types::KnowledgeGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A group of concept ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptCluster {
    /// The category name, or `"{category}-{n}"` for a subcluster.
    pub id: String,
    /// Category shared by every member.
    pub category: String,
    /// Member ids, in discovery order.
    pub concepts: Vec<String>,
}

/// Cluster every concept. Categories appear in first-seen order;
/// subclusters are numbered from 1 in DFS discovery order.
pub fn cluster_concepts(graph: &KnowledgeGraph, threshold: usize) -> Vec<ConceptCluster> {
    let mut categories: Vec<(String, Vec<String>)> = Vec::new();
    for node in graph.iter_nodes() {
        match categories.iter_mut().find(|(c, _)| c == node.category()) {
            Some((_, members)) => members.push(node.id().to_string()),
            None => categories.push((node.category().to_string(), vec![node.id().to_string()])),
        }
    }

    let mut clusters = Vec::new();
    for (category, members) in categories {
        if members.len() > threshold {
            let components = find_subclusters(graph, &members);
            if components.len() > 1 {
                log::debug!(
                    "Category '{}' split into {} subclusters",
                    category,
                    components.len()
                );
                for (n, concepts) in components.into_iter().enumerate() {
                    clusters.push(ConceptCluster {
                        id: format!("{}-{}", category, n + 1),
                        category: category.clone(),
                        concepts,
                    });
                }
                continue;
            }
        }
        clusters.push(ConceptCluster {
            id: category.clone(),
            category,
            concepts: members,
        });
    }
    clusters
}

/// Connected components of `members` using only edges between members.
pub fn find_subclusters(graph: &KnowledgeGraph, members: &[String]) -> Vec<Vec<String>> {
    let member_set: HashSet<&str> = members.iter().map(String::as_str).collect();
    let mut visited: HashSet<String> = HashSet::new();
    let mut components = Vec::new();

    for member in members {
        if visited.contains(member) {
            continue;
        }
        components.push(depth_first_cluster(graph, member, &member_set, &mut visited));
    }
    components
}

/// Depth-first walk from `start` restricted to `members`, marking
/// everything reached in `visited`. Returns the ids reached, in preorder.
pub fn depth_first_cluster(
    graph: &KnowledgeGraph,
    start: &str,
    members: &HashSet<&str>,
    visited: &mut HashSet<String>,
) -> Vec<String> {
    let mut component = Vec::new();
    let mut stack = vec![start.to_string()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        // Reverse so the first neighbor is explored first.
        for neighbor in graph.neighbors(&id).into_iter().rev() {
            if members.contains(neighbor.id()) && !visited.contains(neighbor.id()) {
                stack.push(neighbor.id().to_string());
            }
        }
        component.push(id);
    }
    component
}

// ============================================================================
// Tests
// ============================================================================
