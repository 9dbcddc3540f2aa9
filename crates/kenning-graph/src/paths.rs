//! Path search over the concept graph.
//!
//! - [`calculate_shortest_paths`]: single-source BFS (hop count)
//! - [`find_optimal_learning_path`]: uniform-cost search with a
//!   difficulty- and category-aware step cost
//! - [`PathCache`]: memo of learning paths keyed by concept-id pair
//!
//! BFS visits neighbors in adjacency insertion order, so ties between
//! equally short paths always resolve the same way. The cost search
//! breaks cost ties by push order.

use crate::types::{ConnectionType, GraphNode, KnowledgeGraph};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

const BASE_STEP_COST: f64 = 1.0;
const DIFFICULTY_JUMP_COST: f64 = 0.5;
const CATEGORY_CHANGE_COST: f64 = 0.3;
const PREREQUISITE_DISCOUNT: f64 = 0.7;

// ============================================================================
// BFS
// ============================================================================

/// BFS parent pointers from `source`.
///
/// `parents[source] == Some(source)`; unreachable positions are `None`.
pub(crate) fn bfs_parents(graph: &KnowledgeGraph, source: usize) -> Vec<Option<usize>> {
    let mut parents = vec![None; graph.node_count()];
    parents[source] = Some(source);

    let mut queue = VecDeque::from([source]);
    while let Some(current) = queue.pop_front() {
        for &next in graph.adjacent(current) {
            if parents[next].is_none() {
                parents[next] = Some(current);
                queue.push_back(next);
            }
        }
    }
    parents
}

/// Walk `previous` pointers back from `target` to `source`.
fn trace_back(previous: &[Option<usize>], source: usize, target: usize) -> Option<Vec<usize>> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        current = previous[current]?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

fn to_ids(graph: &KnowledgeGraph, path: &[usize]) -> Vec<String> {
    path.iter()
        .map(|&pos| graph.node_at(pos).id().to_string())
        .collect()
}

/// One shortest (fewest hops) path from `source_id` to every reachable
/// node, including the trivial path `[source_id]`. Empty for unknown ids.
pub fn calculate_shortest_paths(
    graph: &KnowledgeGraph,
    source_id: &str,
) -> HashMap<String, Vec<String>> {
    let Some(source) = graph.position(source_id) else {
        return HashMap::new();
    };

    let parents = bfs_parents(graph, source);
    let mut paths = HashMap::new();
    for target in 0..graph.node_count() {
        if parents[target].is_none() {
            continue;
        }
        let mut path = vec![target];
        let mut current = target;
        while current != source {
            match parents[current] {
                Some(parent) => current = parent,
                None => break,
            }
            path.push(current);
        }
        path.reverse();
        paths.insert(graph.node_at(target).id().to_string(), to_ids(graph, &path));
    }
    paths
}

/// Fewest-hops path between two concepts, if any.
pub fn shortest_path(graph: &KnowledgeGraph, from_id: &str, to_id: &str) -> Option<Vec<String>> {
    let source = graph.position(from_id)?;
    let target = graph.position(to_id)?;
    let parents = bfs_parents(graph, source);
    parents[target]?;
    trace_back(&parents, source, target).map(|path| to_ids(graph, &path))
}

// ============================================================================
// Learning cost search
// ============================================================================

/// Cost of studying `to` right after `from`.
///
/// Starts at 1.0; adds half the difficulty jump when `to` starts more than
/// one level above where `from` ends; adds 0.3 for a category change.
/// The total is discounted by 30% when `from` declared a prerequisite
/// edge to `to` (the reverse declaration does not count).
pub fn calculate_learning_cost(graph: &KnowledgeGraph, from: &GraphNode, to: &GraphNode) -> f64 {
    let mut cost = BASE_STEP_COST;

    let jump = i64::from(to.difficulty().low) - i64::from(from.difficulty().high);
    if jump > 1 {
        cost += jump as f64 * DIFFICULTY_JUMP_COST;
    }

    if from.category() != to.category() {
        cost += CATEGORY_CHANGE_COST;
    }

    let prerequisite = graph
        .edge_from_to(from.id(), to.id())
        .is_some_and(|edge| edge.connection_type == ConnectionType::Prerequisite);
    if prerequisite {
        cost *= PREREQUISITE_DISCOUNT;
    }

    cost
}

/// A frontier entry; the heap pops the lowest cost, then the earliest push.
#[derive(Debug)]
struct Frontier {
    cost: f64,
    seq: usize,
    node: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Cheapest learning path from `source_id` to `target_id` under
/// [`calculate_learning_cost`]. Stops as soon as the target is popped.
///
/// Returns `None` if either id is unknown or the target is unreachable.
pub fn find_optimal_learning_path(
    graph: &KnowledgeGraph,
    source_id: &str,
    target_id: &str,
) -> Option<Vec<String>> {
    let source = graph.position(source_id)?;
    let target = graph.position(target_id)?;
    let n = graph.node_count();

    let mut best: Vec<Option<f64>> = vec![None; n];
    let mut previous: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0;

    best[source] = Some(0.0);
    heap.push(Frontier {
        cost: 0.0,
        seq,
        node: source,
    });

    while let Some(Frontier { cost, node, .. }) = heap.pop() {
        if node == target {
            return trace_back(&previous, source, target).map(|path| to_ids(graph, &path));
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;

        for &next in graph.adjacent(node) {
            if visited[next] {
                continue;
            }
            let candidate =
                cost + calculate_learning_cost(graph, graph.node_at(node), graph.node_at(next));
            if best[next].is_none_or(|known| candidate < known) {
                best[next] = Some(candidate);
                previous[next] = Some(node);
                seq += 1;
                heap.push(Frontier {
                    cost: candidate,
                    seq,
                    node: next,
                });
            }
        }
    }

    None
}

/// Total learning cost along a path of ids. `None` if a step is not an
/// edge of the graph or an id is unknown.
pub fn path_cost(graph: &KnowledgeGraph, path: &[String]) -> Option<f64> {
    let mut total = 0.0;
    for step in path.windows(2) {
        if !graph.has_edge_between(&step[0], &step[1]) {
            return None;
        }
        let from = graph.get_node(&step[0])?;
        let to = graph.get_node(&step[1])?;
        total += calculate_learning_cost(graph, from, to);
    }
    Some(total)
}

/// First node whose title contains `title`, case-insensitively.
/// Blank queries match nothing.
pub fn resolve_title<'g>(graph: &'g KnowledgeGraph, title: &str) -> Option<&'g GraphNode> {
    let needle = title.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    graph
        .iter_nodes()
        .find(|node| node.title().to_lowercase().contains(&needle))
}

// ============================================================================
// PathCache
// ============================================================================

/// Counters describing a [`PathCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCacheStats {
    /// Cached pairs.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
}

/// Learning paths (as titles) keyed by `(from_id, to_id)`.
///
/// Unreachable pairs are cached as `None`. Entries are never evicted; the
/// graph does not change after construction.
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    entries: HashMap<(String, String), Option<Vec<String>>>,
    hits: u64,
    misses: u64,
}

impl PathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a pair, counting the hit or miss.
    pub fn get(&mut self, from_id: &str, to_id: &str) -> Option<Option<Vec<String>>> {
        match self.entries.get(&(from_id.to_string(), to_id.to_string())) {
            Some(path) => {
                self.hits += 1;
                Some(path.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store the result for a pair.
    pub fn insert(&mut self, from_id: &str, to_id: &str, path: Option<Vec<String>>) {
        self.entries
            .insert((from_id.to_string(), to_id.to_string()), path);
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> PathCacheStats {
        PathCacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
