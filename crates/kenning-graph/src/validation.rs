//! Graph validation and integrity checking.
//!
//! Checks a built graph (and the report from building it) for orphan
//! concepts, dangling and self references, titles that title lookup cannot
//! tell apart, prerequisites that skip too many levels, and connected
//! concepts that split into separate groups.

use crate::builder::BuildReport;
use crate::types::{ConnectionType, KnowledgeGraph};
use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest difficulty jump a prerequisite may span before it is flagged.
pub const MAX_PREREQUISITE_STEP: i64 = 4;

// ============================================================================
// Types
// ============================================================================

/// Result of graph validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the graph is valid (no errors).
    pub valid: bool,
    /// Problems that make the graph unusable as a learning map.
    pub errors: Vec<ValidationIssue>,
    /// Suspicious data.
    pub warnings: Vec<ValidationIssue>,
    /// Informational findings.
    pub info: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// Add an error (marks the graph invalid).
    pub fn add_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Add an informational finding.
    pub fn add_info(&mut self, issue: ValidationIssue) {
        self.info.push(issue);
    }

    /// Errors plus warnings.
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }

    /// Every issue, errors first.
    pub fn iter_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .chain(self.info.iter())
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A validation finding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue code, e.g. `ORPHAN_NODES`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Affected concept ids.
    pub nodes: Vec<String>,
    /// Affected connections, as `"from -> to"`.
    pub edges: Vec<String>,
}

impl ValidationIssue {
    /// Create a new issue.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Attach affected nodes.
    pub fn with_nodes(mut self, nodes: Vec<String>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Attach affected edges.
    pub fn with_edges(mut self, edges: Vec<String>) -> Self {
        self.edges = edges;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a graph and the report produced while building it.
///
/// | Code | Level |
/// |---|---|
/// | `DUPLICATE_TITLES` | error |
/// | `ORPHAN_NODES` | warning |
/// | `DANGLING_REFERENCES` | warning |
/// | `STEEP_PREREQUISITES` | warning |
/// | `SELF_REFERENCES` | info |
/// | `DISCONNECTED_GROUPS` | info |
pub fn validate_graph(graph: &KnowledgeGraph, report: &BuildReport) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_duplicate_titles(graph, &mut result);
    check_orphans(graph, &mut result);
    check_dangling_references(report, &mut result);
    check_steep_prerequisites(graph, &mut result);
    check_self_references(report, &mut result);
    check_disconnected_groups(graph, &mut result);

    log::debug!(
        "Validation finished: {} error(s), {} warning(s), {} info",
        result.errors.len(),
        result.warnings.len(),
        result.info.len()
    );
    result
}

// ============================================================================
// Individual checks
// ============================================================================

fn check_orphans(graph: &KnowledgeGraph, result: &mut ValidationResult) {
    let orphans: Vec<String> = graph
        .iter_nodes()
        .filter(|node| node.degree() == 0)
        .map(|node| node.id().to_string())
        .collect();

    if !orphans.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "ORPHAN_NODES",
                format!("{} concept(s) have no connections", orphans.len()),
            )
            .with_nodes(orphans),
        );
    }
}

fn check_dangling_references(report: &BuildReport, result: &mut ValidationResult) {
    if report.dangling_refs.is_empty() {
        return;
    }

    let mut nodes: Vec<String> = report.dangling_refs.iter().map(|r| r.from.clone()).collect();
    nodes.dedup();
    let edges = report
        .dangling_refs
        .iter()
        .map(|r| format!("{} -> {}", r.from, r.to))
        .collect();

    result.add_warning(
        ValidationIssue::new(
            "DANGLING_REFERENCES",
            format!(
                "{} connection(s) reference unknown concepts",
                report.dangling_refs.len()
            ),
        )
        .with_nodes(nodes)
        .with_edges(edges),
    );
}

fn check_self_references(report: &BuildReport, result: &mut ValidationResult) {
    if report.self_refs.is_empty() {
        return;
    }
    result.add_info(
        ValidationIssue::new(
            "SELF_REFERENCES",
            format!(
                "{} concept(s) list themselves as a connection (ignored)",
                report.self_refs.len()
            ),
        )
        .with_nodes(report.self_refs.clone()),
    );
}

fn check_duplicate_titles(graph: &KnowledgeGraph, result: &mut ValidationResult) {
    // Title lookup is case-insensitive, so only the first of these is reachable.
    let mut by_title: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for node in graph.iter_nodes() {
        by_title
            .entry(node.title().to_lowercase())
            .or_default()
            .push(node.id().to_string());
    }

    let shared: Vec<Vec<String>> = by_title
        .into_values()
        .filter(|ids| ids.len() > 1)
        .collect();
    if shared.is_empty() {
        return;
    }

    result.add_error(
        ValidationIssue::new(
            "DUPLICATE_TITLES",
            format!("{} title(s) belong to several concepts", shared.len()),
        )
        .with_nodes(shared.concat()),
    );
}

fn check_steep_prerequisites(graph: &KnowledgeGraph, result: &mut ValidationResult) {
    let steep: Vec<String> = graph
        .iter_edges()
        .filter(|edge| edge.connection_type == ConnectionType::Prerequisite)
        .filter(|edge| {
            let (Some(source), Some(target)) =
                (graph.get_node(&edge.source), graph.get_node(&edge.target))
            else {
                return false;
            };
            let jump = i64::from(target.difficulty().low) - i64::from(source.difficulty().high);
            jump > MAX_PREREQUISITE_STEP
        })
        .map(|edge| format!("{} -> {}", edge.source, edge.target))
        .collect();

    if !steep.is_empty() {
        result.add_warning(
            ValidationIssue::new(
                "STEEP_PREREQUISITES",
                format!(
                    "{} prerequisite connection(s) skip more than {} levels",
                    steep.len(),
                    MAX_PREREQUISITE_STEP
                ),
            )
            .with_edges(steep),
        );
    }
}

fn check_disconnected_groups(graph: &KnowledgeGraph, result: &mut ValidationResult) {
    // Orphans are their own components and are reported separately.
    let orphans = graph.iter_nodes().filter(|node| node.degree() == 0).count();
    let groups = connected_components(&graph.graph).saturating_sub(orphans);

    if groups > 1 {
        result.add_info(ValidationIssue::new(
            "DISCONNECTED_GROUPS",
            format!("Connected concepts form {groups} separate groups"),
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================
