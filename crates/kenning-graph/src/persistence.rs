//! Loading concept databases and saving network exports.
//!
//! - Concept databases are JSON: either a bare array of concept records or
//!   an object with a `concepts` array.
//! - Exports are pretty-printed JSON of [`ExportedNetwork`].

use crate::stats::{NetworkStatistics, calculate_network_statistics};
use crate::types::{ConceptRecord, GraphEdge, GraphNode, KnowledgeGraph};
use kenning_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

// ============================================================================
// Serializable types
// ============================================================================

/// A full dump of the network: nodes, edges, and statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportedNetwork {
    /// All nodes with their metrics, in database order.
    pub nodes: Vec<GraphNode>,
    /// All edges, in creation order.
    pub edges: Vec<GraphEdge>,
    /// Statistics at export time.
    pub statistics: NetworkStatistics,
    /// Provenance of the export.
    #[serde(default)]
    pub metadata: Option<ExportMetadata>,
}

/// Provenance of an export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// When the export was made (RFC 3339).
    pub built_at: String,
    /// Version of the crate that made it.
    pub builder_version: String,
    /// Number of concepts in the source database.
    pub concept_count: usize,
}

impl ExportMetadata {
    /// Metadata stamped with the current time.
    pub fn now(concept_count: usize) -> Self {
        Self {
            built_at: chrono::Utc::now().to_rfc3339(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            concept_count,
        }
    }
}

// ============================================================================
// Concept databases
// ============================================================================

/// Load a concept database from a JSON file.
///
/// # Errors
///
/// [`Error::FileNotFound`] if the file is missing, an I/O error if it
/// can't be read, or a parse error for malformed content.
pub fn load_concepts(path: impl AsRef<Path>) -> Result<Vec<ConceptRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let concepts = load_concepts_from_str(&json)?;

    log::debug!("Loaded {} concepts from {}", concepts.len(), path.display());
    Ok(concepts)
}

/// Parse a concept database from a JSON string.
pub fn load_concepts_from_str(json: &str) -> Result<Vec<ConceptRecord>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse concept JSON: {e}")))?;

    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove("concepts").ok_or_else(|| {
            Error::parse("concept JSON object has no 'concepts' field")
        })?,
        other => {
            return Err(Error::parse(format!(
                "expected an array of concepts, found {}",
                json_kind(&other)
            )));
        }
    };

    serde_json::from_value(list)
        .map_err(|e| Error::parse(format!("Invalid concept record: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Exports
// ============================================================================

/// Dump every node, edge, and the current statistics.
pub fn export_network(graph: &KnowledgeGraph) -> ExportedNetwork {
    ExportedNetwork {
        nodes: graph.nodes().to_vec(),
        edges: graph.edges().to_vec(),
        statistics: calculate_network_statistics(graph),
        metadata: Some(ExportMetadata::now(graph.node_count())),
    }
}

/// Write an export as pretty JSON, creating parent directories.
pub fn save_export(export: &ExportedNetwork, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let json = serde_json::to_string_pretty(export)
        .map_err(|e| Error::serialization(format!("Failed to serialize network: {e}")))?;
    std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;

    log::info!(
        "Saved network export ({} nodes, {} edges) to {}",
        export.nodes.len(),
        export.edges.len(),
        path.display()
    );
    Ok(())
}

/// Read an export written by [`save_export`].
pub fn load_export(path: impl AsRef<Path>) -> Result<ExportedNetwork> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    load_export_from_str(&json)
}

/// Parse an export from a JSON string.
pub fn load_export_from_str(json: &str) -> Result<ExportedNetwork> {
    serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse network export: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
