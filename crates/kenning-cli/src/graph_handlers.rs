//! Handler functions for `kenning graph` commands.
//!
//! Every handler loads the configured concept database, builds a
//! [`ConceptNetworkEngine`] from it, and prints the answer to stdout.
//! `graph build` additionally writes the network export to disk.

use crate::config::KenningConfig;
use kenning_core::traits::ConfigProvider;
use kenning_core::{Error, Result};
use kenning_graph::paths::{path_cost, shortest_path};
use kenning_graph::stats::quick_summary;
use kenning_graph::{
    ConceptNetworkEngine, ConnectionType, NetworkFilter, load_concepts, save_export,
};
use std::path::PathBuf;

// ============================================================================
// Option types
// ============================================================================

/// Options for `graph build`.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Concept database (defaults to the configured path).
    pub concepts: Option<String>,
    /// Export file (defaults to the configured output path).
    pub output: Option<String>,
    /// If true, build and report without writing.
    pub dry_run: bool,
}

/// Options for `graph query`.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Concept id to query.
    pub id: String,
    /// One of `details`, `related`, `shortest`, `optimal`.
    pub query_type: String,
    /// Target id for path queries.
    pub to: Option<String>,
}

/// Options for `graph recommend`.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    /// Concept id to start from.
    pub id: String,
    /// Learner level; the configured default when absent.
    pub level: Option<i32>,
    /// List length; the configured default when absent.
    pub limit: Option<usize>,
}

/// Options for `graph network`.
#[derive(Debug, Clone, Default)]
pub struct NetworkOptions {
    /// Category to keep.
    pub category: Option<String>,
    /// Connection type names to keep; empty keeps all.
    pub types: Vec<String>,
}

// ============================================================================
// Engine loading
// ============================================================================

/// Load the concept database at `concepts` (or the configured path) and
/// build an engine with the configured parameters.
pub fn load_engine(config: &KenningConfig, concepts: Option<&str>) -> Result<ConceptNetworkEngine> {
    let path = match concepts {
        Some(p) => PathBuf::from(p),
        None => config.concepts_path()?,
    };
    let records = load_concepts(&path)?;
    let engine = ConceptNetworkEngine::with_config(&records, config.engine.clone())?;

    log::debug!(
        "Built engine from {}: {}",
        path.display(),
        quick_summary(engine.graph())
    );
    Ok(engine)
}

fn require_concept(engine: &ConceptNetworkEngine, id: &str) -> Result<()> {
    if engine.graph().contains_node(id) {
        Ok(())
    } else {
        Err(Error::not_found(format!("concept '{id}'")))
    }
}

fn title_of<'e>(engine: &'e ConceptNetworkEngine, id: &'e str) -> &'e str {
    engine.graph().get_node(id).map_or(id, |node| node.title())
}

// ============================================================================
// Handlers
// ============================================================================

/// Build the graph and write the network export.
pub async fn handle_build(config: &KenningConfig, options: BuildOptions) -> Result<()> {
    let engine = load_engine(config, options.concepts.as_deref())?;
    let output_path = match options.output {
        Some(ref p) => PathBuf::from(p),
        None => config.graph_output_path()?,
    };

    let report = engine.build_report();
    println!("Graph built:");
    println!("  Concepts:        {}", report.nodes_created);
    println!("  Connections:     {}", report.edges_created);
    if report.duplicate_connections > 0 {
        println!("  Duplicates:      {}", report.duplicate_connections);
    }
    if !report.dangling_refs.is_empty() {
        println!("  Dangling refs:   {}", report.dangling_refs.len());
    }
    if !report.self_refs.is_empty() {
        println!("  Self refs:       {}", report.self_refs.len());
    }

    if options.dry_run {
        println!("\nDry run: export not written.");
        return Ok(());
    }

    save_export(&engine.export_network_data(), &output_path)?;
    println!("\nNetwork saved to: {}", output_path.display());
    Ok(())
}

/// Run integrity checks. Fails if any check reports an error.
pub async fn handle_validate(config: &KenningConfig) -> Result<()> {
    let engine = load_engine(config, None)?;
    let result = engine.validate();

    if result.valid {
        println!("Graph is valid.");
    } else {
        println!("Graph has validation issues:");
    }

    let sections = [
        ("ERROR", &result.errors),
        ("WARN ", &result.warnings),
        ("INFO ", &result.info),
    ];
    for (label, issues) in sections {
        for issue in issues {
            println!("  {label} [{}]: {}", issue.code, issue.message);
            for node in &issue.nodes {
                println!("    - {node}");
            }
            for edge in &issue.edges {
                println!("    - {edge}");
            }
        }
    }

    println!(
        "\nSummary: {} error(s), {} warning(s), {} info",
        result.errors.len(),
        result.warnings.len(),
        result.info.len()
    );

    if result.valid {
        Ok(())
    } else {
        Err(Error::operation(format!(
            "Graph validation failed with {} error(s)",
            result.errors.len()
        )))
    }
}

/// Print network statistics.
pub async fn handle_stats(config: &KenningConfig) -> Result<()> {
    let engine = load_engine(config, None)?;
    let stats = engine.calculate_network_statistics();

    println!("Network Statistics");
    println!("==================");
    println!("Concepts:        {}", stats.total_nodes);
    println!("Connections:     {}", stats.total_edges);
    println!("Density:         {}%", stats.density);
    println!("Avg degree:      {}", stats.average_degree);
    println!("Categories:      {}", stats.categories);
    println!("Difficulty span: {}", stats.difficulty_span);
    println!("Orphans:         {}", stats.orphan_count);
    println!("Components:      {}", stats.component_count);

    if !stats.category_distribution.is_empty() {
        println!("\nCategories:");
        let mut cats: Vec<_> = stats.category_distribution.iter().collect();
        cats.sort_by(|a, b| b.1.cmp(a.1));
        for (cat, count) in cats {
            println!("  {cat}: {count}");
        }
    }

    if !stats.connection_type_distribution.is_empty() {
        println!("\nConnection types:");
        for (kind, count) in &stats.connection_type_distribution {
            println!("  {kind}: {count}");
        }
    }

    let top = engine.top_concepts_by_centrality(5);
    if !top.is_empty() {
        println!("\nMost central:");
        for (id, score) in &top {
            println!("  {:.3}  {} ({id})", score, title_of(&engine, id));
        }
    }

    Ok(())
}

/// Answer a query about one concept.
pub async fn handle_query(config: &KenningConfig, options: QueryOptions) -> Result<()> {
    let engine = load_engine(config, None)?;
    require_concept(&engine, &options.id)?;

    match options.query_type.as_str() {
        "details" => query_details(&engine, &options.id),
        "related" => query_related(&engine, &options.id),
        "shortest" | "optimal" => {
            let to = options.to.ok_or_else(|| {
                Error::config(format!("--to is required for {} queries", options.query_type))
            })?;
            require_concept(&engine, &to)?;
            let optimal = options.query_type == "optimal";
            query_path(&engine, &options.id, &to, optimal)
        }
        other => Err(Error::config(format!("Unknown query type: {other}"))),
    }
}

/// Find a learning path between two concepts named by title.
pub async fn handle_path(config: &KenningConfig, from: &str, to: &str) -> Result<()> {
    let mut engine = load_engine(config, None)?;

    match engine.find_learning_path(from, to) {
        Some(titles) => {
            println!("Learning path from '{from}' to '{to}':");
            for (i, title) in titles.iter().enumerate() {
                println!("  {}. {title}", i + 1);
            }
        }
        None => println!("No learning path found from '{from}' to '{to}'."),
    }
    Ok(())
}

/// Search concepts by text.
pub async fn handle_search(config: &KenningConfig, query: &str) -> Result<()> {
    let engine = load_engine(config, None)?;
    let results = engine.search_concepts(query);

    println!("Results for '{query}':");
    if results.is_empty() {
        println!("  (no matches)");
    }
    for summary in &results {
        println!(
            "  - {} ({}) [{}] difficulty {}-{}",
            summary.title,
            summary.id,
            summary.category,
            summary.difficulty_range.low,
            summary.difficulty_range.high
        );
    }
    Ok(())
}

/// Recommend what to study after a concept.
pub async fn handle_recommend(config: &KenningConfig, options: RecommendOptions) -> Result<()> {
    let engine = load_engine(config, None)?;
    require_concept(&engine, &options.id)?;

    let level = options.level.unwrap_or(config.engine.default_user_level);
    let limit = options.limit.unwrap_or(config.engine.max_recommendations);
    let recs = engine.generate_recommendations(&options.id, level, limit);

    println!(
        "Recommendations after '{}' (level {level}):",
        title_of(&engine, &options.id)
    );
    if recs.is_empty() {
        println!("  (none)");
    }
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "  {}. {} ({}) score {:.2}: {}",
            i + 1,
            rec.concept.title,
            rec.concept.id,
            rec.score,
            rec.reason
        );
    }
    Ok(())
}

/// List concept clusters.
pub async fn handle_clusters(config: &KenningConfig) -> Result<()> {
    let engine = load_engine(config, None)?;
    let clusters = engine.cluster_concepts();

    for cluster in &clusters {
        println!("{} ({} concepts)", cluster.id, cluster.concepts.len());
        for id in &cluster.concepts {
            println!("  - {}", title_of(&engine, id));
        }
    }
    println!("\n{} cluster(s)", clusters.len());
    Ok(())
}

/// Print the visualization network as JSON.
pub async fn handle_network(config: &KenningConfig, options: NetworkOptions) -> Result<()> {
    let filter = network_filter(&options)?;
    let engine = load_engine(config, None)?;
    let network = engine.build_concept_network(&filter);

    let json = serde_json::to_string_pretty(&network)
        .map_err(|e| Error::serialization(format!("Failed to serialize network: {e}")))?;
    println!("{json}");
    Ok(())
}

fn network_filter(options: &NetworkOptions) -> Result<NetworkFilter> {
    let mut filter = NetworkFilter::all();
    if let Some(ref category) = options.category {
        filter = filter.with_category(category.clone());
    }
    if !options.types.is_empty() {
        let types = options
            .types
            .iter()
            .map(|t| t.parse::<ConnectionType>())
            .collect::<Result<Vec<_>>>()?;
        filter = filter.with_connection_types(types);
    }
    Ok(filter)
}

// ============================================================================
// Query implementations
// ============================================================================

fn query_details(engine: &ConceptNetworkEngine, id: &str) -> Result<()> {
    let details = engine
        .get_concept_details(id)
        .ok_or_else(|| Error::not_found(format!("concept '{id}'")))?;

    let concept = &details.concept;
    println!("{} ({})", concept.title, concept.id);
    println!("  Category:    {}", concept.category);
    println!(
        "  Difficulty:  {}-{}",
        concept.difficulty_range.low, concept.difficulty_range.high
    );
    if !concept.tags.is_empty() {
        println!("  Tags:        {}", concept.tags.join(", "));
    }
    println!("  Centrality:  {:.3}", details.centrality);
    println!("  Degree:      {:.3}", details.degree_centrality);
    println!("  Betweenness: {:.3}", details.betweenness_centrality);
    println!("  Connections: {}", details.connection_count);
    Ok(())
}

fn query_related(engine: &ConceptNetworkEngine, id: &str) -> Result<()> {
    let details = engine
        .get_concept_details(id)
        .ok_or_else(|| Error::not_found(format!("concept '{id}'")))?;

    println!("Related to '{id}':");
    if details.connected_concepts.is_empty() {
        println!("  (no related concepts)");
    }
    for related in &details.connected_concepts {
        println!(
            "  - {} ({}) [{}]",
            related.title, related.id, related.connection_type
        );
    }
    println!("\n{} related concept(s)", details.connected_concepts.len());
    Ok(())
}

fn query_path(engine: &ConceptNetworkEngine, from: &str, to: &str, optimal: bool) -> Result<()> {
    let path = if optimal {
        engine.find_optimal_learning_path(from, to)
    } else {
        shortest_path(engine.graph(), from, to)
    };

    let Some(path) = path else {
        println!("No path found from '{from}' to '{to}'.");
        return Ok(());
    };

    println!("Path from '{from}' to '{to}':");
    for (i, id) in path.iter().enumerate() {
        if i > 0 {
            if let Some(edge) = engine.graph().edge_between(&path[i - 1], id) {
                println!("    --[{}]-->", edge.connection_type);
            }
        }
        println!("  {}. {} ({id})", i + 1, title_of(engine, id));
    }
    if let Some(cost) = path_cost(engine.graph(), &path) {
        println!("\nLearning cost: {cost:.2}");
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
