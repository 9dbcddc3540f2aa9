//! CLI argument parsing and command definitions.
//!
//! Global flags (config path, verbosity) plus the `graph` and `config`
//! command families.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level arguments for the `kenning` binary.
#[derive(Parser, Debug)]
#[command(name = "kenning", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "KENNING_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Print version information.
    Version,

    /// Check that the concept database loads and builds.
    Health,

    /// Concept graph operations.
    Graph(GraphCommand),

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "engine.search_limit").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "concepts.path").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

/// Graph-specific subcommands.
#[derive(Parser, Debug)]
pub struct GraphCommand {
    /// Graph subcommand to execute.
    #[command(subcommand)]
    pub command: GraphSubcommand,
}

/// Available graph subcommands.
#[derive(Subcommand, Debug)]
pub enum GraphSubcommand {
    /// Build the concept graph and write a network export.
    Build {
        /// Concept database to read (defaults to the configured path).
        #[arg(long)]
        concepts: Option<String>,

        /// Output file path for the export.
        #[arg(short, long)]
        output: Option<String>,

        /// Build and report without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run integrity checks.
    Validate,

    /// Show network statistics.
    Stats,

    /// Query one concept.
    Query {
        /// Concept id to query.
        #[arg(short, long)]
        id: String,

        /// Type of query: details, related, shortest, optimal.
        #[arg(short = 't', long, default_value = "related")]
        query_type: String,

        /// Target concept id (for shortest and optimal).
        #[arg(long)]
        to: Option<String>,
    },

    /// Find a learning path between two concepts by title.
    Path {
        /// Starting concept title (substring match).
        #[arg(long)]
        from: String,

        /// Goal concept title (substring match).
        #[arg(long)]
        to: String,
    },

    /// Search concepts by title, category, or tag.
    Search {
        /// Text to search for.
        query: String,
    },

    /// Recommend concepts to study next.
    Recommend {
        /// Concept id to start from.
        #[arg(short, long)]
        id: String,

        /// Learner level (defaults to the configured level).
        #[arg(short, long)]
        level: Option<i32>,

        /// Maximum number of recommendations.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List concept clusters.
    Clusters,

    /// Print the visualization network as JSON.
    Network {
        /// Only include concepts in this category.
        #[arg(long)]
        category: Option<String>,

        /// Only include these connection types (comma-separated).
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_command(argv: &[&str]) -> GraphSubcommand {
        let mut full = vec!["kenning", "graph"];
        full.extend_from_slice(argv);
        match CliArgs::parse_from(full).command {
            Some(BaseCommand::Graph(GraphCommand { command })) => command,
            other => panic!("Expected graph command, got {other:?}"),
        }
    }

    fn config_action(argv: &[&str]) -> ConfigAction {
        let mut full = vec!["kenning", "config"];
        full.extend_from_slice(argv);
        match CliArgs::parse_from(full).command {
            Some(BaseCommand::Config(ConfigCommand { command })) => command,
            other => panic!("Expected config command, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Global flags
    // ------------------------------------------------------------------------

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["kenning"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_flags() {
        let args = CliArgs::parse_from(["kenning", "-v", "--config", "/tmp/k.toml", "health"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/tmp/k.toml"));
        assert!(matches!(args.command, Some(BaseCommand::Health)));

        let args = CliArgs::parse_from(["kenning", "--quiet", "version"]);
        assert!(args.quiet);
        assert!(matches!(args.command, Some(BaseCommand::Version)));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(CliArgs::try_parse_from(["kenning", "serve"]).is_err());
        assert!(CliArgs::try_parse_from(["kenning", "graph", "query"]).is_err());
    }

    // ------------------------------------------------------------------------
    // Graph commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_graph_build_defaults() {
        match graph_command(&["build"]) {
            GraphSubcommand::Build {
                concepts,
                output,
                dry_run,
            } => {
                assert!(concepts.is_none());
                assert!(output.is_none());
                assert!(!dry_run);
            }
            other => panic!("Expected build, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_build_with_options() {
        match graph_command(&[
            "build",
            "--concepts",
            "c.json",
            "-o",
            "out.json",
            "--dry-run",
        ]) {
            GraphSubcommand::Build {
                concepts,
                output,
                dry_run,
            } => {
                assert_eq!(concepts.as_deref(), Some("c.json"));
                assert_eq!(output.as_deref(), Some("out.json"));
                assert!(dry_run);
            }
            other => panic!("Expected build, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_validate_and_stats() {
        assert!(matches!(graph_command(&["validate"]), GraphSubcommand::Validate));
        assert!(matches!(graph_command(&["stats"]), GraphSubcommand::Stats));
        assert!(matches!(graph_command(&["clusters"]), GraphSubcommand::Clusters));
    }

    #[test]
    fn test_graph_query_defaults_to_related() {
        match graph_command(&["query", "--id", "linear"]) {
            GraphSubcommand::Query { id, query_type, to } => {
                assert_eq!(id, "linear");
                assert_eq!(query_type, "related");
                assert!(to.is_none());
            }
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_query_optimal() {
        match graph_command(&["query", "--id", "a", "-t", "optimal", "--to", "b"]) {
            GraphSubcommand::Query { id, query_type, to } => {
                assert_eq!(id, "a");
                assert_eq!(query_type, "optimal");
                assert_eq!(to.as_deref(), Some("b"));
            }
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_path() {
        match graph_command(&["path", "--from", "Linear", "--to", "Projectile Motion"]) {
            GraphSubcommand::Path { from, to } => {
                assert_eq!(from, "Linear");
                assert_eq!(to, "Projectile Motion");
            }
            other => panic!("Expected path, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_search() {
        match graph_command(&["search", "quadratic eq"]) {
            GraphSubcommand::Search { query } => assert_eq!(query, "quadratic eq"),
            other => panic!("Expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_recommend() {
        match graph_command(&["recommend", "--id", "linear"]) {
            GraphSubcommand::Recommend { id, level, limit } => {
                assert_eq!(id, "linear");
                assert!(level.is_none());
                assert!(limit.is_none());
            }
            other => panic!("Expected recommend, got {other:?}"),
        }

        match graph_command(&["recommend", "-i", "linear", "-l", "7", "--limit", "3"]) {
            GraphSubcommand::Recommend { level, limit, .. } => {
                assert_eq!(level, Some(7));
                assert_eq!(limit, Some(3));
            }
            other => panic!("Expected recommend, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_network_filters() {
        match graph_command(&["network"]) {
            GraphSubcommand::Network { category, types } => {
                assert!(category.is_none());
                assert!(types.is_empty());
            }
            other => panic!("Expected network, got {other:?}"),
        }

        match graph_command(&[
            "network",
            "--category",
            "algebra",
            "--types",
            "prerequisite,application",
        ]) {
            GraphSubcommand::Network { category, types } => {
                assert_eq!(category.as_deref(), Some("algebra"));
                assert_eq!(types, vec!["prerequisite", "application"]);
            }
            other => panic!("Expected network, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Config commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_config_path_and_get() {
        assert!(matches!(config_action(&["path"]), ConfigAction::Path));
        match config_action(&["get", "engine.damping"]) {
            ConfigAction::Get { key } => assert_eq!(key, "engine.damping"),
            other => panic!("Expected get, got {other:?}"),
        }
    }

    #[test]
    fn test_config_set() {
        match config_action(&["set", "engine.search_limit", "20"]) {
            ConfigAction::Set { key, value } => {
                assert_eq!(key, "engine.search_limit");
                assert_eq!(value, "20");
            }
            other => panic!("Expected set, got {other:?}"),
        }
    }

    #[test]
    fn test_config_init() {
        match config_action(&["init", "--file", "/tmp/k.toml", "--force"]) {
            ConfigAction::Init { file, force } => {
                assert_eq!(file.as_deref(), Some("/tmp/k.toml"));
                assert!(force);
            }
            other => panic!("Expected init, got {other:?}"),
        }
    }

    #[test]
    fn test_config_export() {
        match config_action(&["export", "--docker-env"]) {
            ConfigAction::Export { docker_env } => assert!(docker_env),
            other => panic!("Expected export, got {other:?}"),
        }
    }
}
