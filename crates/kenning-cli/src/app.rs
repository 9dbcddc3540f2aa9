//! The `kenning` application: logging setup and command dispatch.

use crate::cli::{BaseCommand, CliArgs, GraphSubcommand};
use crate::config::KenningConfig;
use crate::config_handlers;
use crate::graph_handlers::{self, BuildOptions, NetworkOptions, QueryOptions, RecommendOptions};
use kenning_core::Result;
use kenning_core::traits::ConfigProvider;
use kenning_graph::stats::quick_summary;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// KenningCli
// ============================================================================

/// The CLI application, holding its loaded configuration.
pub struct KenningCli {
    name: String,
    config: Arc<KenningConfig>,
    version: String,
}

impl KenningCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = KenningConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create an application around an already-loaded config.
    pub fn new(config: KenningConfig) -> Self {
        Self {
            name: config.project_name().to_string(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &KenningConfig {
        &self.config
    }

    /// Install the tracing subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise `--quiet` means `warn`,
    /// `--verbose` means `debug`, and the default is `info`. Records from
    /// the `log` facade used by the library crates are bridged through.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);
        tracing::debug!(project = %self.name, "starting");

        match args.command {
            Some(BaseCommand::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(BaseCommand::Health) => self.health().await,
            Some(BaseCommand::Graph(graph_cmd)) => self.handle_graph(graph_cmd.command).await,
            Some(BaseCommand::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {} (use --help for usage)", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Load the concept database and build the engine once.
    async fn health(&self) -> Result<()> {
        let engine = graph_handlers::load_engine(&self.config, None)?;
        println!("{}: healthy ({})", self.name, quick_summary(engine.graph()));
        Ok(())
    }

    async fn handle_graph(&self, command: GraphSubcommand) -> Result<()> {
        let config = &*self.config;
        match command {
            GraphSubcommand::Build {
                concepts,
                output,
                dry_run,
            } => {
                let options = BuildOptions {
                    concepts,
                    output,
                    dry_run,
                };
                graph_handlers::handle_build(config, options).await
            }
            GraphSubcommand::Validate => graph_handlers::handle_validate(config).await,
            GraphSubcommand::Stats => graph_handlers::handle_stats(config).await,
            GraphSubcommand::Query { id, query_type, to } => {
                let options = QueryOptions { id, query_type, to };
                graph_handlers::handle_query(config, options).await
            }
            GraphSubcommand::Path { from, to } => {
                graph_handlers::handle_path(config, &from, &to).await
            }
            GraphSubcommand::Search { query } => {
                graph_handlers::handle_search(config, &query).await
            }
            GraphSubcommand::Recommend { id, level, limit } => {
                let options = RecommendOptions { id, level, limit };
                graph_handlers::handle_recommend(config, options).await
            }
            GraphSubcommand::Clusters => graph_handlers::handle_clusters(config).await,
            GraphSubcommand::Network { category, types } => {
                let options = NetworkOptions { category, types };
                graph_handlers::handle_network(config, options).await
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const CONCEPTS_JSON: &str = r#"[
        {"id": "a", "title": "Alpha", "category": "x", "difficulty_range": [1, 2], "connections": ["b"]},
        {"id": "b", "title": "Beta", "category": "x", "difficulty_range": [5, 6]}
    ]"#;

    /// A temp project with a concept database at the default location.
    fn project() -> (TempDir, KenningConfig) {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/concepts.json"), CONCEPTS_JSON).unwrap();
        let config = KenningConfig {
            base_path: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        (dir, config)
    }

    fn parse(argv: &[&str]) -> CliArgs {
        let mut full = vec!["kenning"];
        full.extend_from_slice(argv);
        CliArgs::parse_from(full)
    }

    #[test]
    fn test_kenning_cli_new() {
        let cli = KenningCli::new(KenningConfig::default()).with_version("1.2.3");
        assert_eq!(cli.name, "kenning");
        assert_eq!(cli.version, "1.2.3");
        assert_eq!(cli.config().project_name(), "kenning");
    }

    #[test]
    fn test_kenning_cli_from_args_with_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "project_name = \"from-file\"\n").unwrap();

        let cli = KenningCli::from_args(&parse(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(cli.name, "from-file");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let cli = KenningCli::new(KenningConfig::default());
        cli.init_logging(false, false);
        cli.init_logging(true, false);
        cli.init_logging(false, true);
    }

    #[tokio::test]
    async fn test_run_version_and_no_command() {
        let cli = KenningCli::new(KenningConfig::default());
        assert!(cli.run(parse(&["version"])).await.is_ok());
        assert!(cli.run(parse(&[])).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_health() {
        let (_dir, config) = project();
        let cli = KenningCli::new(config);
        assert!(cli.run(parse(&["health"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_health_without_database() {
        let dir = TempDir::new().unwrap();
        let cli = KenningCli::new(KenningConfig {
            base_path: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        });
        assert!(cli.run(parse(&["health"])).await.is_err());
    }

    #[tokio::test]
    async fn test_run_graph_commands() {
        let (dir, config) = project();
        let cli = KenningCli::new(config);

        let commands: [&[&str]; 9] = [
            &["graph", "build"],
            &["graph", "validate"],
            &["graph", "stats"],
            &["graph", "query", "--id", "a", "-t", "optimal", "--to", "b"],
            &["graph", "path", "--from", "alpha", "--to", "beta"],
            &["graph", "search", "alp"],
            &["graph", "recommend", "--id", "a", "--level", "4"],
            &["graph", "clusters"],
            &["graph", "network", "--types", "prerequisite"],
        ];
        for argv in commands {
            let result = cli.run(parse(argv)).await;
            assert!(result.is_ok(), "{argv:?} failed: {result:?}");
        }
        assert!(dir.path().join("data/graphs/network.json").exists());
    }

    #[tokio::test]
    async fn test_run_config_command() {
        let cli = KenningCli::new(KenningConfig::default());
        assert!(cli.run(parse(&["config", "path"])).await.is_ok());
    }
}
