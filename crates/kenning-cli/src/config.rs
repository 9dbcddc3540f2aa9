//! Configuration for the `kenning` CLI.
//!
//! Provides the [`KenningConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `KENNING_CONFIG` environment variable
//! 3. XDG default: `~/.config/kenning/config.toml`
//! 4. Built-in defaults
//!
//! `KENNING_*` environment variables are overlaid on top of whichever
//! file was found.

use confyg::{Confygery, env};
use kenning_core::traits::ConfigProvider;
use kenning_core::util::paths::expand_tilde;
use kenning_core::{Error, Result};
use kenning_graph::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "KENNING_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the `kenning` CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KenningConfig {
    /// Project name, used for env var prefixes and default paths.
    pub project_name: String,

    /// Base path for all project data.
    pub base_path: Option<String>,

    /// Concept database location.
    pub concepts: ConceptsConfig,

    /// Graph export configuration.
    pub graph: GraphConfig,

    /// Engine tuning.
    pub engine: EngineConfig,
}

/// Concept database configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptsConfig {
    /// Path to the concept JSON file.
    pub path: Option<String>,
}

/// Graph export configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Where `graph build` writes the network export.
    pub output_path: Option<String>,
}

impl Default for KenningConfig {
    fn default() -> Self {
        Self {
            project_name: "kenning".to_string(),
            base_path: None,
            concepts: ConceptsConfig::default(),
            graph: GraphConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl KenningConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("KENNING");
        env_opts.add_section("concepts");
        env_opts.add_section("graph");
        env_opts.add_section("engine");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kenning").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `KENNING_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "KENNING", &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for KenningConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn base_path(&self) -> Result<PathBuf> {
        match &self.base_path {
            Some(p) => Ok(expand_tilde(p)),
            None => std::env::current_dir()
                .map_err(|e| Error::config(format!("Could not determine base path: {e}"))),
        }
    }

    fn concepts_path(&self) -> Result<PathBuf> {
        match &self.concepts.path {
            Some(p) => Ok(expand_tilde(p)),
            None => Ok(self.base_path()?.join("data").join("concepts.json")),
        }
    }

    fn graph_output_path(&self) -> Result<PathBuf> {
        match &self.graph.output_path {
            Some(p) => Ok(expand_tilde(p)),
            None => Ok(self
                .base_path()?
                .join("data")
                .join("graphs")
                .join("network.json")),
        }
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
