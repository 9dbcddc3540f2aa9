//! Core traits for Kenning configuration.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where an
//! application keeps its concept database and generated graph files.

use std::path::PathBuf;

use crate::Result;

/// Trait for application configuration.
///
/// Every Kenning front end implements this trait to tell the graph
/// tooling where its data lives.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use kenning_core::traits::ConfigProvider;
/// use kenning_core::Result;
///
/// #[derive(Clone)]
/// struct SiteConfig {
///     data_dir: PathBuf,
/// }
///
/// impl ConfigProvider for SiteConfig {
///     fn project_name(&self) -> &str {
///         "math-site"
///     }
///
///     fn base_path(&self) -> Result<PathBuf> {
///         Ok(self.data_dir.clone())
///     }
///
///     fn concepts_path(&self) -> Result<PathBuf> {
///         Ok(self.data_dir.join("concepts.json"))
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// Base path for all project data.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn base_path(&self) -> Result<PathBuf>;

    /// Path to the concept database (a JSON file).
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved.
    fn concepts_path(&self) -> Result<PathBuf>;

    /// Default location for exported graph files.
    fn graph_output_path(&self) -> Result<PathBuf> {
        Ok(self.base_path()?.join("data").join("graphs").join("network.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        name: String,
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            &self.name
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.base.clone())
        }

        fn concepts_path(&self) -> Result<PathBuf> {
            Ok(self.base.join("concepts.json"))
        }
    }

    #[test]
    fn test_config_provider_project_name() {
        let config = TestConfig {
            name: "test-project".into(),
            base: PathBuf::from("/tmp/test"),
        };
        assert_eq!(config.project_name(), "test-project");
    }

    #[test]
    fn test_config_provider_concepts_path() {
        let config = TestConfig {
            name: "test".into(),
            base: PathBuf::from("/data"),
        };
        let path = config.concepts_path().unwrap();
        assert_eq!(path, PathBuf::from("/data/concepts.json"));
    }

    #[test]
    fn test_config_provider_default_graph_output_path() {
        let config = TestConfig {
            name: "test".into(),
            base: PathBuf::from("/project"),
        };
        assert_eq!(
            config.graph_output_path().unwrap(),
            PathBuf::from("/project/data/graphs/network.json")
        );
    }

    #[test]
    fn test_config_provider_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestConfig>();
    }
}
