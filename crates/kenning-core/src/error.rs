//! Error types for Kenning operations.
//!
//! This module provides the common `Error` type and `Result<T>` alias used
//! across all Kenning crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in Kenning operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoWithPath {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Item not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// File not found.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid data or format.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An operation could not be completed.
    #[error("Operation failed: {0}")]
    Operation(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound(path.as_ref().to_path_buf())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an operation error.
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Wrap a bare I/O error.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Wrap an I/O error with the path that caused it.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// True if this error means something was missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::FileNotFound(_) => true,
            Self::Io(e) | Self::IoWithPath { source: e, .. } => {
                e.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Result type alias using Kenning's Error type.
pub type Result<T> = std::result::Result<T, Error>;
