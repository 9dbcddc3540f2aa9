//! Kenning Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Kenning crates.
//! It has no internal Kenning dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction
//! - [`util`]: Path utilities

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigProvider;
