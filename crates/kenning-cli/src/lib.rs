//! Command-line front end for the Kenning concept network engine.
//!
//! # Modules
//!
//! - [`cli`]: clap argument and subcommand definitions
//! - [`config`]: [`KenningConfig`], loaded with `confyg`
//! - [`app`]: [`KenningCli`], logging setup and dispatch
//! - [`graph_handlers`]: `kenning graph ...`
//! - [`config_handlers`]: `kenning config ...`

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod graph_handlers;

pub use app::KenningCli;
pub use cli::CliArgs;
pub use config::KenningConfig;
