//! Utility modules.
//!
//! - [`paths`]: Path helpers (tilde expansion)

pub mod paths;
