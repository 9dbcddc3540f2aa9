//! Path resolution utilities.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
///
/// Paths that do not start with `~` are returned unchanged.
///
/// # Example
///
/// ```
/// use kenning_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/concepts.json");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
