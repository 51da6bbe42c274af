//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist before a store
//! touches the filesystem.

use std::path::Path;

use tracing::warn;

/// Ensure the parent directory of a data file exists; create it if missing.
pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if std::fs::metadata(parent).is_err() {
        warn!(parent = %parent.display(), "data directory not found; creating");
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    Ok(())
}
