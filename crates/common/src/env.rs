//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the store is first touched.

use std::path::Path;

use tracing::warn;

/// Warn when the static UI directory is missing and make sure the directory
/// holding the data file exists.
pub async fn ensure_env(static_dir: &str, data_file: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static UI directory not found; only the JSON API will be served");
    }
    if let Some(data_dir) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    }
    Ok(())
}
