//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use std::path::Path;

use tracing::warn;

/// Warn when the static frontend directory is missing; requests that fall
/// through to static assets will 404 in that case.
pub async fn ensure_env(frontend_dir: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(frontend_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            warn!(frontend_dir = %frontend_dir.display(), "frontend path is not a directory; static assets may 404");
        }
        Err(_) => {
            warn!(frontend_dir = %frontend_dir.display(), "frontend assets directory not found; static assets may 404");
        }
    }
    Ok(())
}
