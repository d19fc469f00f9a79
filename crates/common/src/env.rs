//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before any store is opened.

use std::path::Path;

use tracing::info;

/// Ensure the parent directory of a file-backed store exists.
///
/// No-op for `None` or for bare file names without a directory component.
pub async fn ensure_data_dir(store_path: Option<&Path>) -> anyhow::Result<()> {
    let Some(parent) = store_path.and_then(Path::parent) else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "data directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("posts_env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("posts.json");
        ensure_data_dir(Some(&file)).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_noop() -> anyhow::Result<()> {
        ensure_data_dir(Some(Path::new("posts.json"))).await?;
        ensure_data_dir(None).await?;
        Ok(())
    }
}
