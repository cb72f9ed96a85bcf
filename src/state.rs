use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The single key-value pair the gate screen externalizes across an
/// interruption: the app id to hand off to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub target_app_id: String,
}

impl SavedState {
    pub async fn store(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string(self)?).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Missing or unreadable state restores the default (empty app id).
    pub async fn restore(path: &Path) -> SavedState {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("discarding corrupt state file {}: {:#}", path.display(), e);
                SavedState::default()
            }),
            Err(_) => SavedState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_restores_app_id_verbatim() -> Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("gate_state.json");

        let state = SavedState {
            target_app_id: "com.example.app".to_string(),
        };
        state.store(&path).await?;

        let restored = SavedState::restore(&path).await;
        assert_eq!(restored, state);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_restores_empty_app_id() -> Result<()> {
        let tmpdir = TempDir::new()?;
        let restored = SavedState::restore(&tmpdir.path().join("absent.json")).await;
        assert_eq!(restored.target_app_id, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_restores_empty_app_id() -> Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("gate_state.json");
        tokio::fs::write(&path, "{not json").await?;

        let restored = SavedState::restore(&path).await;
        assert_eq!(restored, SavedState::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_store_creates_parent_directory() -> Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("nested/dir/gate_state.json");

        let state = SavedState {
            target_app_id: "com.example.app".to_string(),
        };
        state.store(&path).await?;

        assert_eq!(SavedState::restore(&path).await, state);
        Ok(())
    }
}
