use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::state::SessionState;
use super::store::SessionStore;
use crate::error::{FilterError, Result};

/// One JSON document per owner under `<root>/sessions/`.
#[derive(Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn build_path(&self, owner: &str) -> Result<PathBuf> {
        validate_key(owner)?;
        let mut path = self.root.join("sessions");
        path.push(format!("{owner}.json"));
        Ok(path)
    }

    async fn ensure_parent_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                FilterError::Persistence(format!(
                    "failed to create session directory {}: {error}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }

    async fn load(&self, owner: &str) -> Result<SessionState> {
        let path = self.build_path(owner)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionState::default())
            }
            Err(error) => {
                return Err(FilterError::Persistence(format!(
                    "failed to read session file {}: {error}",
                    path.display()
                )))
            }
        };
        serde_json::from_slice(&bytes)
            .map_err(|error| FilterError::Persistence(format!("session parse error: {error}")))
    }

    async fn save(&self, owner: &str, state: &SessionState) -> Result<()> {
        let path = self.build_path(owner)?;
        if state.is_empty() {
            return match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(FilterError::Persistence(format!(
                    "failed to remove session file {}: {error}",
                    path.display()
                ))),
            };
        }
        Self::ensure_parent_dir(&path).await?;
        let serialized = serde_json::to_vec_pretty(state).map_err(|error| {
            FilterError::Persistence(format!("session serialize error: {error}"))
        })?;
        tokio::fs::write(&path, serialized).await.map_err(|error| {
            FilterError::Persistence(format!(
                "failed to write session file {}: {error}",
                path.display()
            ))
        })
    }

    async fn modify<F>(&self, owner: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SessionState) + Send,
    {
        let mut state = self.load(owner).await?;
        apply(&mut state);
        self.save(owner, &state).await
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read_prompts(&self, owner: &str) -> Result<Vec<String>> {
        Ok(self.load(owner).await?.prompts)
    }

    async fn append_prompt(&self, owner: &str, prompt: &str) -> Result<()> {
        if prompt.trim().is_empty() {
            return Ok(());
        }
        self.modify(owner, |state| state.prompts.push(prompt.to_string()))
            .await
    }

    async fn clear_prompts(&self, owner: &str) -> Result<()> {
        self.modify(owner, |state| state.prompts.clear()).await
    }

    async fn read_seen_ids(&self, owner: &str) -> Result<BTreeSet<String>> {
        Ok(self.load(owner).await?.seen_ids)
    }

    async fn write_seen_ids(&self, owner: &str, ids: &BTreeSet<String>) -> Result<()> {
        self.modify(owner, |state| state.seen_ids = ids.clone()).await
    }

    async fn clear_seen_ids(&self, owner: &str) -> Result<()> {
        self.modify(owner, |state| state.seen_ids.clear()).await
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(FilterError::InvalidInput(format!("invalid owner key {key:?}")));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(FilterError::InvalidInput(format!("invalid owner key {key:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_and_reads_session() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        store.append_prompt("owner-1", "fall").await.expect("append");
        store.append_prompt("owner-1", "men").await.expect("append");
        let ids: BTreeSet<String> = ["b", "a"].iter().map(|id| id.to_string()).collect();
        store.write_seen_ids("owner-1", &ids).await.expect("write");

        let reopened = FileSessionStore::new(dir.path().to_path_buf());
        assert_eq!(
            reopened.read_prompts("owner-1").await.expect("read"),
            vec!["fall".to_string(), "men".to_string()]
        );
        assert_eq!(reopened.read_seen_ids("owner-1").await.expect("read"), ids);

        let raw = std::fs::read_to_string(dir.path().join("sessions").join("owner-1.json"))
            .expect("file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["seen_ids"], serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        assert!(store.read_prompts("ghost").await.expect("read").is_empty());
        assert!(store.read_seen_ids("ghost").await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn clearing_removes_file() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        store.append_prompt("owner", "fall").await.expect("append");
        store.clear_prompts("owner").await.expect("clear");
        store.clear_seen_ids("owner").await.expect("clear");
        assert!(!dir.path().join("sessions").join("owner.json").exists());
    }

    #[tokio::test]
    async fn invalid_key_rejected() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        let err = store
            .append_prompt("../escape", "fall")
            .await
            .expect_err("invalid key");
        match err {
            FilterError::InvalidInput(_) => {}
            _ => panic!("expected invalid input"),
        }
    }

    #[tokio::test]
    async fn corrupt_file_is_persistence_error() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("sessions")).expect("mkdir");
        std::fs::write(dir.path().join("sessions").join("owner.json"), b"{not json")
            .expect("write");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        let err = store.read_prompts("owner").await.expect_err("corrupt");
        assert!(matches!(err, FilterError::Persistence(_)));
    }
}
