//! In-memory session store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::state::SessionState;
use super::store::SessionStore;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one owner's state, empty when the owner has none.
    pub async fn snapshot(&self, owner: &str) -> SessionState {
        self.sessions
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn owner_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn update<F>(&self, owner: &str, apply: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut guard = self.sessions.write().await;
        let state = guard.entry(owner.to_string()).or_default();
        apply(state);
        if state.is_empty() {
            guard.remove(owner);
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read_prompts(&self, owner: &str) -> Result<Vec<String>> {
        Ok(self.snapshot(owner).await.prompts)
    }

    async fn append_prompt(&self, owner: &str, prompt: &str) -> Result<()> {
        if prompt.trim().is_empty() {
            return Ok(());
        }
        self.update(owner, |state| state.prompts.push(prompt.to_string()))
            .await;
        Ok(())
    }

    async fn clear_prompts(&self, owner: &str) -> Result<()> {
        self.update(owner, |state| state.prompts.clear()).await;
        Ok(())
    }

    async fn read_seen_ids(&self, owner: &str) -> Result<BTreeSet<String>> {
        Ok(self.snapshot(owner).await.seen_ids)
    }

    async fn write_seen_ids(&self, owner: &str, ids: &BTreeSet<String>) -> Result<()> {
        self.update(owner, |state| state.seen_ids = ids.clone()).await;
        Ok(())
    }

    async fn clear_seen_ids(&self, owner: &str) -> Result<()> {
        self.update(owner, |state| state.seen_ids.clear()).await;
        Ok(())
    }
}
