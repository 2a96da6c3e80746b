use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Persistence for filtering sessions, keyed by owner identity.
///
/// Implementations never expose one owner's records to another. Missing
/// records read as empty.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn read_prompts(&self, owner: &str) -> Result<Vec<String>>;

    /// Appends `prompt` to the owner's history. Blank prompts are ignored.
    async fn append_prompt(&self, owner: &str, prompt: &str) -> Result<()>;

    async fn clear_prompts(&self, owner: &str) -> Result<()>;

    async fn read_seen_ids(&self, owner: &str) -> Result<BTreeSet<String>>;

    /// Replaces the owner's seen set.
    async fn write_seen_ids(&self, owner: &str, ids: &BTreeSet<String>) -> Result<()>;

    async fn clear_seen_ids(&self, owner: &str) -> Result<()>;
}

pub type SharedSessionStore = Arc<dyn SessionStore>;
