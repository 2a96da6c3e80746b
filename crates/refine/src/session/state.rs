use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-owner filtering history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionState {
    /// Queries in the order they were issued.
    #[serde(default)]
    pub prompts: Vec<String>,
    /// Identifiers surfaced by the most recent successful filter.
    #[serde(default)]
    pub seen_ids: BTreeSet<String>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty() && self.seen_ids.is_empty()
    }
}
