use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// Serializes filter invocations per owner.
///
/// A guard is held from the first session read to the last session write
/// of one invocation. Different owners never contend.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl OwnerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = match self.locks.lock() {
                Ok(table) => table,
                Err(poisoned) => poisoned.into_inner(),
            };
            // Entries nobody else references are idle.
            table.retain(|key, lock| key == owner || Arc::strong_count(lock) > 1);
            table.entry(owner.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub fn tracked_owners(&self) -> usize {
        match self.locks.lock() {
            Ok(table) => table.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
