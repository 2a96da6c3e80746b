//! Maps model output back onto the canonical catalog and records the turn.

use std::collections::BTreeSet;

use crate::catalog::CatalogItem;
use crate::error::FilterError;
use crate::session::SessionStore;

/// Catalog items selected by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// Selected items in catalog order.
    pub items: Vec<CatalogItem>,
    /// Identifiers that matched nothing in the catalog, in the order given.
    pub unknown_ids: Vec<String>,
}

impl Reconciled {
    pub fn ids(&self) -> BTreeSet<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

pub struct ResultReconciler;

impl ResultReconciler {
    /// Items of `catalog` named by `ids`. Output follows catalog order, not
    /// `ids` order, and never contains an item absent from `catalog`.
    pub fn reconcile(catalog: &[CatalogItem], ids: &[String]) -> Reconciled {
        let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let items: Vec<CatalogItem> = catalog
            .iter()
            .filter(|item| wanted.contains(item.id.as_str()))
            .cloned()
            .collect();

        let known: BTreeSet<&str> = catalog.iter().map(|item| item.id.as_str()).collect();
        let mut unknown_ids = Vec::new();
        for id in ids {
            if !known.contains(id.as_str()) && !unknown_ids.contains(id) {
                unknown_ids.push(id.clone());
            }
        }

        Reconciled { items, unknown_ids }
    }

    /// Records a completed filter: appends `prompt` when given and replaces
    /// the seen set. Failures are returned, not raised.
    pub async fn persist(
        store: &dyn SessionStore,
        owner: &str,
        prompt: Option<&str>,
        seen_ids: &BTreeSet<String>,
    ) -> Vec<FilterError> {
        let mut failures = Vec::new();
        if let Some(prompt) = prompt {
            if let Err(error) = store.append_prompt(owner, prompt).await {
                failures.push(error);
            }
        }
        if let Err(error) = store.write_seen_ids(owner, seen_ids).await {
            failures.push(error);
        }
        failures
    }

    /// Returns the session to its empty state.
    pub async fn clear(store: &dyn SessionStore, owner: &str) -> Vec<FilterError> {
        let mut failures = Vec::new();
        if let Err(error) = store.clear_prompts(owner).await {
            failures.push(error);
        }
        if let Err(error) = store.clear_seen_ids(owner).await {
            failures.push(error);
        }
        failures
    }
}
