//! Multi-turn catalog filtering.
//!
//! One call runs a strict pipeline under the owner's lock: read session,
//! build context, resolve intent, dispatch or match, reconcile, persist.
//! Every failure degrades to a usable item list plus a warning.

use std::collections::BTreeSet;
use std::sync::Arc;

use refine_llm::LlmProvider;

use crate::catalog::CatalogItem;
use crate::config::FilterConfig;
use crate::context::{ContextBuilder, ContextInput};
use crate::error::FilterError;
use crate::intent::{IntentResolver, ModelResult};
use crate::reconcile::ResultReconciler;
use crate::session::{OwnerLocks, SharedSessionStore};
use crate::tools::ToolDispatcher;


/// Input of one filter invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub query: Option<String>,
    pub reset: bool,
}

impl FilterRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            reset: false,
        }
    }

    /// A request with no query, which clears the session.
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// The trimmed query, or `None` when it is missing or blank.
    pub fn normalized_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }
}

/// Items to show plus the non-fatal failures met on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResponse {
    pub items: Vec<CatalogItem>,
    pub warnings: Vec<FilterError>,
}

pub struct CatalogFilter {
    store: SharedSessionStore,
    resolver: IntentResolver,
    context: ContextBuilder,
    dispatcher: ToolDispatcher,
    locks: OwnerLocks,
}

impl CatalogFilter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        store: SharedSessionStore,
        config: FilterConfig,
    ) -> Self {
        Self {
            store,
            resolver: IntentResolver::new(provider, config.upstream_timeout),
            context: ContextBuilder::new(),
            dispatcher: ToolDispatcher::new(config.numeric_base),
            locks: OwnerLocks::new(),
        }
    }

    pub fn with_context_builder(mut self, context: ContextBuilder) -> Self {
        self.context = context;
        self
    }

    pub fn with_resolver(mut self, resolver: IntentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Narrows `catalog` for `owner` using the request and the owner's
    /// session history. Never fails: the worst case is the unfiltered catalog.
    pub async fn filter_catalog(
        &self,
        owner: &str,
        catalog: &[CatalogItem],
        request: FilterRequest,
    ) -> FilterResponse {
        let _guard = self.locks.acquire(owner).await;
        let mut warnings = Vec::new();

        let Some(query) = request.normalized_query() else {
            self.record_failures(
                owner,
                ResultReconciler::clear(self.store.as_ref(), owner).await,
                &mut warnings,
            );
            tracing::info!("filter owner={} cleared session; returning full catalog", owner);
            return FilterResponse {
                items: catalog.to_vec(),
                warnings,
            };
        };

        let (prompts, seen_ids) = if request.reset {
            self.record_failures(
                owner,
                ResultReconciler::clear(self.store.as_ref(), owner).await,
                &mut warnings,
            );
            (Vec::new(), BTreeSet::new())
        } else {
            self.load_session(owner, &mut warnings).await
        };

        let messages = self.context.build(&ContextInput {
            catalog,
            prior_prompts: &prompts,
            seen_ids: &seen_ids,
            query,
        });
        tracing::debug!(
            "filter owner={} sending {} context messages",
            owner,
            messages.len()
        );

        let matched_ids: Vec<String> = match self.resolver.resolve(messages).await {
            Ok(ModelResult::Matched(result)) => result.matched_ids,
            Ok(ModelResult::ToolCall(invocation)) => {
                let base = self.dispatcher.base_set(catalog, &seen_ids);
                let selected = match self.dispatcher.dispatch(&invocation, &base) {
                    Ok(selected) => selected,
                    Err(error) => {
                        tracing::warn!(
                            "filter owner={} {}; keeping {} base items",
                            owner,
                            error,
                            base.len()
                        );
                        warnings.push(error);
                        base
                    }
                };
                selected.iter().map(|item| item.id.clone()).collect()
            }
            Err(error) => {
                tracing::warn!("filter owner={} {}; serving last known items", owner, error);
                warnings.push(error);
                return FilterResponse {
                    items: last_known_items(catalog, &seen_ids),
                    warnings,
                };
            }
        };

        let reconciled = ResultReconciler::reconcile(catalog, &matched_ids);
        if !reconciled.unknown_ids.is_empty() {
            tracing::warn!(
                "filter owner={} dropped {} identifiers not in catalog: {:?}",
                owner,
                reconciled.unknown_ids.len(),
                reconciled.unknown_ids
            );
        }

        let prompt = if request.reset { None } else { Some(query) };
        let failures =
            ResultReconciler::persist(self.store.as_ref(), owner, prompt, &reconciled.ids()).await;
        self.record_failures(owner, failures, &mut warnings);

        tracing::info!(
            "filter owner={} catalog={} prompts={} results={}",
            owner,
            catalog.len(),
            prompts.len(),
            reconciled.items.len()
        );
        FilterResponse {
            items: reconciled.items,
            warnings,
        }
    }

    async fn load_session(
        &self,
        owner: &str,
        warnings: &mut Vec<FilterError>,
    ) -> (Vec<String>, BTreeSet<String>) {
        let prompts = match self.store.read_prompts(owner).await {
            Ok(prompts) => prompts,
            Err(error) => {
                self.record_failures(owner, vec![error], warnings);
                Vec::new()
            }
        };
        let seen_ids = match self.store.read_seen_ids(owner).await {
            Ok(seen_ids) => seen_ids,
            Err(error) => {
                self.record_failures(owner, vec![error], warnings);
                BTreeSet::new()
            }
        };
        (prompts, seen_ids)
    }

    fn record_failures(
        &self,
        owner: &str,
        failures: Vec<FilterError>,
        warnings: &mut Vec<FilterError>,
    ) {
        for failure in failures {
            tracing::warn!("filter owner={} session store: {}", owner, failure);
            warnings.push(failure);
        }
    }
}

/// Items from the previous successful filter, or the whole catalog when
/// there are none.
fn last_known_items(catalog: &[CatalogItem], seen_ids: &BTreeSet<String>) -> Vec<CatalogItem> {
    let previous: Vec<CatalogItem> = catalog
        .iter()
        .filter(|item| seen_ids.contains(&item.id))
        .cloned()
        .collect();
    if previous.is_empty() {
        catalog.to_vec()
    } else {
        previous
    }
}
