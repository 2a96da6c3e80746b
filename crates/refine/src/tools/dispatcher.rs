use std::collections::BTreeSet;

use crate::catalog::CatalogItem;
use crate::config::NumericBase;
use crate::error::{FilterError, Result};
use crate::intent::ToolInvocation;
use crate::tools::price::{price_between, price_greater_than, price_less_than};

/// Runs numeric tool invocations against the configured base set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolDispatcher {
    numeric_base: NumericBase,
}

impl ToolDispatcher {
    pub fn new(numeric_base: NumericBase) -> Self {
        Self { numeric_base }
    }

    /// Items a numeric tool narrows, in catalog order.
    ///
    /// With [`NumericBase::SeenSet`] this is the catalog restricted to the
    /// previous turn's identifiers; an empty seen set means the whole catalog.
    pub fn base_set<'a>(
        &self,
        catalog: &'a [CatalogItem],
        seen_ids: &BTreeSet<String>,
    ) -> Vec<&'a CatalogItem> {
        match self.numeric_base {
            NumericBase::SeenSet if !seen_ids.is_empty() => catalog
                .iter()
                .filter(|item| seen_ids.contains(&item.id))
                .collect(),
            _ => catalog.iter().collect(),
        }
    }

    /// Applies `invocation` to `base`. Unknown functions fail with
    /// [`FilterError::EmptyToolInvocation`]; callers fall back to `base`.
    pub fn dispatch<'a>(
        &self,
        invocation: &ToolInvocation,
        base: &[&'a CatalogItem],
    ) -> Result<Vec<&'a CatalogItem>> {
        let filtered = match invocation {
            ToolInvocation::PriceLessThan { upper } => price_less_than(base, *upper),
            ToolInvocation::PriceGreaterThan { lower } => price_greater_than(base, *lower),
            ToolInvocation::PriceBetween { lower, upper } => price_between(base, *lower, *upper),
            ToolInvocation::Unknown { name } => {
                return Err(FilterError::EmptyToolInvocation(name.clone()));
            }
        };
        tracing::debug!(
            "tool {} narrowed {} items to {}",
            invocation.name(),
            base.len(),
            filtered.len()
        );
        Ok(filtered)
    }
}
