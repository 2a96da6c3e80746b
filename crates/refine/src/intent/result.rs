use serde::{Deserialize, Serialize};

/// What the understanding service decided for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResult {
    /// The service answered directly with matching identifiers.
    Matched(StructuredFilterResult),
    /// The service delegated to a deterministic numeric filter.
    ToolCall(ToolInvocation),
}

/// Schema-conformant direct answer (`product_list` response format).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredFilterResult {
    #[serde(rename = "filtered_products")]
    pub matched_ids: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    PriceLessThan { upper: f64 },
    PriceGreaterThan { lower: f64 },
    PriceBetween { lower: f64, upper: f64 },
    /// A function name outside the registered set.
    Unknown { name: String },
}

impl ToolInvocation {
    pub fn name(&self) -> &str {
        match self {
            ToolInvocation::PriceLessThan { .. } => crate::tools::price::PRICE_LESS_THAN,
            ToolInvocation::PriceGreaterThan { .. } => crate::tools::price::PRICE_GREATER_THAN,
            ToolInvocation::PriceBetween { .. } => crate::tools::price::PRICE_BETWEEN,
            ToolInvocation::Unknown { name } => name,
        }
    }
}
