//! Deterministic price filters the understanding service may delegate to.
//!
//! All bounds are inclusive and input order is preserved.

use refine_llm::{LlmTool, LlmToolSet};
use serde_json::{json, Value};

use crate::catalog::CatalogItem;

pub const PRICE_LESS_THAN: &str = "price_less_than";
pub const PRICE_GREATER_THAN: &str = "price_greater_than";
pub const PRICE_BETWEEN: &str = "price_between";

pub fn price_less_than<'a>(items: &[&'a CatalogItem], upper: f64) -> Vec<&'a CatalogItem> {
    items
        .iter()
        .copied()
        .filter(|item| item.price <= upper)
        .collect()
}

pub fn price_greater_than<'a>(items: &[&'a CatalogItem], lower: f64) -> Vec<&'a CatalogItem> {
    items
        .iter()
        .copied()
        .filter(|item| item.price >= lower)
        .collect()
}

pub fn price_between<'a>(
    items: &[&'a CatalogItem],
    lower: f64,
    upper: f64,
) -> Vec<&'a CatalogItem> {
    items
        .iter()
        .copied()
        .filter(|item| item.price >= lower && item.price <= upper)
        .collect()
}

pub fn less_than_schema() -> Value {
    bounds_schema(&["upper"])
}

pub fn greater_than_schema() -> Value {
    bounds_schema(&["lower"])
}

pub fn between_schema() -> Value {
    bounds_schema(&["lower", "upper"])
}

fn bounds_schema(fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "number" })))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": fields,
        "additionalProperties": false
    })
}

/// The three price functions as registered with the understanding service.
pub fn price_tool_set() -> LlmToolSet {
    let mut tools = LlmToolSet::new();
    tools.insert(
        PRICE_LESS_THAN.to_string(),
        LlmTool::function(less_than_schema())
            .with_description("list products where price is less than input"),
    );
    tools.insert(
        PRICE_GREATER_THAN.to_string(),
        LlmTool::function(greater_than_schema())
            .with_description("list products where price is greater than input"),
    );
    tools.insert(
        PRICE_BETWEEN.to_string(),
        LlmTool::function(between_schema())
            .with_description("list products where price is between lower and upper"),
    );
    tools
}
