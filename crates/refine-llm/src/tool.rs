use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct LlmTool {
    pub description: Option<String>,
    pub input_schema: Value,
}

impl LlmTool {
    pub fn function(input_schema: Value) -> Self {
        Self {
            description: None,
            input_schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Tools keyed by function name. Ordered so request bodies are stable.
pub type LlmToolSet = BTreeMap<String, LlmTool>;

/// A function call requested by the provider instead of a direct answer.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}
