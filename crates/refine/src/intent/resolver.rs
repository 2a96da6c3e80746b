use std::sync::Arc;
use std::time::Duration;

use refine_llm::{LlmProvider, LlmRequest, LlmResponse, LlmToolCall, LlmToolSet, Message, ResponseFormat};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::result::{ModelResult, StructuredFilterResult, ToolInvocation};
use crate::error::{FilterError, Result};
use crate::tools::price::{
    between_schema, greater_than_schema, less_than_schema, price_tool_set, PRICE_BETWEEN,
    PRICE_GREATER_THAN, PRICE_LESS_THAN,
};
use crate::tools::schema::validate_schema;

pub const PRODUCT_LIST_FORMAT: &str = "product_list";

/// Schema the direct answer must conform to.
pub fn product_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "filtered_products": { "type": "array", "items": { "type": "string" } },
            "reasoning": { "type": "string" }
        },
        "required": ["filtered_products", "reasoning"],
        "additionalProperties": false
    })
}

#[derive(Deserialize)]
struct LessThanArgs {
    upper: f64,
}

#[derive(Deserialize)]
struct GreaterThanArgs {
    lower: f64,
}

#[derive(Deserialize)]
struct BetweenArgs {
    lower: f64,
    upper: f64,
}

/// One round-trip to the understanding service per query.
pub struct IntentResolver {
    provider: Arc<dyn LlmProvider>,
    tools: LlmToolSet,
    response_format: ResponseFormat,
    timeout: Duration,
}

impl IntentResolver {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            tools: price_tool_set(),
            response_format: ResponseFormat::json_schema(PRODUCT_LIST_FORMAT, product_list_schema()),
            timeout,
        }
    }

    /// Registers no numeric tools, so the service must always answer directly.
    pub fn without_tools(mut self) -> Self {
        self.tools.clear();
        self
    }

    pub async fn resolve(&self, messages: Vec<Message>) -> Result<ModelResult> {
        let request = LlmRequest::new(messages)
            .with_tools(self.tools.clone())
            .with_response_format(self.response_format.clone());

        let response = match tokio::time::timeout(self.timeout, self.provider.complete(request)).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(FilterError::UpstreamUnavailable(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f64()
                )))
            }
        };
        self.interpret(response)
    }

    fn interpret(&self, response: LlmResponse) -> Result<ModelResult> {
        if let Some(first) = response.tool_calls.first() {
            if response.tool_calls.len() > 1 {
                tracing::warn!(
                    "understanding service returned {} tool calls; honoring only {}",
                    response.tool_calls.len(),
                    first.name
                );
            }
            return parse_tool_call(first).map(ModelResult::ToolCall);
        }

        let content = response.content.ok_or_else(|| {
            FilterError::ResponseValidation(
                "response carried neither content nor a tool call".to_string(),
            )
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|error| {
            FilterError::ResponseValidation(format!("response is not JSON: {error}"))
        })?;
        validate_schema(&value, &self.response_format.schema)?;
        let result: StructuredFilterResult = decode(value)?;
        tracing::debug!(
            "understanding service matched {} items: {}",
            result.matched_ids.len(),
            result.reasoning
        );
        Ok(ModelResult::Matched(result))
    }
}

fn parse_tool_call(call: &LlmToolCall) -> Result<ToolInvocation> {
    let invocation = match call.name.as_str() {
        PRICE_LESS_THAN => {
            let args: LessThanArgs = decode_args(call, &less_than_schema())?;
            ToolInvocation::PriceLessThan { upper: args.upper }
        }
        PRICE_GREATER_THAN => {
            let args: GreaterThanArgs = decode_args(call, &greater_than_schema())?;
            ToolInvocation::PriceGreaterThan { lower: args.lower }
        }
        PRICE_BETWEEN => {
            let args: BetweenArgs = decode_args(call, &between_schema())?;
            ToolInvocation::PriceBetween {
                lower: args.lower,
                upper: args.upper,
            }
        }
        other => ToolInvocation::Unknown {
            name: other.to_string(),
        },
    };
    Ok(invocation)
}

fn decode_args<T: DeserializeOwned>(call: &LlmToolCall, schema: &Value) -> Result<T> {
    validate_schema(&call.arguments, schema).map_err(|error| {
        FilterError::ResponseValidation(format!("tool {} arguments: {error}", call.name))
    })?;
    decode(call.arguments.clone())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|error| FilterError::ResponseValidation(format!("decode error: {error}")))
}
