use serde_json::Value;

use crate::error::LlmError;
use crate::openai::wire::{
    ChatCompletionRequest, ChatCompletionResponse, WireFunction, WireJsonSchema,
    WireResponseFormat, WireTool,
};
use crate::request::{LlmRequest, LlmResponse};
use crate::settings::LlmSettings;
use crate::tool::LlmToolCall;

pub(crate) fn to_wire_request<'a>(
    settings: &'a LlmSettings,
    request: &'a LlmRequest,
) -> ChatCompletionRequest<'a> {
    let tools = request
        .tools
        .iter()
        .map(|(name, tool)| WireTool {
            kind: "function",
            function: WireFunction {
                name: name.as_str(),
                description: tool.description.as_deref(),
                parameters: &tool.input_schema,
            },
        })
        .collect();
    let response_format = request
        .response_format
        .as_ref()
        .map(|format| WireResponseFormat {
            kind: "json_schema",
            json_schema: WireJsonSchema {
                name: format.name.as_str(),
                schema: &format.schema,
                strict: format.strict,
            },
        });

    ChatCompletionRequest {
        model: settings.model.as_str(),
        messages: &request.messages,
        temperature: settings.temperature,
        max_tokens: settings.max_output_tokens,
        tools,
        response_format,
    }
}

pub(crate) fn from_wire_response(response: ChatCompletionResponse) -> Result<LlmResponse, LlmError> {
    let model = response.model;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;
    let message = choice.message;

    let mut tool_calls = Vec::new();
    for (index, call) in message.tool_calls.unwrap_or_default().into_iter().enumerate() {
        let arguments = parse_arguments(&call.function.name, &call.function.arguments)?;
        tool_calls.push(LlmToolCall {
            id: call.id.unwrap_or_else(|| format!("call_{index}")),
            name: call.function.name,
            arguments,
        });
    }

    if tool_calls.is_empty() && message.content.is_none() {
        if let Some(refusal) = message.refusal {
            return Err(LlmError::InvalidResponse(format!(
                "provider refused: {refusal}"
            )));
        }
    }

    Ok(LlmResponse {
        content: message.content,
        tool_calls,
        model,
    })
}

fn parse_arguments(name: &str, raw: &str) -> Result<Value, LlmError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|error| {
        LlmError::InvalidResponse(format!("tool {name} arguments are not JSON: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::request::ResponseFormat;
    use crate::tool::{LlmTool, LlmToolSet};
    use serde_json::json;

    #[test]
    fn request_serializes_tools_in_name_order() {
        let settings = LlmSettings::default();
        let mut tools = LlmToolSet::new();
        tools.insert("zeta".to_string(), LlmTool::function(json!({"type": "object"})));
        tools.insert(
            "alpha".to_string(),
            LlmTool::function(json!({"type": "object"})).with_description("first"),
        );
        let request = LlmRequest::new(vec![Message::user("hi")])
            .with_tools(tools)
            .with_response_format(ResponseFormat::json_schema("out", json!({"type": "object"})));

        let body = serde_json::to_value(to_wire_request(&settings, &request)).expect("serialize");
        assert_eq!(body["tools"][0]["function"]["name"], "alpha");
        assert_eq!(body["tools"][0]["function"]["description"], "first");
        assert_eq!(body["tools"][1]["function"]["name"], "zeta");
        assert!(body["tools"][1]["function"].get("description").is_none());
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "out");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn request_without_tools_omits_field() {
        let settings = LlmSettings::default();
        let request = LlmRequest::new(vec![Message::system("ctx")]);
        let body = serde_json::to_value(to_wire_request(&settings, &request)).expect("serialize");
        assert!(body.get("tools").is_none());
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn response_parses_tool_arguments() {
        let raw = json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_a",
                        "type": "function",
                        "function": { "name": "price_less_than", "arguments": "{\"upper\": 50}" }
                    }]
                }
            }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).expect("decode");
        let mapped = from_wire_response(response).expect("map");
        assert_eq!(mapped.tool_calls.len(), 1);
        assert_eq!(mapped.tool_calls[0].name, "price_less_than");
        assert_eq!(mapped.tool_calls[0].arguments, json!({"upper": 50}));
        assert_eq!(mapped.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn malformed_tool_arguments_are_invalid_response() {
        let raw = json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "function": { "name": "price_between", "arguments": "{lower" }
                    }]
                }
            }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).expect("decode");
        let err = from_wire_response(response).expect_err("bad arguments");
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn empty_choices_is_invalid_response() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).expect("decode");
        assert!(matches!(
            from_wire_response(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn refusal_is_invalid_response() {
        let raw = json!({
            "choices": [{ "message": { "content": null, "refusal": "no" } }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).expect("decode");
        assert!(matches!(
            from_wire_response(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
