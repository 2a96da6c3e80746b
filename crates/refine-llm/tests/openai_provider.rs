use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use refine_llm::{
    LlmError, LlmProvider, LlmRequest, LlmSettings, LlmTool, LlmToolSet, Message,
    OpenAiCompatibleProvider, ResponseFormat,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct TestState {
    last_body: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    reply: Arc<Mutex<Value>>,
    status: Arc<Mutex<Option<StatusCode>>>,
}

async fn completions(
    State(state): State<TestState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *state.last_body.lock().await = Some(body);
    *state.last_auth.lock().await = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if let Some(status) = *state.status.lock().await {
        return (status, "upstream exploded").into_response();
    }
    let reply = state.reply.lock().await.clone();
    (StatusCode::OK, Json(reply)).into_response()
}

async fn start_server(state: TestState) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/v1")
}

fn provider_for(base_url: &str) -> OpenAiCompatibleProvider {
    let settings = LlmSettings {
        request_timeout: Duration::from_secs(5),
        ..LlmSettings::default()
    }
    .with_base_url(base_url)
    .with_api_key("test-key");
    OpenAiCompatibleProvider::new(settings).expect("provider")
}

#[tokio::test]
async fn structured_reply_round_trips_through_http() {
    let state = TestState::default();
    *state.reply.lock().await = json!({
        "model": "gpt-4o-mini",
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "{\"filtered_products\":[\"a\"],\"reasoning\":\"r\"}"
            }
        }]
    });
    let base_url = start_server(state.clone()).await;
    let provider = provider_for(&base_url);

    let mut tools = LlmToolSet::new();
    tools.insert(
        "price_less_than".to_string(),
        LlmTool::function(json!({"type": "object"})),
    );
    let request = LlmRequest::new(vec![Message::system("catalog"), Message::user("shirts")])
        .with_tools(tools)
        .with_response_format(ResponseFormat::json_schema(
            "product_list",
            json!({"type": "object"}),
        ));
    let response = provider.complete(request).await.expect("complete");

    assert_eq!(
        response.content.as_deref(),
        Some("{\"filtered_products\":[\"a\"],\"reasoning\":\"r\"}")
    );
    assert!(response.tool_calls.is_empty());

    let body = state.last_body.lock().await.clone().expect("body");
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["messages"][1]["content"], "shirts");
    assert_eq!(body["tools"][0]["function"]["name"], "price_less_than");
    assert_eq!(body["response_format"]["json_schema"]["name"], "product_list");
    assert_eq!(
        state.last_auth.lock().await.as_deref(),
        Some("Bearer test-key")
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let state = TestState::default();
    *state.status.lock().await = Some(StatusCode::SERVICE_UNAVAILABLE);
    let base_url = start_server(state).await;
    let provider = provider_for(&base_url);

    let err = provider
        .complete(LlmRequest::new(vec![Message::user("q")]))
        .await
        .expect_err("status error");
    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_fails_before_sending() {
    let settings = LlmSettings::default().with_base_url("http://127.0.0.1:9/v1");
    let provider = OpenAiCompatibleProvider::new(settings).expect("provider");
    let err = provider
        .complete(LlmRequest::new(vec![Message::user("q")]))
        .await
        .expect_err("missing key");
    assert_eq!(err, LlmError::MissingApiKey);
    assert!(err.is_unavailable());
}
