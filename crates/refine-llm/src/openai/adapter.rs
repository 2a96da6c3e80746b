use async_trait::async_trait;

use crate::error::LlmError;
use crate::openai::convert::{from_wire_response, to_wire_request};
use crate::openai::wire::ChatCompletionResponse;
use crate::provider::LlmProvider;
use crate::request::{LlmRequest, LlmResponse};
use crate::settings::LlmSettings;

/// Provider for any endpoint speaking the OpenAI chat-completions protocol.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    settings: LlmSettings,
}

impl OpenAiCompatibleProvider {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|error| LlmError::Internal(format!("failed to build http client: {error}")))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;
        let body = to_wire_request(&self.settings, &request);
        tracing::debug!(
            "llm request model={} messages={} tools={}",
            self.settings.model,
            request.messages.len(),
            request.tools.len()
        );

        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatCompletionResponse = response.json().await?;
        from_wire_response(payload)
    }
}
