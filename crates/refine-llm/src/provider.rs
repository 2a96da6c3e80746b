use async_trait::async_trait;

use crate::error::LlmError;
use crate::request::{LlmRequest, LlmResponse};

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Performs a single non-streaming completion round-trip.
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}
