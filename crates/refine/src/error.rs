use refine_llm::LlmError;

/// Failure kinds of one filter invocation. None of them abort the caller;
/// the orchestrator recovers and surfaces them as warnings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Understanding service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Response validation failed: {0}")]
    ResponseValidation(String),

    #[error("Session persistence failed: {0}")]
    Persistence(String),

    #[error("Unknown tool invocation: {0}")]
    EmptyToolInvocation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<LlmError> for FilterError {
    fn from(error: LlmError) -> Self {
        if error.is_unavailable() {
            FilterError::UpstreamUnavailable(error.to_string())
        } else {
            FilterError::ResponseValidation(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
