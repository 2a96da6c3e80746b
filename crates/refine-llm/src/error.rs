use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LlmError {
    InvalidInput(String),
    Internal(String),
    MissingApiKey,
    /// The request never produced an HTTP response.
    Transport(String),
    Timeout,
    /// The provider answered with a non-success status.
    Status { status: u16, body: String },
    /// The provider answered, but the payload could not be understood.
    InvalidResponse(String),
}

impl LlmError {
    /// Whether the failure is on the network/provider side rather than in the
    /// payload the provider returned.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LlmError::Transport(_)
                | LlmError::Timeout
                | LlmError::Status { .. }
                | LlmError::MissingApiKey
        )
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            LlmError::Internal(msg) => write!(f, "internal error: {msg}"),
            LlmError::MissingApiKey => write!(f, "missing LLM API key"),
            LlmError::Transport(msg) => write!(f, "transport error: {msg}"),
            LlmError::Timeout => write!(f, "LLM request timed out"),
            LlmError::Status { status, body } => {
                write!(f, "LLM provider returned status {status}: {body}")
            }
            LlmError::InvalidResponse(msg) => write!(f, "invalid LLM response: {msg}"),
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LlmError::Timeout
        } else if error.is_decode() {
            LlmError::InvalidResponse(error.to_string())
        } else {
            LlmError::Transport(error.to_string())
        }
    }
}
