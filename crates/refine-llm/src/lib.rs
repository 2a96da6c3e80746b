pub mod error;
pub mod message;
pub mod openai;
pub mod provider;
pub mod request;
pub mod settings;
pub mod tool;

pub use error::LlmError;
pub use message::{Message, Role};
pub use openai::OpenAiCompatibleProvider;
pub use provider::LlmProvider;
pub use request::{LlmRequest, LlmResponse, ResponseFormat};
pub use settings::LlmSettings;
pub use tool::{LlmTool, LlmToolCall, LlmToolSet};
