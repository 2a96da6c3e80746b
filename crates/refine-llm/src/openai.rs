pub mod adapter;
mod convert;
mod wire;

pub use adapter::OpenAiCompatibleProvider;
