//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Mock）、退避重试、嵌入

pub mod embedding;
pub mod mock;
pub mod openai;
pub mod retry;
pub mod traits;

pub use embedding::{EmbeddingProvider, HashEmbedder, OpenAiEmbedder};
pub use mock::ScriptedLlmClient;
pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryingLlmClient};
pub use traits::{LlmClient, LlmError};
