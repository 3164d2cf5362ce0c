//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient：complete 接收完整消息序列返回文本。
//! 工具调用走文本 JSON 协议，由 Decision Node 解析；错误按上游状态码分类，
//! 供重试包装器（RetryingLlmClient）决定是否退避重试。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// LLM 调用错误，按可重试性分类
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// 429：限流，唯一可重试的类别
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 503：上游过载，不在调用层重试，直接上抛
    #[error("provider overloaded: {0}")]
    Overloaded(String),

    /// 401：鉴权失败，致命，永不重试
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 其它 API / 网络错误
    #[error("llm api error: {0}")]
    Api(String),

    /// 重试次数耗尽（由 RetryingLlmClient 产生）
    #[error("max retries exceeded after {attempts} attempts")]
    MaxRetriesExceeded { attempts: u32 },
}

impl LlmError {
    /// 仅限流可重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited(_))
    }
}

/// LLM 客户端 trait：单次非流式完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 完成一次对话调用；messages 已含 system 提示与全量历史
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}
