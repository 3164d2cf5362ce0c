//! 会话存储抽象层
//!
//! 按 thread_id 读取 / 追加消息序列；load 未知线程返回 NotFound（调用方视为空历史），
//! append 对单线程原子生效，不允许出现可观察的半写状态。

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 存储层错误
#[derive(Error, Debug)]
pub enum StoreError {
    /// 线程不存在（首次对话的正常路径，调用方按空历史处理）
    #[error("thread not found: {0}")]
    NotFound(String),

    #[error("invalid thread id: {0}")]
    InvalidThreadId(String),

    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// 线程存储接口：只追加，不改写、不重排、不截断
#[async_trait]
pub trait ThreadStore: Send + Sync {
    /// 读取线程全量历史；未知 thread_id 返回 StoreError::NotFound
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>, StoreError>;

    /// 追加消息到线程末尾；线程不存在时隐式创建
    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<(), StoreError>;
}
