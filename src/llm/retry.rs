//! 弹性调用包装器
//!
//! 包装任意 LlmClient：限流（429）时按 min(base * 2^attempt, cap) 指数退避重试，
//! 默认共 3 次尝试（即退避序列 1000ms、2000ms）；其它错误立即上抛；
//! 次数耗尽返回 MaxRetriesExceeded。上游按分钟配额限流，不退避会导致突发消息连环失败。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::Message;

/// 重试参数
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// 总尝试次数（含首次）
    pub max_attempts: u32,
    /// 退避基数（毫秒）
    pub base_delay_ms: u64,
    /// 退避上限（毫秒）
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// 第 attempt 次（从 0 计）失败后的退避时长：min(base * 2^attempt, cap)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX));
        Duration::from_millis(exp.min(self.max_delay_ms))
    }
}

/// 带退避重试的 LlmClient 包装
pub struct RetryingLlmClient {
    inner: Arc<dyn LlmClient>,
    config: RetryConfig,
}

impl RetryingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl LlmClient for RetryingLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let max = self.config.max_attempts.max(1);
        for attempt in 0..max {
            match self.inner.complete(messages).await {
                Ok(output) => return Ok(output),
                Err(e) if e.is_retryable() => {
                    if attempt + 1 >= max {
                        tracing::error!(attempts = max, "llm retries exhausted");
                        return Err(LlmError::MaxRetriesExceeded { attempts: max });
                    }
                    let delay = self.config.backoff_delay(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "llm call failed, not retryable");
                    return Err(e);
                }
            }
        }
        unreachable!("retry loop always returns")
    }
}
