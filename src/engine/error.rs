//! 引擎错误类型与用户可见文案
//!
//! 致命错误统一映射为四类人类可读提示（限流 / 过载 / 鉴权 / 通用），
//! 不向调用方泄漏内部诊断细节。

use thiserror::Error;

use crate::llm::LlmError;
use crate::memory::StoreError;

/// 单轮对话的致命错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// 模型始终不收敛到最终回答，达到 Decide/Execute 循环上限
    #[error("recursion limit exceeded after {cycles} tool cycles")]
    RecursionLimitExceeded { cycles: usize },

    /// 提交失败致命：静默丢失已确认的回合会损坏线程历史
    #[error("storage commit failed: {0}")]
    Storage(#[from] StoreError),

    #[error("invalid workflow transition: {0}")]
    InvalidTransition(&'static str),
}

impl EngineError {
    /// 面向最终用户的文案分类
    pub fn user_message(&self) -> &'static str {
        match self {
            EngineError::Llm(LlmError::RateLimited(_))
            | EngineError::Llm(LlmError::MaxRetriesExceeded { .. }) => {
                "服务暂时不可用（请求过于频繁），请稍后再试。"
            }
            EngineError::Llm(LlmError::Overloaded(_)) => "上游服务过载，请稍候片刻再试。",
            EngineError::Llm(LlmError::Unauthorized(_)) => {
                "服务配置有误（鉴权失败），请联系管理员。"
            }
            _ => "处理请求时出了点问题，请稍后再试。",
        }
    }
}
