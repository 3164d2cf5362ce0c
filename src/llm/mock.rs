//! Mock LLM 客户端（用于测试，无需 API）
//!
//! 按脚本依次吐出预设输出或错误；脚本耗尽后回显最后一条 human 消息，
//! 便于本地跑通完整的 Decide / Execute 流程。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, Role};

/// 脚本化客户端：push_answer / push_tool_call / push_error 预排一串响应
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
}

impl ScriptedLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预排一条最终回答
    pub fn push_answer(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(text.into()));
    }

    /// 预排一条工具调用（文本 JSON 协议）
    pub fn push_tool_call(&self, tool: &str, args: serde_json::Value) {
        let output = serde_json::json!({ "tool": tool, "args": args }).to_string();
        self.script.lock().unwrap().push_back(Ok(output));
    }

    /// 预排一条错误
    pub fn push_error(&self, error: LlmError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// 剩余脚本条数
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        // 脚本耗尽：回显最后一条 human 消息
        let last_human = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Human)
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");
        Ok(format!("Echo: {}", last_human))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_plays_in_order() {
        let client = ScriptedLlmClient::new();
        client.push_tool_call("lookup", serde_json::json!({"query": "table"}));
        client.push_answer("done");

        let first = client.complete(&[]).await.unwrap();
        assert!(first.contains("\"tool\":\"lookup\""));
        let second = client.complete(&[]).await.unwrap();
        assert_eq!(second, "done");
    }

    #[tokio::test]
    async fn test_exhausted_script_echoes() {
        let client = ScriptedLlmClient::new();
        let out = client.complete(&[Message::human("hi there")]).await.unwrap();
        assert_eq!(out, "Echo: hi there");
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let client = ScriptedLlmClient::new();
        client.push_error(LlmError::RateLimited("429".into()));
        assert!(matches!(
            client.complete(&[]).await.unwrap_err(),
            LlmError::RateLimited(_)
        ));
    }
}
