//! 对话消息数据模型
//!
//! 角色与 LLM API 对齐：human / assistant / tool-result（system 仅用于拼 prompt，不落盘）。
//! 消息创建后不可变；Thread 内按插入顺序排列。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 消息角色
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// 系统提示（仅在调用 LLM 前临时拼入，不写入 ThreadStore）
    #[serde(rename = "system")]
    System,
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "assistant")]
    Assistant,
    /// 工具执行结果（content 为结构化 JSON 载荷）
    #[serde(rename = "tool-result")]
    ToolResult,
}

/// 模型请求的工具调用描述（工具名 + JSON 参数）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub tool: String,
    pub args: Value,
}

/// 单条消息：role + content，assistant 请求工具时附带 tool_call 描述
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallRequest>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_call: None,
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
            tool_call: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_call: None,
        }
    }

    /// assistant 消息 + 工具调用描述；content 保留模型原始输出便于回放
    pub fn assistant_tool_call(content: impl Into<String>, tool_call: ToolCallRequest) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_call: Some(tool_call),
        }
    }

    /// 工具结果消息，content 为结构化 JSON 载荷
    pub fn tool_result(content: impl Into<String>) -> Self {
        Self {
            role: Role::ToolResult,
            content: content.into(),
            tool_call: None,
        }
    }
}
