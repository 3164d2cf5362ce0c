//! 工具注册表
//!
//! 工具实现 Tool trait（name / description / parameters_schema / execute），
//! 由 ToolRegistry 按名注册与查找；to_schema_json 生成 prompt 里的工具清单。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::CatalogError;

/// 工具层错误：参数校验失败快速报错，其余由状态机转为结构化载荷回灌对话
#[derive(Error, Debug)]
pub enum ToolError {
    /// 参数不符合 schema（必填 query 缺失、类型不符等）
    #[error("invalid tool arguments: {0}")]
    InvalidArgs(String),

    /// 模型请求了未注册的工具
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// 工具 trait：名称、描述（供 LLM 理解）、参数 schema、异步执行（args 为 JSON）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（用于 JSON 中的 "tool" 字段）
    fn name(&self) -> &str;

    /// 工具描述（供 LLM 理解功能）
    fn description(&self) -> &str;

    /// 参数 JSON Schema（供 LLM 生成正确的参数格式）
    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    /// 执行工具，返回结构化 JSON 载荷文本
    async fn execute(&self, args: Value) -> Result<String, ToolError>;
}

/// 工具注册表：按名称存储 Arc<dyn Tool>
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(args).await
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// 生成工具 schema JSON，拼入 system prompt 的 Available tools 段落
    pub fn to_schema_json(&self) -> String {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|(name, tool)| {
                serde_json::json!({
                    "name": name,
                    "description": tool.description(),
                    "parameters": tool.parameters_schema()
                })
            })
            .collect();
        serde_json::to_string_pretty(&tools).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }
        fn description(&self) -> &str {
            "uppercases text"
        }
        async fn execute(&self, args: Value) -> Result<String, ToolError> {
            let text = args
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ToolError::InvalidArgs("missing text".to_string()))?;
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut reg = ToolRegistry::new();
        reg.register(UpperTool);
        let out = reg
            .execute("upper", serde_json::json!({"text": "abc"}))
            .await
            .unwrap();
        assert_eq!(out, "ABC");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let reg = ToolRegistry::new();
        let err = reg.execute("nope", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }

    #[test]
    fn test_schema_json_lists_registered_tools() {
        let mut reg = ToolRegistry::new();
        reg.register(UpperTool);
        let schema = reg.to_schema_json();
        assert!(schema.contains("\"upper\""));
        assert!(schema.contains("uppercases"));
    }
}
