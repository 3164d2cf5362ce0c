//! Decision Node：意图决策与 Tool Call 解析
//!
//! 拼 system（固定指令 + 工具清单）+ 全量历史调用 LLM；
//! parse_model_output 从文本中提取 JSON 并解析为 ToolRequest 或最终回答。

use std::sync::Arc;

use serde::Deserialize;

use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, ToolCallRequest};

/// 固定系统指令：凡涉及商品目录必须用工具，工具失败或空库存时如实告知用户
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a shopping assistant for a product catalog.\n\
Whenever the user's question concerns catalog items (availability, price range, \
materials, recommendations), you MUST call the lookup tool instead of answering \
from memory. To call a tool, reply with exactly one JSON object and nothing else:\n\
{\"tool\": \"<name>\", \"args\": {...}}\n\
If a tool result reports an error or an empty inventory, acknowledge it \
gracefully to the user instead of inventing products. Otherwise answer in plain \
text.";

/// 决策结果
#[derive(Debug, Clone)]
pub enum Decision {
    /// 直接回复用户
    FinalAnswer(String),
    /// 需要执行工具
    ToolRequest(ToolCallRequest),
}

#[derive(Deserialize)]
struct RawToolCall {
    tool: String,
    #[serde(default)]
    args: serde_json::Value,
}

/// 解析模型输出：含有效 JSON 且 tool 非空则为 ToolRequest，否则整体视为最终回答
pub fn parse_model_output(output: &str) -> Decision {
    let trimmed = output.trim();

    // 提取 JSON 块（```json ... ``` 或首个 {...}）
    let json_str = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```")
            .map(|end| rest[..end].trim())
            .unwrap_or_else(|| rest.trim())
    } else if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            &trimmed[start..=end]
        } else {
            return Decision::FinalAnswer(trimmed.to_string());
        }
    } else {
        return Decision::FinalAnswer(trimmed.to_string());
    };

    match serde_json::from_str::<RawToolCall>(json_str) {
        Ok(raw) if !raw.tool.is_empty() => Decision::ToolRequest(ToolCallRequest {
            tool: raw.tool,
            args: raw.args,
        }),
        _ => Decision::FinalAnswer(trimmed.to_string()),
    }
}

/// Decision Node：持有（已包重试的）LLM 与 system prompt
pub struct DecisionNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl DecisionNode {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    /// 决策一次：system + 工具清单 + 历史 -> FinalAnswer | ToolRequest
    pub async fn decide(
        &self,
        history: &[Message],
        tool_schema_json: &str,
    ) -> Result<Decision, LlmError> {
        let system = format!(
            "{}\n\nAvailable tools:\n{}",
            self.system_prompt, tool_schema_json
        );
        let mut messages = vec![Message::system(system)];
        messages.extend(history.iter().cloned());

        let output = self.llm.complete(&messages).await?;
        Ok(parse_model_output(&output))
    }
}
