//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）。
//! 上游 HTTP 状态按 429 / 503 / 401 分类为 LlmError，供重试层与引擎区别处理。

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::memory::{Message, Role};

/// OpenAI 兼容客户端：持有 Client 与 model 名
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn to_openai_messages(&self, messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
                Role::Human => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .unwrap(),
                ),
                // 工具结果走文本协议：以 user 角色回灌，内容为结构化载荷
                Role::ToolResult => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(format!("Tool result:\n{}", m.content))
                        .build()
                        .unwrap(),
                ),
            })
            .collect()
    }
}

/// 将 async_openai 错误映射为 LlmError 分类
fn classify_error(err: OpenAIError) -> LlmError {
    let text = match &err {
        OpenAIError::ApiError(api) => match &api.r#type {
            Some(t) => format!("{} type={}", api.message, t),
            None => api.message.clone(),
        },
        other => other.to_string(),
    };
    classify_text(text)
}

/// 按上游错误文本分类：429 限流 / 503 过载 / 401 鉴权 / 其它
fn classify_text(text: String) -> LlmError {
    let lower = text.to_lowercase();

    if lower.contains("429") || lower.contains("rate limit") || lower.contains("rate_limit") {
        LlmError::RateLimited(text)
    } else if lower.contains("503") || lower.contains("overload") {
        LlmError::Overloaded(text)
    } else if lower.contains("401")
        || lower.contains("unauthorized")
        || lower.contains("invalid_api_key")
        || lower.contains("authentication")
    {
        LlmError::Unauthorized(text)
    } else {
        LlmError::Api(text)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.to_openai_messages(messages))
            .build()
            .map_err(|e| LlmError::Api(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> LlmError {
        classify_text(text.to_string())
    }

    #[test]
    fn test_classify_rate_limited() {
        let e = classify("Too many requests type=rate_limit_error");
        assert!(matches!(e, LlmError::RateLimited(_)));
        let e = classify("HTTP 429 from upstream");
        assert!(matches!(e, LlmError::RateLimited(_)));
    }

    #[test]
    fn test_classify_overloaded() {
        let e = classify("The engine is currently overloaded");
        assert!(matches!(e, LlmError::Overloaded(_)));
        let e = classify("503 service unavailable");
        assert!(matches!(e, LlmError::Overloaded(_)));
    }

    #[test]
    fn test_classify_unauthorized() {
        let e = classify("Incorrect API key provided type=invalid_api_key");
        assert!(matches!(e, LlmError::Unauthorized(_)));
        let e = classify("401 unauthorized");
        assert!(matches!(e, LlmError::Unauthorized(_)));
    }

    #[test]
    fn test_classify_other_is_api() {
        let e = classify("model not found type=invalid_request_error");
        assert!(matches!(e, LlmError::Api(_)));
    }
}
