//! 对话编排引擎
//!
//! 单轮入口 run_conversation_turn：读线程历史 -> 追加用户消息 -> 跑状态机 ->
//! 成功后一次性提交本轮全部消息。同一 thread_id 的回合串行化（每线程互斥锁），
//! 不同线程并行互不影响。读失败降级为空历史，提交失败致命上抛。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::engine::decision::{DecisionNode, DEFAULT_SYSTEM_PROMPT};
use crate::engine::machine::WorkflowMachine;
use crate::engine::EngineError;
use crate::llm::{LlmClient, RetryConfig, RetryingLlmClient};
use crate::memory::{Message, StoreError, ThreadStore};
use crate::tools::{LookupTool, ToolRegistry};

/// 引擎构造参数
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub retry: RetryConfig,
    /// Decide/Execute 循环上限
    pub max_cycles: usize,
    /// lookup 默认返回条数
    pub default_n: usize,
    /// 覆盖默认 system prompt
    pub system_prompt: Option<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            max_cycles: 15,
            default_n: 10,
            system_prompt: None,
        }
    }
}

/// 导购对话引擎：依赖注入 LLM、目录与存储，便于测试替换
pub struct ShoppingEngine {
    decision: DecisionNode,
    tools: ToolRegistry,
    store: Arc<dyn ThreadStore>,
    machine: WorkflowMachine,
    /// 每线程一把锁：同线程回合串行，避免并发读改写丢更新
    thread_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ShoppingEngine {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn ThreadStore>,
        options: EngineOptions,
    ) -> Self {
        // 所有模型调用都经过退避重试包装
        let resilient: Arc<dyn LlmClient> =
            Arc::new(RetryingLlmClient::new(llm, options.retry.clone()));
        let system_prompt = options
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let mut tools = ToolRegistry::new();
        tools.register(LookupTool::new(catalog, options.default_n));

        Self {
            decision: DecisionNode::new(resilient, system_prompt),
            tools,
            store,
            machine: WorkflowMachine::new(options.max_cycles),
            thread_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 为新对话铸造线程标识（供传输层 start-conversation 使用）
    pub fn new_thread_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    async fn thread_lock(&self, thread_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.thread_locks.lock().await;
        locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 处理单轮查询：返回最终回答文本
    ///
    /// 读失败（含 NotFound）按空历史处理；状态机出错则本轮不提交，
    /// 已提交的历史保持完好，下一轮可重试。
    pub async fn run_conversation_turn(
        &self,
        query: &str,
        thread_id: &str,
    ) -> Result<String, EngineError> {
        let lock = self.thread_lock(thread_id).await;
        let _guard = lock.lock().await;

        let mut history = match self.store.load(thread_id).await {
            Ok(messages) => messages,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(e) => {
                tracing::warn!(thread_id, error = %e, "load failed, degrading to fresh history");
                Vec::new()
            }
        };
        let base_len = history.len();
        history.push(Message::human(query));

        tracing::info!(thread_id, prior = base_len, "turn started");
        let answer = self
            .machine
            .run(&self.decision, &self.tools, &mut history)
            .await?;

        self.store.append(thread_id, &history[base_len..]).await?;
        tracing::info!(
            thread_id,
            committed = history.len() - base_len,
            "turn committed"
        );
        Ok(answer)
    }
}
