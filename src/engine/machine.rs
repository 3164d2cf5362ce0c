//! Workflow 状态机
//!
//! Deciding -> (ToolRequest) -> Executing -> Deciding；Deciding -> (FinalAnswer) -> Done。
//! advance 是纯转移函数，run 负责 IO 与消息写入；循环上限防止工具调用死循环。
//! 工具失败不终止工作流：转为结构化失败载荷回灌对话，由模型向用户转述。

use crate::engine::decision::{Decision, DecisionNode};
use crate::engine::EngineError;
use crate::memory::{Message, ToolCallRequest};
use crate::tools::ToolRegistry;

/// 状态机状态；cycle 计数已完成的 Decide/Execute 循环
#[derive(Debug, Clone)]
pub enum WorkflowState {
    Deciding { cycle: usize },
    Executing { cycle: usize, request: ToolCallRequest },
    Done { answer: String },
}

/// 驱动转移的输入
#[derive(Debug, Clone)]
pub enum WorkflowInput {
    Decided(Decision),
    ToolCompleted,
}

/// 纯转移函数：非法组合返回 InvalidTransition，循环超限返回 RecursionLimitExceeded
pub fn advance(
    state: WorkflowState,
    input: WorkflowInput,
    max_cycles: usize,
) -> Result<WorkflowState, EngineError> {
    match (state, input) {
        (WorkflowState::Deciding { .. }, WorkflowInput::Decided(Decision::FinalAnswer(answer))) => {
            Ok(WorkflowState::Done { answer })
        }
        (
            WorkflowState::Deciding { cycle },
            WorkflowInput::Decided(Decision::ToolRequest(request)),
        ) => {
            if cycle >= max_cycles {
                return Err(EngineError::RecursionLimitExceeded { cycles: cycle });
            }
            Ok(WorkflowState::Executing { cycle, request })
        }
        (WorkflowState::Executing { cycle, .. }, WorkflowInput::ToolCompleted) => {
            Ok(WorkflowState::Deciding { cycle: cycle + 1 })
        }
        (WorkflowState::Deciding { .. }, WorkflowInput::ToolCompleted) => {
            Err(EngineError::InvalidTransition("ToolCompleted while Deciding"))
        }
        (WorkflowState::Executing { .. }, WorkflowInput::Decided(_)) => {
            Err(EngineError::InvalidTransition("Decided while Executing"))
        }
        (WorkflowState::Done { .. }, _) => {
            Err(EngineError::InvalidTransition("input after Done"))
        }
    }
}

/// 状态机运行器：持循环上限，驱动 Decision Node 与工具执行
pub struct WorkflowMachine {
    max_cycles: usize,
}

impl WorkflowMachine {
    pub fn new(max_cycles: usize) -> Self {
        Self { max_cycles }
    }

    /// 跑到收敛：返回最终回答，过程消息（assistant / tool-result）追加到 history
    pub async fn run(
        &self,
        node: &DecisionNode,
        tools: &ToolRegistry,
        history: &mut Vec<Message>,
    ) -> Result<String, EngineError> {
        let schema = tools.to_schema_json();
        let mut state = WorkflowState::Deciding { cycle: 0 };

        loop {
            state = match state {
                WorkflowState::Deciding { cycle } => {
                    tracing::debug!(cycle, "state=deciding");
                    let decision = node.decide(history, &schema).await?;

                    match &decision {
                        Decision::FinalAnswer(answer) => {
                            history.push(Message::assistant(answer.clone()));
                        }
                        Decision::ToolRequest(request) => {
                            let raw = serde_json::json!({
                                "tool": request.tool,
                                "args": request.args,
                            })
                            .to_string();
                            history.push(Message::assistant_tool_call(raw, request.clone()));
                        }
                    }
                    advance(
                        WorkflowState::Deciding { cycle },
                        WorkflowInput::Decided(decision),
                        self.max_cycles,
                    )
                    .map_err(|e| {
                        if let EngineError::RecursionLimitExceeded { cycles } = &e {
                            tracing::error!(cycles, "workflow did not converge");
                        }
                        e
                    })?
                }
                WorkflowState::Executing { cycle, request } => {
                    tracing::debug!(cycle, tool = %request.tool, "state=executing");
                    let payload = match tools.execute(&request.tool, request.args.clone()).await {
                        Ok(p) => p,
                        Err(e) => {
                            // 工具失败转为失败载荷，由下一轮决策转述给用户
                            tracing::warn!(tool = %request.tool, error = %e, "tool failed");
                            serde_json::json!({
                                "status": "error",
                                "tool": request.tool,
                                "message": e.to_string(),
                            })
                            .to_string()
                        }
                    };
                    history.push(Message::tool_result(payload));
                    advance(
                        WorkflowState::Executing { cycle, request },
                        WorkflowInput::ToolCompleted,
                        self.max_cycles,
                    )?
                }
                WorkflowState::Done { answer } => {
                    tracing::debug!("state=done");
                    return Ok(answer);
                }
            };
        }
    }
}
