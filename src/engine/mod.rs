//! 引擎层：Decision Node、Workflow 状态机与对话编排入口

pub mod decision;
pub mod error;
pub mod machine;
pub mod orchestrator;

pub use decision::{parse_model_output, Decision, DecisionNode, DEFAULT_SYSTEM_PROMPT};
pub use error::EngineError;
pub use machine::{advance, WorkflowInput, WorkflowMachine, WorkflowState};
pub use orchestrator::{EngineOptions, ShoppingEngine};
