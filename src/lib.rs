//! Ferret - Rust 导购对话智能体
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **catalog**: 商品目录数据模型与检索接口（向量 / 文本）
//! - **engine**: Decision Node、Workflow 状态机与单轮编排入口
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）、退避重试、嵌入
//! - **memory**: 消息数据模型与线程存储（文件 / 内存）
//! - **tools**: Tool trait、注册表与目录检索工具

pub mod catalog;
pub mod config;
pub mod engine;
pub mod llm;
pub mod memory;
pub mod tools;

pub use engine::{EngineError, EngineOptions, ShoppingEngine};
