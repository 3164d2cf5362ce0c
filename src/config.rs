//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FERRET__*` 覆盖（双下划线表示嵌套，
//! 如 `FERRET__LLM__PROVIDER=openai`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::llm::RetryConfig;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub store: StoreSection,
}

/// [llm] 段：后端选择
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：openai / mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// /embeddings 端点用的模型
    pub embedding_model: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            embedding_model: "text-embedding-3-small".to_string(),
        }
    }
}

/// [retry] 段：限流退避参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let d = RetryConfig::default();
        Self {
            max_attempts: d.max_attempts,
            base_delay_ms: d.base_delay_ms,
            max_delay_ms: d.max_delay_ms,
        }
    }
}

impl From<&RetrySection> for RetryConfig {
    fn from(s: &RetrySection) -> Self {
        Self {
            max_attempts: s.max_attempts,
            base_delay_ms: s.base_delay_ms,
            max_delay_ms: s.max_delay_ms,
        }
    }
}

/// [workflow] 段：循环上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowSection {
    /// Decide/Execute 循环上限，防止工具调用死循环
    pub max_cycles: usize,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self { max_cycles: 15 }
    }
}

/// [tools] 段
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ToolsSection {
    #[serde(default)]
    pub lookup: LookupSection,
}

/// [tools.lookup] 段：默认返回条数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupSection {
    pub default_n: usize,
}

impl Default for LookupSection {
    fn default() -> Self {
        Self { default_n: 10 }
    }
}

/// [store] 段：线程文件根目录
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub root: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("threads"),
        }
    }
}

/// 从 config 目录加载配置，环境变量 FERRET__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FERRET__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FERRET")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.base_delay_ms, 1000);
        assert_eq!(cfg.retry.max_delay_ms, 30_000);
        assert_eq!(cfg.workflow.max_cycles, 15);
        assert_eq!(cfg.tools.lookup.default_n, 10);
    }

    #[test]
    fn test_retry_section_converts() {
        let section = RetrySection {
            max_attempts: 5,
            base_delay_ms: 200,
            max_delay_ms: 1000,
        };
        let rc: RetryConfig = (&section).into();
        assert_eq!(rc.max_attempts, 5);
        assert_eq!(rc.base_delay_ms, 200);
    }
}
