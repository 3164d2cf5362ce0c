//! 目录检索工具
//!
//! 唯一的工具：先语义检索，零命中时降级为子串检索；空库存返回显式信号，
//! 区分「没有匹配」与「根本没有东西可匹配」。载荷始终是结构化 JSON 文本。

use std::sync::Arc;

use async_trait::async_trait;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{Catalog, SearchResult, SearchType};
use crate::tools::{Tool, ToolError};

/// lookup 工具参数：query 必填，n 可选（默认取配置值）
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LookupArgs {
    /// 检索查询文本
    pub query: String,
    /// 返回条数上限
    #[serde(default)]
    pub n: Option<usize>,
}

/// 目录检索工具
pub struct LookupTool {
    catalog: Arc<dyn Catalog>,
    default_n: usize,
}

impl LookupTool {
    pub const NAME: &'static str = "lookup";

    pub fn new(catalog: Arc<dyn Catalog>, default_n: usize) -> Self {
        Self { catalog, default_n }
    }

    fn results_payload(search_type: SearchType, results: &[SearchResult]) -> String {
        let entries: Vec<Value> = results
            .iter()
            .map(|r| {
                let mut entry = serde_json::json!({
                    "id": r.item.id,
                    "name": r.item.name,
                    "description": r.item.description,
                    "categories": r.item.categories,
                    "summary": r.item.summary,
                });
                if let Some(score) = r.score {
                    entry["score"] = serde_json::json!(score);
                }
                entry
            })
            .collect();
        serde_json::json!({
            "status": "ok",
            "search_type": search_type,
            "results": entries,
        })
        .to_string()
    }
}

#[async_trait]
impl Tool for LookupTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search the product catalog. Tries semantic similarity first and falls \
         back to substring matching over name, description, categories and summary."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::to_value(schema_for!(LookupArgs)).unwrap_or_else(|_| Value::Null)
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: LookupArgs =
            serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))?;
        let n = args.n.unwrap_or(self.default_n).max(1);

        if self.catalog.count().await? == 0 {
            tracing::info!("lookup on empty catalog");
            return Ok(serde_json::json!({
                "status": "empty_inventory",
                "message": "The catalog has no items yet.",
            })
            .to_string());
        }

        let vector_hits = self.catalog.vector_search(&args.query, n).await?;
        if !vector_hits.is_empty() {
            tracing::debug!(hits = vector_hits.len(), "vector search hit");
            return Ok(Self::results_payload(SearchType::Vector, &vector_hits));
        }

        // 索引未命中（非空库存）：降级为子串检索
        tracing::info!(query = %args.query, "vector search empty, falling back to text search");
        let text_hits = self.catalog.text_search(&args.query, n).await?;
        Ok(Self::results_payload(SearchType::Text, &text_hits))
    }
}
