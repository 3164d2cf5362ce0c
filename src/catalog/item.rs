//! 目录数据模型
//!
//! CatalogItem 对引擎只读，由目录方维护；summary 是向量检索的语义文档。

use serde::{Deserialize, Serialize};

/// 商品条目
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    /// 定长嵌入向量；向量检索的索引键
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// 反范式化的摘要文本，作为语义检索文档
    pub summary: String,
}

/// 产生结果的检索策略标签
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    #[serde(rename = "vector")]
    Vector,
    #[serde(rename = "text")]
    Text,
}

/// 单条检索结果；score 仅语义检索存在
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub item: CatalogItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub search_type: SearchType,
}
