//! 目录层：商品条目、检索结果与目录协作方接口

pub mod item;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use item::{CatalogItem, SearchResult, SearchType};
pub use memory::InMemoryCatalog;

/// 目录侧错误（检索后端故障、嵌入失败等）
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("search backend error: {0}")]
    Backend(String),
}

/// 目录协作方接口：条目计数、向量检索、文本检索
#[async_trait]
pub trait Catalog: Send + Sync {
    /// 已索引条目数；0 表示库存为空
    async fn count(&self) -> Result<usize, CatalogError>;

    /// 语义检索：返回按相似度降序的前 n 条，携带分数
    async fn vector_search(&self, query: &str, n: usize) -> Result<Vec<SearchResult>, CatalogError>;

    /// 子串检索：大小写不敏感，上限 n 条，无分数
    async fn text_search(&self, pattern: &str, n: usize) -> Result<Vec<SearchResult>, CatalogError>;
}
