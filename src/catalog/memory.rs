//! 内存目录实现
//!
//! 向量检索：对查询做嵌入后按余弦相似度排序；文本检索：跨 name / description /
//! categories / summary 的大小写不敏感子串匹配。供测试与演示使用。

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{Catalog, CatalogError, CatalogItem, SearchResult, SearchType};
use crate::llm::EmbeddingProvider;

/// 内存目录：条目列表 + 嵌入提供方
pub struct InMemoryCatalog {
    items: Vec<CatalogItem>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl InMemoryCatalog {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            items: Vec::new(),
            embedder,
        }
    }

    /// 录入条目；embedding 为空时用 summary 现算
    pub async fn index(&mut self, mut item: CatalogItem) -> Result<(), CatalogError> {
        if item.embedding.is_empty() {
            item.embedding = self
                .embedder
                .embed(&item.summary)
                .await
                .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        }
        self.items.push(item);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 余弦相似度
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.items.len())
    }

    async fn vector_search(&self, query: &str, n: usize) -> Result<Vec<SearchResult>, CatalogError> {
        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| CatalogError::Embedding(e.to_string()))?;
        if query_embedding.is_empty() {
            // 无语义信号视为索引未命中，由调用方降级到文本检索
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, &CatalogItem)> = self
            .items
            .iter()
            .map(|item| (cosine_similarity(&query_embedding, &item.embedding), item))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(n)
            .map(|(score, item)| SearchResult {
                item: item.clone(),
                score: Some(score),
                search_type: SearchType::Vector,
            })
            .collect())
    }

    async fn text_search(&self, pattern: &str, n: usize) -> Result<Vec<SearchResult>, CatalogError> {
        let needle = pattern.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&needle)
                    || item.description.to_lowercase().contains(&needle)
                    || item.summary.to_lowercase().contains(&needle)
                    || item
                        .categories
                        .iter()
                        .any(|c| c.to_lowercase().contains(&needle))
            })
            .take(n)
            .map(|item| SearchResult {
                item: item.clone(),
                score: None,
                search_type: SearchType::Text,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::HashEmbedder;

    fn item(id: &str, name: &str, categories: &[&str], summary: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{} description", name),
            categories: categories.iter().map(|s| s.to_string()).collect(),
            embedding: vec![],
            summary: summary.to_string(),
        }
    }

    async fn sample_catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new(Arc::new(HashEmbedder::default()));
        catalog
            .index(item(
                "1",
                "Oak Dining Table",
                &["furniture", "dining"],
                "solid oak dining table seats six",
            ))
            .await
            .unwrap();
        catalog
            .index(item(
                "2",
                "Velvet Sofa",
                &["furniture", "living room"],
                "green velvet three seat sofa",
            ))
            .await
            .unwrap();
        catalog
            .index(item(
                "3",
                "Desk Lamp",
                &["lighting"],
                "adjustable brass desk lamp",
            ))
            .await
            .unwrap();
        catalog
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[]), 0.0);
    }

    #[tokio::test]
    async fn test_count() {
        let catalog = sample_catalog().await;
        assert_eq!(catalog.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_vector_search_ranks_by_similarity() {
        let catalog = sample_catalog().await;
        let results = catalog
            .vector_search("oak dining table", 10)
            .await
            .unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].item.id, "1");
        assert_eq!(results[0].search_type, SearchType::Vector);
        assert!(results[0].score.unwrap() > 0.0);
        // 分数降序
        for pair in results.windows(2) {
            assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
        }
    }

    #[tokio::test]
    async fn test_vector_search_respects_n() {
        let catalog = sample_catalog().await;
        let results = catalog.vector_search("lamp table sofa", 1).await.unwrap();
        assert!(results.len() <= 1);
    }

    #[tokio::test]
    async fn test_text_search_case_insensitive_across_fields() {
        let catalog = sample_catalog().await;
        // name 命中
        let r = catalog.text_search("DINING", 10).await.unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].search_type, SearchType::Text);
        assert!(r[0].score.is_none());
        // category 命中
        let r = catalog.text_search("lighting", 10).await.unwrap();
        assert_eq!(r[0].item.id, "3");
        // summary 命中
        let r = catalog.text_search("velvet", 10).await.unwrap();
        assert_eq!(r[0].item.id, "2");
    }

    #[tokio::test]
    async fn test_text_search_no_match() {
        let catalog = sample_catalog().await;
        assert!(catalog.text_search("spaceship", 10).await.unwrap().is_empty());
    }
}
