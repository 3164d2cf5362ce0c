//! 内存线程存储
//!
//! RwLock<HashMap> 实现，供测试与演示使用；语义与文件存储一致。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::memory::{Message, StoreError, ThreadStore};

/// 内存实现：thread_id -> 消息序列
#[derive(Debug, Default)]
pub struct InMemoryThreadStore {
    threads: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前存储的线程数（测试用）
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[async_trait]
impl ThreadStore for InMemoryThreadStore {
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>, StoreError> {
        self.threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(thread_id.to_string()))
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<(), StoreError> {
        let mut threads = self.threads.write().await;
        threads
            .entry(thread_id.to_string())
            .or_default()
            .extend_from_slice(messages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_unknown_is_not_found() {
        let store = InMemoryThreadStore::new();
        assert!(matches!(
            store.load("nope").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_append_creates_thread_implicitly() {
        let store = InMemoryThreadStore::new();
        store.append("t1", &[Message::human("hi")]).await.unwrap();
        assert_eq!(store.thread_count().await, 1);
        assert_eq!(store.load("t1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_is_order_preserving() {
        let store = InMemoryThreadStore::new();
        for i in 0..5 {
            store
                .append("t1", &[Message::human(format!("m{}", i))])
                .await
                .unwrap();
        }
        let msgs = store.load("t1").await.unwrap();
        let contents: Vec<_> = msgs.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }
}
