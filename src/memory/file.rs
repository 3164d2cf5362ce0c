//! 文件线程存储
//!
//! 每个线程一个 JSON 文件（<root>/<thread_id>.json），追加时整体重写：
//! 先写临时文件再 rename，保证单线程内不出现半写状态。

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::memory::{Message, StoreError, ThreadStore};

/// 基于目录的 JSON 文件存储
#[derive(Debug)]
pub struct FileThreadStore {
    root: PathBuf,
}

impl FileThreadStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// thread_id -> 文件路径；拒绝含路径分隔符等可逃逸字符的 id
    fn path_for(&self, thread_id: &str) -> Result<PathBuf, StoreError> {
        if thread_id.is_empty()
            || !thread_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StoreError::InvalidThreadId(thread_id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", thread_id)))
    }

    async fn read_messages(&self, path: &Path) -> Result<Option<Vec<Message>>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ThreadStore for FileThreadStore {
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>, StoreError> {
        let path = self.path_for(thread_id)?;
        self.read_messages(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(thread_id.to_string()))
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> Result<(), StoreError> {
        let path = self.path_for(thread_id)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let mut all = self.read_messages(&path).await?.unwrap_or_default();
        all.extend_from_slice(messages);

        // 临时文件 + rename，避免写到一半进程退出留下损坏文件
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string_pretty(&all)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileThreadStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileThreadStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_load_unknown_thread_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("t1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_append_then_load_roundtrip() {
        let (_dir, store) = store();
        let msgs = vec![Message::human("hello"), Message::assistant("hi")];
        store.append("t1", &msgs).await.unwrap();
        let loaded = store.load("t1").await.unwrap();
        assert_eq!(loaded, msgs);
    }

    #[tokio::test]
    async fn test_append_preserves_prefix_and_order() {
        let (_dir, store) = store();
        let first = vec![Message::human("q1"), Message::assistant("a1")];
        store.append("t1", &first).await.unwrap();

        let extra = Message::human("q2");
        store.append("t1", std::slice::from_ref(&extra)).await.unwrap();

        let loaded = store.load("t1").await.unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(&loaded[..2], &first[..]);
        assert_eq!(*loaded.last().unwrap(), extra);
    }

    #[tokio::test]
    async fn test_threads_are_isolated() {
        let (_dir, store) = store();
        store.append("t1", &[Message::human("a")]).await.unwrap();
        store.append("t2", &[Message::human("b")]).await.unwrap();
        assert_eq!(store.load("t1").await.unwrap().len(), 1);
        assert_eq!(store.load("t2").await.unwrap()[0].content, "b");
    }

    #[tokio::test]
    async fn test_path_escape_rejected() {
        let (_dir, store) = store();
        let err = store.load("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidThreadId(_)));
        let err = store.append("a/b", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidThreadId(_)));
    }

    #[tokio::test]
    async fn test_tool_result_message_survives_persistence() {
        let (_dir, store) = store();
        let payload = r#"{"status":"ok","search_type":"vector","results":[]}"#;
        store
            .append("t1", &[Message::tool_result(payload)])
            .await
            .unwrap();
        let loaded = store.load("t1").await.unwrap();
        assert_eq!(loaded[0].role, crate::memory::Role::ToolResult);
        assert_eq!(loaded[0].content, payload);
    }
}
