//! 记忆层：消息数据模型与线程存储（文件 / 内存）

pub mod file;
pub mod in_memory;
pub mod message;
pub mod store;

pub use file::FileThreadStore;
pub use in_memory::InMemoryThreadStore;
pub use message::{Message, Role, ToolCallRequest};
pub use store::{StoreError, ThreadStore};
