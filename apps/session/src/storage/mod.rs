//! Local key-value persistence: the string-keyed store the workspace caches into,
//! plus the typed `SessionStore` that owns the keys and their schema.

pub mod file;
pub mod memory;
pub mod redis_store;
pub mod session_store;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use session_store::SessionStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-keyed, string-valued persistent store. Writes are last-writer-wins;
/// there is no coordination between processes sharing the same backing store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
