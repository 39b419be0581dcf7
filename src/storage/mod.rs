pub mod etcd;
pub mod memory;

pub use etcd::EtcdStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("error encoding object: {0}")]
    Encoding(#[source] serde_json::Error),
    #[error("error decoding object: {0}")]
    Decoding(#[source] serde_json::Error),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("kv backend error: {0}")]
    Backend(String),
}

/// Raw byte operations against the backing key-value store. The store must
/// be strongly consistent and support ordered prefix scans.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
    async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError>;
    async fn list(&self, prefix: &str) -> Result<Vec<Vec<u8>>, StorageError>;
}

/// Typed CRUD over the raw store. Values are JSON; the element type of
/// `list` is chosen by the caller.
#[derive(Clone)]
pub struct Storage {
    kv: Arc<dyn KvStore>,
}

impl Storage {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Create and update are both unconditional puts against the KV; the
    /// create-if-absent check lives in the registries.
    pub async fn create<T: Serialize + Sync>(&self, key: &str, obj: &T) -> Result<(), StorageError> {
        self.put(key, obj).await
    }

    pub async fn update<T: Serialize + Sync>(&self, key: &str, obj: &T) -> Result<(), StorageError> {
        self.put(key, obj).await
    }

    async fn put<T: Serialize + Sync>(&self, key: &str, obj: &T) -> Result<(), StorageError> {
        let data = serde_json::to_vec(obj).map_err(StorageError::Encoding)?;
        self.kv.put(key, data).await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, StorageError> {
        match self.kv.get(key).await? {
            Some(data) => serde_json::from_slice(&data).map_err(StorageError::Decoding),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.kv.delete(key).await
    }

    pub async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError> {
        self.kv.delete_prefix(prefix).await
    }

    pub async fn list<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StorageError> {
        let values = self.kv.list(prefix).await?;
        values
            .iter()
            .map(|value| serde_json::from_slice(value).map_err(StorageError::Decoding))
            .collect()
    }
}
