use std::time::Duration;

use async_trait::async_trait;
use etcd_client::{Client, ConnectOptions, DeleteOptions, GetOptions};

use super::{KvStore, StorageError};

const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Key-value backend over an external etcd cluster.
///
/// The etcd client is cheap to clone, so every operation works on its own
/// clone and the store can be shared behind an `Arc` without locking.
pub struct EtcdStore {
    client: Client,
}

impl EtcdStore {
    pub async fn connect(endpoints: &[String]) -> Result<Self, StorageError> {
        let options = ConnectOptions::new().with_connect_timeout(DIAL_TIMEOUT);
        let client = Client::connect(endpoints, Some(options))
            .await
            .map_err(backend)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl KvStore for EtcdStore {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let mut client = self.client.clone();
        client.put(key, value, None).await.map_err(backend)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut client = self.client.clone();
        let resp = client.get(key, None).await.map_err(backend)?;
        Ok(resp.kvs().first().map(|kv| kv.value().to_vec()))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut client = self.client.clone();
        client.delete(key, None).await.map_err(backend)?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError> {
        let mut client = self.client.clone();
        client
            .delete(prefix, Some(DeleteOptions::new().with_prefix()))
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Vec<u8>>, StorageError> {
        let mut client = self.client.clone();
        let resp = client
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(backend)?;
        Ok(resp.kvs().iter().map(|kv| kv.value().to_vec()).collect())
    }
}

fn backend(err: etcd_client::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}
