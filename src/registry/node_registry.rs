use tokio::sync::RwLock;

use crate::models::Node;
use crate::storage::{Storage, StorageError};

use super::{fill_metadata_defaults, RegistryError};

pub const NODE_PREFIX: &str = "/registry/nodes/";

const KIND: &str = "node";

/// CRUD for nodes, keyed by name under [`NODE_PREFIX`].
pub struct NodeRegistry {
    storage: Storage,
    lock: RwLock<()>,
}

impl NodeRegistry {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            lock: RwLock::new(()),
        }
    }

    fn key(name: &str) -> String {
        format!("{NODE_PREFIX}{name}")
    }

    pub async fn create_node(&self, node: &mut Node) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        let key = Self::key(&node.metadata.name);
        if self.storage.get::<Node>(&key).await.is_ok() {
            return Err(RegistryError::AlreadyExists {
                kind: KIND,
                name: node.metadata.name.clone(),
            });
        }

        fill_metadata_defaults(&mut node.metadata);
        node.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self.storage.create(&key, node).await?)
    }

    pub async fn get_node(&self, name: &str) -> Result<Node, RegistryError> {
        let _guard = self.lock.read().await;

        match self.storage.get(&Self::key(name)).await {
            Ok(node) => Ok(node),
            Err(StorageError::NotFound(_)) => Err(RegistryError::NotFound {
                kind: KIND,
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_node(&self, node: &Node) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        node.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self
            .storage
            .update(&Self::key(&node.metadata.name), node)
            .await?)
    }

    pub async fn delete_node(&self, name: &str) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;
        Ok(self.storage.delete(&Self::key(name)).await?)
    }

    pub async fn list_nodes(&self) -> Result<Vec<Node>, RegistryError> {
        let _guard = self.lock.read().await;
        Ok(self.storage.list(NODE_PREFIX).await?)
    }
}
