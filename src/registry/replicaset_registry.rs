use tokio::sync::RwLock;

use crate::models::ReplicaSet;
use crate::storage::{Storage, StorageError};

use super::{fill_metadata_defaults, RegistryError};

pub const REPLICASET_PREFIX: &str = "/replicasets/";

const KIND: &str = "replicaset";

/// CRUD for ReplicaSets, keyed by name under [`REPLICASET_PREFIX`]. Unlike
/// pods, updates require the object to exist already: the controller only
/// ever rewrites status on objects it just fetched.
pub struct ReplicaSetRegistry {
    storage: Storage,
    lock: RwLock<()>,
}

impl ReplicaSetRegistry {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            lock: RwLock::new(()),
        }
    }

    fn key(name: &str) -> String {
        format!("{REPLICASET_PREFIX}{name}")
    }

    pub async fn create(&self, rs: &mut ReplicaSet) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        let key = Self::key(&rs.metadata.name);
        if self.storage.get::<ReplicaSet>(&key).await.is_ok() {
            return Err(RegistryError::AlreadyExists {
                kind: KIND,
                name: rs.metadata.name.clone(),
            });
        }

        fill_metadata_defaults(&mut rs.metadata);
        rs.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self.storage.create(&key, rs).await?)
    }

    pub async fn get(&self, name: &str) -> Result<ReplicaSet, RegistryError> {
        let _guard = self.lock.read().await;

        match self.storage.get(&Self::key(name)).await {
            Ok(rs) => Ok(rs),
            Err(StorageError::NotFound(_)) => Err(RegistryError::NotFound {
                kind: KIND,
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(&self, rs: &ReplicaSet) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        let key = Self::key(&rs.metadata.name);
        if let Err(StorageError::NotFound(_)) = self.storage.get::<ReplicaSet>(&key).await {
            return Err(RegistryError::NotFound {
                kind: KIND,
                name: rs.metadata.name.clone(),
            });
        }

        rs.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self.storage.update(&key, rs).await?)
    }

    pub async fn delete(&self, name: &str) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;
        Ok(self.storage.delete(&Self::key(name)).await?)
    }

    pub async fn list(&self) -> Result<Vec<ReplicaSet>, RegistryError> {
        let _guard = self.lock.read().await;
        Ok(self.storage.list(REPLICASET_PREFIX).await?)
    }
}
