use tokio::sync::RwLock;

use crate::models::{Pod, PodStatus};
use crate::storage::{Storage, StorageError};

use super::{fill_metadata_defaults, RegistryError};

pub const POD_PREFIX: &str = "/pods/";

const KIND: &str = "pod";

/// CRUD for pods, keyed by name under [`POD_PREFIX`]. The lock serializes
/// the check-then-write in create against other writers in this process;
/// cross-process exclusion is delegated to single-instance deployment.
pub struct PodRegistry {
    storage: Storage,
    lock: RwLock<()>,
}

impl PodRegistry {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            lock: RwLock::new(()),
        }
    }

    fn key(name: &str) -> String {
        format!("{POD_PREFIX}{name}")
    }

    /// Creates the pod, rejecting duplicates by name. Metadata defaults are
    /// stamped before validation.
    pub async fn create_pod(&self, pod: &mut Pod) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        let key = Self::key(&pod.metadata.name);
        if self.storage.get::<Pod>(&key).await.is_ok() {
            return Err(RegistryError::AlreadyExists {
                kind: KIND,
                name: pod.metadata.name.clone(),
            });
        }

        fill_metadata_defaults(&mut pod.metadata);
        pod.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self.storage.create(&key, pod).await?)
    }

    pub async fn get_pod(&self, name: &str) -> Result<Pod, RegistryError> {
        let _guard = self.lock.read().await;

        match self.storage.get(&Self::key(name)).await {
            Ok(pod) => Ok(pod),
            Err(StorageError::NotFound(_)) => Err(RegistryError::NotFound {
                kind: KIND,
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update_pod(&self, pod: &Pod) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;

        pod.validate().map_err(|err| RegistryError::Invalid {
            kind: KIND,
            detail: err.to_string(),
        })?;

        Ok(self
            .storage
            .update(&Self::key(&pod.metadata.name), pod)
            .await?)
    }

    pub async fn delete_pod(&self, name: &str) -> Result<(), RegistryError> {
        let _guard = self.lock.write().await;
        Ok(self.storage.delete(&Self::key(name)).await?)
    }

    pub async fn list_pods(&self) -> Result<Vec<Pod>, RegistryError> {
        let _guard = self.lock.read().await;
        Ok(self.storage.list(POD_PREFIX).await?)
    }

    async fn list_pods_by_status(&self, status: PodStatus) -> Result<Vec<Pod>, RegistryError> {
        let pods = self.list_pods().await?;
        Ok(pods.into_iter().filter(|p| p.status == status).collect())
    }

    /// Pods waiting for a node.
    pub async fn list_pending_pods(&self) -> Result<Vec<Pod>, RegistryError> {
        self.list_pods_by_status(PodStatus::Pending).await
    }

    /// Pods without a node assignment; equivalent to the pending set since
    /// binding flips the status away from `Pending`.
    pub async fn list_unassigned_pods(&self) -> Result<Vec<Pod>, RegistryError> {
        self.list_pods_by_status(PodStatus::Pending).await
    }
}
