pub mod names;
mod node_registry;
mod pod_registry;
mod replicaset_registry;

pub use node_registry::{NodeRegistry, NODE_PREFIX};
pub use pod_registry::{PodRegistry, POD_PREFIX};
pub use replicaset_registry::{ReplicaSetRegistry, REPLICASET_PREFIX};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ObjectMeta;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid {kind}: {detail}")]
    Invalid { kind: &'static str, detail: String },
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stamps uid and creation timestamp onto objects entering the store.
fn fill_metadata_defaults(meta: &mut ObjectMeta) {
    if meta.uid.is_empty() {
        meta.uid = Uuid::new_v4().to_string();
    }
    if meta.creation_timestamp.is_none() {
        meta.creation_timestamp = Some(Utc::now());
    }
}
