use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ValidationError};

/// Lifecycle phase of a pod. `Scheduled` sits between `Pending` and
/// `Running`: the pod has a node but its containers are not up yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodStatus {
    #[default]
    Pending,
    Scheduled,
    Running,
    Succeeded,
    Failed,
}

/// A single container within a pod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
    /// Legacy field kept for wire compatibility; validated but unused.
    #[serde(default)]
    pub replicas: i32,
}

impl PodSpec {
    /// Shared by pod validation and ReplicaSet template validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.containers.is_empty() {
            return Err(ValidationError::new("spec.containers must not be empty"));
        }
        for container in &self.containers {
            if container.name.is_empty() {
                return Err(ValidationError::new("container name is required"));
            }
            if container.image.is_empty() {
                return Err(ValidationError::new("container image is required"));
            }
        }
        if self.replicas < 0 {
            return Err(ValidationError::new("spec.replicas must not be negative"));
        }
        Ok(())
    }
}

/// A group of co-located containers bound to at most one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
    /// Empty while the pod is unassigned; set once by the scheduler.
    #[serde(default, rename = "nodeName", skip_serializing_if = "String::is_empty")]
    pub node_name: String,
    #[serde(default)]
    pub status: PodStatus,
}

impl Pod {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.metadata.validate()?;
        self.spec.validate()?;
        if self.status == PodStatus::Pending && !self.node_name.is_empty() {
            return Err(ValidationError::new("a pending pod cannot have a node assigned"));
        }
        Ok(())
    }

    /// A pod counts toward its owner's replica total unless it has failed.
    pub fn is_active(&self) -> bool {
        self.status != PodStatus::Failed
    }

    /// Ownership is approximated by name prefix: `web-` pods belong to the
    /// ReplicaSet `web`.
    pub fn is_owned_by(&self, owner: &ObjectMeta) -> bool {
        self.metadata.name.starts_with(&owner.name)
    }

    pub fn is_active_and_owned_by(&self, owner: &ObjectMeta) -> bool {
        self.is_owned_by(owner) && self.is_active()
    }
}
