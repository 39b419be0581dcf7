use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, PodSpec, ValidationError};

/// Pod template stamped out for every replica.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodTemplateSpec {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetSpec {
    #[serde(default)]
    pub replicas: i32,
    /// Informational only; ownership is derived from pod name prefixes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub selector: HashMap<String, String>,
    #[serde(default)]
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    #[serde(default)]
    pub replicas: i32,
}

/// Declares that `spec.replicas` copies of the template should exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSet {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ReplicaSetSpec,
    #[serde(default)]
    pub status: ReplicaSetStatus,
}

impl ReplicaSet {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.metadata.validate()?;
        if self.spec.replicas < 0 {
            return Err(ValidationError::new("spec.replicas must not be negative"));
        }
        // The template is a pod spec and is held to the same rules.
        self.spec
            .template
            .spec
            .validate()
            .map_err(|err| ValidationError::new(format!("spec.template: {err}")))?;
        Ok(())
    }
}
