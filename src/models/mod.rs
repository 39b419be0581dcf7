pub mod node;
pub mod pod;
pub mod replicaset;

pub use node::{Node, NodeSpec, NodeStatus};
pub use pod::{Container, Pod, PodSpec, PodStatus};
pub use replicaset::{PodTemplateSpec, ReplicaSet, ReplicaSetSpec, ReplicaSetStatus};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest name any resource may carry.
pub const MAX_NAME_LENGTH: usize = 63;

/// Minimal metadata block shared by every persisted resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    /// Metadata with only a name set, the common case for new objects.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new("metadata.name is required"));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(ValidationError::new(format!(
                "metadata.name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// A resource failed validation; the message names the offending field.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_requires_name() {
        assert!(ObjectMeta::default().validate().is_err());
        assert!(ObjectMeta::named("p").validate().is_ok());
    }

    #[test]
    fn meta_rejects_names_over_limit() {
        let meta = ObjectMeta::named("x".repeat(MAX_NAME_LENGTH + 1));
        assert!(meta.validate().is_err());
        let meta = ObjectMeta::named("x".repeat(MAX_NAME_LENGTH));
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn meta_omits_empty_optional_fields() {
        let json = serde_json::to_value(ObjectMeta::named("web")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "web" }));
    }
}
