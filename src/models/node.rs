use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ValidationError};

/// Condition the node agent last reported for a machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    #[default]
    NotReady,
    Ready,
    MemoryPressure,
    DiskPressure,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub unschedulable: bool,
    #[serde(default, rename = "providerID", skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// A machine that can host pods, registered by its node agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: NodeSpec,
    #[serde(default)]
    pub status: NodeStatus,
}

impl Node {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.metadata.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_not_ready() {
        let node: Node = serde_json::from_str(r#"{"metadata":{"name":"n1"}}"#).unwrap();
        assert_eq!(node.status, NodeStatus::NotReady);
        assert!(!node.spec.unschedulable);
    }

    #[test]
    fn node_requires_a_name() {
        assert!(Node::default().validate().is_err());
    }
}
