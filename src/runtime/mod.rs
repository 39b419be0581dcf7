pub mod docker;
pub mod kubelet;

pub use docker::DockerRuntime;
pub use kubelet::Kubelet;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

/// Point-in-time container state as reported by the runtime. A missing
/// container is `exists: false` with the remaining fields zeroed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerState {
    pub exists: bool,
    pub running: bool,
    pub exit_code: i64,
}

/// Entry from the runtime's container listing; enough for label-based
/// reverse lookup and cleanup.
#[derive(Debug, Clone)]
pub struct ContainerSummary {
    pub id: String,
    pub labels: HashMap<String, String>,
}

/// Operations the node agent needs from a local container runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Pulls an image, streaming progress into the log.
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Creates a named container and returns its runtime id.
    async fn create_container(
        &self,
        name: &str,
        image: &str,
        labels: HashMap<String, String>,
    ) -> Result<String>;

    async fn start_container(&self, id: &str) -> Result<()>;

    /// Inspects by name or id; a missing container yields `exists: false`
    /// rather than an error.
    async fn inspect_container(&self, name_or_id: &str) -> Result<ContainerState>;

    /// Lists containers carrying all of the given label filters
    /// (`key` or `key=value`), including stopped ones when `all` is set.
    async fn list_containers(
        &self,
        label_filters: Vec<String>,
        all: bool,
    ) -> Result<Vec<ContainerSummary>>;

    async fn remove_container(&self, id: &str, force: bool) -> Result<()>;
}
