use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::PodStatus;
use crate::registry::{names, NodeRegistry, PodRegistry, RegistryError};

/// Binds pending pods to registered nodes. Placement is uniformly random;
/// node status is not consulted, so unschedulable or not-ready nodes can be
/// picked (known limitation).
pub struct Scheduler {
    pods: Arc<PodRegistry>,
    nodes: Arc<NodeRegistry>,
    scheduling_rate: Duration,
}

impl Scheduler {
    pub fn new(pods: Arc<PodRegistry>, nodes: Arc<NodeRegistry>, scheduling_rate: Duration) -> Self {
        Self {
            pods,
            nodes,
            scheduling_rate,
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        info!(rate = ?self.scheduling_rate, "Starting scheduler");

        let mut interval = tokio::time::interval(self.scheduling_rate);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.schedule_pending_pods().await {
                        warn!("scheduling pass failed: {err}");
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Scheduler shutting down");
                    return;
                }
            }
        }
    }

    /// One pass: every pending pod gets a node. Binding sets the node name
    /// and flips the status to `Scheduled`, so a pod is never re-bound.
    pub async fn schedule_pending_pods(&self) -> Result<(), RegistryError> {
        let pods = self.pods.list_pending_pods().await?;
        let nodes = self.nodes.list_nodes().await?;

        if nodes.is_empty() {
            warn!("no nodes available for scheduling");
            return Ok(());
        }

        for mut pod in pods {
            let node = &nodes[names::random_index(nodes.len())];

            pod.node_name = node.metadata.name.clone();
            pod.status = PodStatus::Scheduled;
            self.pods.update_pod(&pod).await?;

            info!(pod = %pod.metadata.name, node = %node.metadata.name, "scheduled pod");
        }

        Ok(())
    }
}
