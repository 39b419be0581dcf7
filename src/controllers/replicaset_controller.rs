use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::models::{ObjectMeta, Pod, PodSpec};
use crate::registry::{names, PodRegistry, RegistryError, ReplicaSetRegistry};

const RECONCILE_INTERVAL: Duration = Duration::from_secs(1);

/// Drives every ReplicaSet toward its declared replica count by creating
/// pods. Surplus pods are never deleted; shrinking only adjusts status.
pub struct ReplicaSetController {
    replicasets: Arc<ReplicaSetRegistry>,
    pods: Arc<PodRegistry>,
}

impl ReplicaSetController {
    pub fn new(replicasets: Arc<ReplicaSetRegistry>, pods: Arc<PodRegistry>) -> Self {
        Self { replicasets, pods }
    }

    /// Reconciles every ReplicaSet once per tick until the token is
    /// cancelled.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("Starting replicaset controller");

        let mut interval = tokio::time::interval(RECONCILE_INTERVAL);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.run_once().await {
                        error!("replicaset controller tick failed: {err}");
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Replicaset controller shutting down");
                    return;
                }
            }
        }
    }

    /// One pass over all ReplicaSets. A failed reconcile is logged so one
    /// bad object cannot stall the rest; the next tick retries it.
    pub async fn run_once(&self) -> Result<(), RegistryError> {
        let replicasets = self.replicasets.list().await?;
        for rs in &replicasets {
            if let Err(err) = self.reconcile(&rs.metadata.name).await {
                error!(replicaset = %rs.metadata.name, "reconcile failed: {err}");
            }
        }
        Ok(())
    }

    /// Converges a single ReplicaSet. Re-fetches it first so a deletion
    /// between list and reconcile is a clean no-op.
    pub async fn reconcile(&self, name: &str) -> Result<(), RegistryError> {
        let mut rs = match self.replicasets.get(name).await {
            Ok(rs) => rs,
            Err(RegistryError::NotFound { .. }) => return Ok(()),
            Err(err) => return Err(err),
        };

        let all_pods = self.pods.list_pods().await?;
        let current = all_pods
            .iter()
            .filter(|pod| pod.is_active_and_owned_by(&rs.metadata))
            .count() as i32;
        let desired = rs.spec.replicas;

        if current < desired {
            for _ in current..desired {
                for container in &rs.spec.template.spec.containers {
                    let mut pod = Pod {
                        metadata: ObjectMeta::named(generate_pod_name(&rs.metadata.name)),
                        spec: PodSpec {
                            containers: vec![container.clone()],
                            replicas: 0,
                        },
                        ..Default::default()
                    };
                    self.pods.create_pod(&mut pod).await?;
                    info!(pod = %pod.metadata.name, replicaset = %name, "created pod");
                }
            }
            rs.status.replicas = desired;
            self.replicasets.update(&rs).await
        } else if current > desired {
            // Deletion of surplus pods is not implemented; record the
            // desired count and move on.
            rs.status.replicas = desired;
            self.replicasets.update(&rs).await
        } else {
            Ok(())
        }
    }
}

/// Pod names are `<replicaset>-<5 char suffix>`; the dash is part of the
/// generator base so truncation keeps the total under the name limit.
fn generate_pod_name(replicaset_name: &str) -> String {
    names::generate_name(&format!("{replicaset_name}-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pod_names_extend_the_replicaset_name() {
        let name = generate_pod_name("example-replicaset");
        assert!(name.starts_with("example-replicaset-"));
        assert_eq!(name.len(), "example-replicaset-".len() + 5);
    }

    #[test]
    fn pod_names_never_exceed_the_limit() {
        let name = generate_pod_name(&"r".repeat(80));
        assert_eq!(name.len(), 63);
    }
}
