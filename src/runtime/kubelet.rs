use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::{Node, NodeStatus, ObjectMeta, Pod, PodStatus};
use crate::registry::names;

use super::{ContainerRuntime, ContainerState};

const POLL_INTERVAL: Duration = Duration::from_secs(10);
const STATUS_INTERVAL: Duration = Duration::from_secs(10);
const REGISTER_ATTEMPTS: u32 = 5;
const REGISTER_BACKOFF: Duration = Duration::from_secs(2);

pub const POD_NAME_LABEL: &str = "rkube.pod.name";
pub const POD_NAMESPACE_LABEL: &str = "rkube.pod.namespace";
pub const CONTAINER_NAME_LABEL: &str = "rkube.container.name";

/// A pod this agent has accepted, plus the runtime container name recorded
/// for each spec container that reached the create step.
#[derive(Debug, Clone)]
struct TrackedPod {
    pod: Pod,
    containers: HashMap<String, String>,
}

/// Node agent: registers its node, polls the API server for assignments,
/// materializes pod specs as containers, and reports observed status back.
#[derive(Clone)]
pub struct Kubelet {
    node_name: String,
    base_url: String,
    http: reqwest::Client,
    runtime: Arc<dyn ContainerRuntime>,
    pods: Arc<Mutex<HashMap<String, TrackedPod>>>,
}

impl Kubelet {
    pub fn new(node_name: String, api_server_url: &str, runtime: Arc<dyn ContainerRuntime>) -> Self {
        let base_url = if api_server_url.starts_with("http://") || api_server_url.starts_with("https://") {
            api_server_url.trim_end_matches('/').to_string()
        } else {
            format!("http://{api_server_url}")
        };

        Self {
            node_name,
            base_url,
            http: reqwest::Client::new(),
            runtime,
            pods: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers the node, then runs the assignment poller and the status
    /// reporter until the token is cancelled. Containers belonging to this
    /// agent are removed on the way out.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        self.register_node().await?;

        let poller = {
            let kubelet = self.clone();
            let token = shutdown.clone();
            tokio::spawn(async move { kubelet.poll_assignments(token).await })
        };
        let reporter = {
            let kubelet = self.clone();
            let token = shutdown.clone();
            tokio::spawn(async move { kubelet.report_statuses(token).await })
        };

        let _ = poller.await;
        let _ = reporter.await;

        if let Err(err) = self.cleanup_containers().await {
            warn!("container cleanup failed: {err:#}");
        }
        Ok(())
    }

    /// Registers this node as `Ready`. Transport errors are retried with a
    /// fixed backoff; a definitive rejection from the server aborts startup.
    pub async fn register_node(&self) -> Result<()> {
        let node = Node {
            metadata: ObjectMeta::named(&self.node_name),
            status: NodeStatus::Ready,
            ..Default::default()
        };

        let url = format!("{}/api/v1/nodes", self.base_url);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.http.post(&url).json(&node).send().await {
                Ok(resp) if resp.status() == StatusCode::CREATED => {
                    info!(node = %self.node_name, "registered node");
                    return Ok(());
                }
                Ok(resp) => {
                    return Err(anyhow!(
                        "failed to register node, status code: {}",
                        resp.status()
                    ));
                }
                Err(err) if attempt < REGISTER_ATTEMPTS => {
                    warn!("node registration attempt {attempt} failed: {err}");
                    tokio::time::sleep(REGISTER_BACKOFF).await;
                }
                Err(err) => return Err(err).context("failed to register node"),
            }
        }
    }

    async fn poll_assignments(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.poll_assignments_once().await {
                        warn!("failed to fetch pod assignments: {err:#}");
                    }
                }
                _ = shutdown.cancelled() => return,
            }
        }
    }

    /// One poll: fetch the pods bound to this node and spawn a runner for
    /// each one not seen before.
    pub async fn poll_assignments_once(&self) -> Result<()> {
        for pod in self.fetch_assignments().await? {
            let is_new = {
                let mut tracked = self.pods.lock().await;
                if tracked.contains_key(&pod.metadata.name) {
                    false
                } else {
                    tracked.insert(
                        pod.metadata.name.clone(),
                        TrackedPod {
                            pod: pod.clone(),
                            containers: HashMap::new(),
                        },
                    );
                    true
                }
            };

            if is_new {
                info!(pod = %pod.metadata.name, "new pod assigned");
                let kubelet = self.clone();
                tokio::spawn(async move { kubelet.run_pod(pod).await });
            }
        }
        Ok(())
    }

    async fn fetch_assignments(&self) -> Result<Vec<Pod>> {
        let url = format!(
            "{}/api/v1/pods?nodeName={}",
            self.base_url, self.node_name
        );
        let pods: Vec<Pod> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The server ignores the query parameter and returns every pod;
        // keep only the ones bound to this node.
        Ok(pods
            .into_iter()
            .filter(|pod| pod.node_name == self.node_name)
            .collect())
    }

    /// Pulls, creates, and starts every container of the pod. Failures are
    /// logged per container; the remaining containers still run.
    pub async fn run_pod(&self, pod: Pod) {
        info!(pod = %pod.metadata.name, "running pod");
        for container in &pod.spec.containers {
            if let Err(err) = self
                .start_pod_container(&pod, &container.name, &container.image)
                .await
            {
                error!(
                    pod = %pod.metadata.name,
                    container = %container.name,
                    "failed to start container: {err:#}"
                );
            }
        }
    }

    async fn start_pod_container(&self, pod: &Pod, container_name: &str, image: &str) -> Result<()> {
        self.runtime.pull_image(image).await?;

        let labels = HashMap::from([
            (POD_NAME_LABEL.to_string(), pod.metadata.name.clone()),
            (POD_NAMESPACE_LABEL.to_string(), pod.metadata.namespace.clone()),
            (CONTAINER_NAME_LABEL.to_string(), container_name.to_string()),
        ]);
        let unique_name = names::generate_name(&format!("{}-{container_name}-", pod.metadata.name));

        let id = self
            .runtime
            .create_container(&unique_name, image, labels)
            .await?;

        // Record the runtime name before starting so the status reporter
        // sees the container even if the start fails.
        {
            let mut tracked = self.pods.lock().await;
            if let Some(entry) = tracked.get_mut(&pod.metadata.name) {
                entry
                    .containers
                    .insert(container_name.to_string(), unique_name.clone());
            }
        }

        self.runtime.start_container(&id).await?;
        info!(pod = %pod.metadata.name, container = %container_name, id = %id, "started container");
        Ok(())
    }

    async fn report_statuses(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(STATUS_INTERVAL);
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.report_statuses_once().await {
                        warn!("status reporting pass failed: {err:#}");
                    }
                }
                _ = shutdown.cancelled() => return,
            }
        }
    }

    /// One reporting pass: derive each tracked pod's status from its
    /// containers and PUT it back when it changed.
    pub async fn report_statuses_once(&self) -> Result<()> {
        let snapshot: Vec<TrackedPod> = self.pods.lock().await.values().cloned().collect();

        for entry in snapshot {
            let name = entry.pod.metadata.name.clone();
            let status = match self.pod_status(&entry).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(pod = %name, "failed to read pod status: {err:#}");
                    continue;
                }
            };

            if status == entry.pod.status {
                continue;
            }

            let mut pod = entry.pod;
            pod.status = status;
            if let Err(err) = self.put_pod(&pod).await {
                warn!(pod = %name, "failed to update pod status: {err:#}");
                continue;
            }

            let mut tracked = self.pods.lock().await;
            if let Some(entry) = tracked.get_mut(&name) {
                entry.pod.status = status;
            }
            info!(pod = %name, ?status, "updated pod status");
        }

        Ok(())
    }

    async fn pod_status(&self, entry: &TrackedPod) -> Result<PodStatus> {
        let mut states = Vec::with_capacity(entry.pod.spec.containers.len());
        for container in &entry.pod.spec.containers {
            let state = match entry.containers.get(&container.name) {
                Some(runtime_name) => self.runtime.inspect_container(runtime_name).await?,
                None => ContainerState::default(),
            };
            states.push(state);
        }
        Ok(derive_pod_status(&states))
    }

    async fn put_pod(&self, pod: &Pod) -> Result<()> {
        let url = format!("{}/api/v1/pods/{}", self.base_url, pod.metadata.name);
        let resp = self.http.put(url).json(pod).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(anyhow!(
                "failed to update pod status, status code: {}",
                resp.status()
            ));
        }
        Ok(())
    }

    /// Force-removes every runtime container labeled with a pod tracked by
    /// this agent.
    pub async fn cleanup_containers(&self) -> Result<()> {
        let containers = self
            .runtime
            .list_containers(vec![POD_NAME_LABEL.to_string()], true)
            .await?;

        let tracked = self.pods.lock().await;
        for container in containers {
            let Some(pod_name) = container.labels.get(POD_NAME_LABEL) else {
                continue;
            };
            let Some(entry) = tracked.get(pod_name) else {
                continue;
            };
            if entry.pod.node_name != self.node_name {
                continue;
            }

            match self.runtime.remove_container(&container.id, true).await {
                Ok(()) => info!(container = %container.id, pod = %pod_name, "removed container"),
                Err(err) => error!(container = %container.id, "failed to remove container: {err:#}"),
            }
        }

        Ok(())
    }
}

/// Projects per-container states onto a single pod status: any running
/// container wins; a pod has failed only when at least one container exists
/// and every existing one exited non-zero; all-zero exit codes (including a
/// containerless pod) mean success; anything else is still starting.
pub fn derive_pod_status(states: &[ContainerState]) -> PodStatus {
    if states.iter().any(|state| state.running) {
        return PodStatus::Running;
    }

    let mut any_exists = false;
    let mut all_existing_failed = true;
    for state in states.iter().filter(|state| state.exists) {
        any_exists = true;
        if state.exit_code == 0 {
            all_existing_failed = false;
        }
    }
    if any_exists && all_existing_failed {
        return PodStatus::Failed;
    }

    if states.iter().all(|state| state.exit_code == 0) {
        return PodStatus::Succeeded;
    }

    PodStatus::Scheduled
}
