// Shared helpers: an in-process API server over the in-memory store, and a
// fake container runtime standing in for the Docker daemon.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use rkube::api::server::{app, AppState};
use rkube::runtime::kubelet::POD_NAME_LABEL;
use rkube::runtime::{ContainerRuntime, ContainerState, ContainerSummary};
use rkube::storage::{MemoryStore, Storage};

#[allow(dead_code)]
pub struct TestCluster {
    pub addr: SocketAddr,
    pub state: AppState,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestCluster {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/api/v1{}", self.addr, path)
    }

    pub fn root_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Binds the API server to an ephemeral port and returns a handle that can
/// drive it over HTTP or reach the registries directly.
pub async fn spawn_api_server() -> TestCluster {
    let storage = Storage::new(Arc::new(MemoryStore::new()));
    let state = AppState::new(storage);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestCluster {
        addr,
        state,
        client: reqwest::Client::new(),
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub state: ContainerState,
    pub labels: HashMap<String, String>,
}

/// In-memory stand-in for the Docker daemon. New containers come up
/// running once started; tests flip their state to simulate exits.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeRuntime {
    pub containers: Mutex<HashMap<String, FakeContainer>>,
}

#[allow(dead_code)]
impl FakeRuntime {
    /// Marks every container of the given pod as exited.
    pub fn finish(&self, pod_name: &str, exit_code: i64) {
        let mut containers = self.containers.lock().unwrap();
        for container in containers.values_mut() {
            if container.labels.get(POD_NAME_LABEL).map(String::as_str) == Some(pod_name) {
                container.state.running = false;
                container.state.exit_code = exit_code;
            }
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.containers.lock().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.containers.lock().unwrap().len()
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn pull_image(&self, _image: &str) -> Result<()> {
        Ok(())
    }

    async fn create_container(
        &self,
        name: &str,
        _image: &str,
        labels: HashMap<String, String>,
    ) -> Result<String> {
        self.containers.lock().unwrap().insert(
            name.to_string(),
            FakeContainer {
                state: ContainerState {
                    exists: true,
                    running: false,
                    exit_code: 0,
                },
                labels,
            },
        );
        Ok(name.to_string())
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        if let Some(container) = self.containers.lock().unwrap().get_mut(id) {
            container.state.running = true;
        }
        Ok(())
    }

    async fn inspect_container(&self, name_or_id: &str) -> Result<ContainerState> {
        Ok(self
            .containers
            .lock()
            .unwrap()
            .get(name_or_id)
            .map(|c| c.state)
            .unwrap_or_default())
    }

    async fn list_containers(
        &self,
        label_filters: Vec<String>,
        _all: bool,
    ) -> Result<Vec<ContainerSummary>> {
        Ok(self
            .containers
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| {
                label_filters
                    .iter()
                    .all(|key| c.labels.contains_key(key.split('=').next().unwrap_or(key)))
            })
            .map(|(id, c)| ContainerSummary {
                id: id.clone(),
                labels: c.labels.clone(),
            })
            .collect())
    }

    async fn remove_container(&self, id: &str, _force: bool) -> Result<()> {
        self.containers.lock().unwrap().remove(id);
        Ok(())
    }
}
