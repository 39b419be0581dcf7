use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::Docker;
use futures::StreamExt;
use tracing::info;

use super::{ContainerRuntime, ContainerState, ContainerSummary};

/// Container runtime backed by the local Docker daemon.
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connects and pings the daemon so a missing Docker surfaces at
    /// startup instead of on the first pod.
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        docker.ping().await.context("failed to reach Docker daemon")?;
        info!("Connected to Docker daemon");
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn pull_image(&self, image: &str) -> Result<()> {
        let (image_name, tag) = image.split_once(':').unwrap_or((image, "latest"));

        let options = CreateImageOptions {
            from_image: image_name,
            tag,
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(progress) = stream.next().await {
            let update = progress.with_context(|| format!("failed to pull image {image}"))?;
            if let Some(status) = update.status {
                match update.progress {
                    Some(progress) => info!("Pull progress: {status} - {progress}"),
                    None => info!("Pull status: {status}"),
                }
            }
        }

        info!("Pulled image {image_name}:{tag}");
        Ok(())
    }

    async fn create_container(
        &self,
        name: &str,
        image: &str,
        labels: HashMap<String, String>,
    ) -> Result<String> {
        let options = CreateContainerOptions {
            name: name.to_string(),
            ..Default::default()
        };
        let config = Config {
            image: Some(image.to_string()),
            labels: Some(labels),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(Some(options), config)
            .await
            .with_context(|| format!("failed to create container {name}"))?;
        Ok(created.id)
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .with_context(|| format!("failed to start container {id}"))?;
        Ok(())
    }

    async fn inspect_container(&self, name_or_id: &str) -> Result<ContainerState> {
        match self.docker.inspect_container(name_or_id, None).await {
            Ok(details) => {
                let state = details.state.unwrap_or_default();
                Ok(ContainerState {
                    exists: true,
                    running: state.running.unwrap_or(false),
                    exit_code: state.exit_code.unwrap_or(0),
                })
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(ContainerState::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_containers(
        &self,
        label_filters: Vec<String>,
        all: bool,
    ) -> Result<Vec<ContainerSummary>> {
        let filters = HashMap::from([("label".to_string(), label_filters)]);
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions {
                all,
                filters,
                ..Default::default()
            }))
            .await
            .context("failed to list containers")?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: c.id.unwrap_or_default(),
                labels: c.labels.unwrap_or_default(),
            })
            .collect())
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<()> {
        self.docker
            .remove_container(
                id,
                Some(RemoveContainerOptions {
                    force,
                    ..Default::default()
                }),
            )
            .await
            .with_context(|| format!("failed to remove container {id}"))?;
        Ok(())
    }
}
