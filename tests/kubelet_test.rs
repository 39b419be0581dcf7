mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeRuntime;
use rkube::models::{Container, NodeStatus, ObjectMeta, Pod, PodSpec, PodStatus};
use rkube::runtime::kubelet::{CONTAINER_NAME_LABEL, POD_NAME_LABEL};
use rkube::runtime::Kubelet;

fn scheduled_pod(name: &str, node: &str) -> Pod {
    Pod {
        metadata: ObjectMeta::named(name),
        spec: PodSpec {
            containers: vec![Container {
                name: "nginx".into(),
                image: "nginx:latest".into(),
            }],
            replicas: 0,
        },
        node_name: node.into(),
        status: PodStatus::Scheduled,
    }
}

async fn setup() -> (common::TestCluster, Arc<FakeRuntime>, Kubelet) {
    let cluster = common::spawn_api_server().await;
    let runtime = Arc::new(FakeRuntime::default());
    let kubelet = Kubelet::new(
        "node-1".to_string(),
        &format!("http://{}", cluster.addr),
        runtime.clone(),
    );
    (cluster, runtime, kubelet)
}

// Spawned pod runners finish quickly against the fake runtime; give them a
// moment rather than plumbing completion out of the poller.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn registration_creates_a_ready_node() {
    let (cluster, _runtime, kubelet) = setup().await;

    kubelet.register_node().await.unwrap();

    let node = cluster.state.nodes.get_node("node-1").await.unwrap();
    assert_eq!(node.status, NodeStatus::Ready);
}

#[tokio::test]
async fn assigned_pods_get_containers_and_report_running() {
    let (cluster, runtime, kubelet) = setup().await;
    kubelet.register_node().await.unwrap();

    let mut pod = scheduled_pod("p1", "node-1");
    cluster.state.pods.create_pod(&mut pod).await.unwrap();

    kubelet.poll_assignments_once().await.unwrap();
    settle().await;

    let names = runtime.names();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("p1-nginx-"));
    assert_eq!(names[0].len(), "p1-nginx-".len() + 5);

    let containers = runtime.containers.lock().unwrap().clone();
    let container = containers.values().next().unwrap();
    assert_eq!(container.labels.get(POD_NAME_LABEL).unwrap(), "p1");
    assert_eq!(container.labels.get(CONTAINER_NAME_LABEL).unwrap(), "nginx");
    drop(containers);

    kubelet.report_statuses_once().await.unwrap();

    let reported = cluster.state.pods.get_pod("p1").await.unwrap();
    assert_eq!(reported.status, PodStatus::Running);
}

#[tokio::test]
async fn pods_bound_elsewhere_are_ignored() {
    let (cluster, runtime, kubelet) = setup().await;
    kubelet.register_node().await.unwrap();

    let mut pod = scheduled_pod("p1", "node-2");
    cluster.state.pods.create_pod(&mut pod).await.unwrap();

    kubelet.poll_assignments_once().await.unwrap();
    settle().await;

    assert_eq!(runtime.len(), 0);
}

#[tokio::test]
async fn exited_containers_move_the_pod_to_terminal_status() {
    let (cluster, runtime, kubelet) = setup().await;
    kubelet.register_node().await.unwrap();

    let mut pod = scheduled_pod("p1", "node-1");
    cluster.state.pods.create_pod(&mut pod).await.unwrap();
    kubelet.poll_assignments_once().await.unwrap();
    settle().await;

    runtime.finish("p1", 0);
    kubelet.report_statuses_once().await.unwrap();
    assert_eq!(
        cluster.state.pods.get_pod("p1").await.unwrap().status,
        PodStatus::Succeeded
    );

    runtime.finish("p1", 1);
    kubelet.report_statuses_once().await.unwrap();
    assert_eq!(
        cluster.state.pods.get_pod("p1").await.unwrap().status,
        PodStatus::Failed
    );
}

#[tokio::test]
async fn repeated_polls_do_not_duplicate_containers() {
    let (cluster, runtime, kubelet) = setup().await;
    kubelet.register_node().await.unwrap();

    let mut pod = scheduled_pod("p1", "node-1");
    cluster.state.pods.create_pod(&mut pod).await.unwrap();

    kubelet.poll_assignments_once().await.unwrap();
    settle().await;
    kubelet.poll_assignments_once().await.unwrap();
    settle().await;

    assert_eq!(runtime.len(), 1);
}

#[tokio::test]
async fn cleanup_removes_this_agents_containers() {
    let (cluster, runtime, kubelet) = setup().await;
    kubelet.register_node().await.unwrap();

    let mut pod = scheduled_pod("p1", "node-1");
    cluster.state.pods.create_pod(&mut pod).await.unwrap();
    kubelet.poll_assignments_once().await.unwrap();
    settle().await;
    assert_eq!(runtime.len(), 1);

    kubelet.cleanup_containers().await.unwrap();
    assert_eq!(runtime.len(), 0);
}
