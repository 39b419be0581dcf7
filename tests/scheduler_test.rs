use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rkube::models::{Container, Node, NodeStatus, ObjectMeta, Pod, PodSpec, PodStatus};
use rkube::registry::{NodeRegistry, PodRegistry};
use rkube::scheduler::Scheduler;
use rkube::storage::{MemoryStore, Storage};

fn setup() -> (Arc<PodRegistry>, Arc<NodeRegistry>, Scheduler) {
    let storage = Storage::new(Arc::new(MemoryStore::new()));
    let pods = Arc::new(PodRegistry::new(storage.clone()));
    let nodes = Arc::new(NodeRegistry::new(storage));
    let scheduler = Scheduler::new(pods.clone(), nodes.clone(), Duration::from_secs(1));
    (pods, nodes, scheduler)
}

fn pod(name: &str) -> Pod {
    Pod {
        metadata: ObjectMeta::named(name),
        spec: PodSpec {
            containers: vec![Container {
                name: "nginx".into(),
                image: "nginx:latest".into(),
            }],
            replicas: 0,
        },
        ..Default::default()
    }
}

fn node(name: &str) -> Node {
    Node {
        metadata: ObjectMeta::named(name),
        status: NodeStatus::Ready,
        ..Default::default()
    }
}

#[tokio::test]
async fn pending_pods_are_bound_to_a_registered_node() {
    let (pods, nodes, scheduler) = setup();
    for name in ["node-1", "node-2", "node-3"] {
        nodes.create_node(&mut node(name)).await.unwrap();
    }
    pods.create_pod(&mut pod("p1")).await.unwrap();

    scheduler.schedule_pending_pods().await.unwrap();

    let bound = pods.get_pod("p1").await.unwrap();
    assert_eq!(bound.status, PodStatus::Scheduled);
    let node_names: HashSet<String> = ["node-1", "node-2", "node-3"]
        .into_iter()
        .map(String::from)
        .collect();
    assert!(node_names.contains(&bound.node_name));
}

#[tokio::test]
async fn without_nodes_pods_stay_pending() {
    let (pods, _nodes, scheduler) = setup();
    pods.create_pod(&mut pod("p1")).await.unwrap();

    scheduler.schedule_pending_pods().await.unwrap();
    scheduler.schedule_pending_pods().await.unwrap();

    let unbound = pods.get_pod("p1").await.unwrap();
    assert_eq!(unbound.status, PodStatus::Pending);
    assert!(unbound.node_name.is_empty());
}

#[tokio::test]
async fn every_pending_pod_is_bound_in_one_pass() {
    let (pods, nodes, scheduler) = setup();
    nodes.create_node(&mut node("node-1")).await.unwrap();
    nodes.create_node(&mut node("node-2")).await.unwrap();
    for i in 0..5 {
        pods.create_pod(&mut pod(&format!("p{i}"))).await.unwrap();
    }

    scheduler.schedule_pending_pods().await.unwrap();

    for p in pods.list_pods().await.unwrap() {
        assert_eq!(p.status, PodStatus::Scheduled);
        assert!(!p.node_name.is_empty());
    }
    assert!(pods.list_pending_pods().await.unwrap().is_empty());
}

#[tokio::test]
async fn bound_pods_are_never_rebound() {
    let (pods, nodes, scheduler) = setup();
    nodes.create_node(&mut node("node-1")).await.unwrap();
    pods.create_pod(&mut pod("p1")).await.unwrap();

    scheduler.schedule_pending_pods().await.unwrap();
    let first = pods.get_pod("p1").await.unwrap();

    nodes.create_node(&mut node("node-2")).await.unwrap();
    scheduler.schedule_pending_pods().await.unwrap();

    let second = pods.get_pod("p1").await.unwrap();
    assert_eq!(second.node_name, first.node_name);
    assert_eq!(second.status, PodStatus::Scheduled);
}

#[tokio::test]
async fn scheduler_binds_even_to_unready_nodes() {
    // Node status is not consulted when placing pods.
    let (pods, nodes, scheduler) = setup();
    let mut unready = node("node-1");
    unready.status = NodeStatus::NotReady;
    nodes.create_node(&mut unready).await.unwrap();
    pods.create_pod(&mut pod("p1")).await.unwrap();

    scheduler.schedule_pending_pods().await.unwrap();

    let bound = pods.get_pod("p1").await.unwrap();
    assert_eq!(bound.node_name, "node-1");
}
