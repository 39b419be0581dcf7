pub mod replicaset_controller;

pub use replicaset_controller::ReplicaSetController;
