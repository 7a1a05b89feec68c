//! Core library for the pod janitor
//!
//! This crate provides the pieces of a namespace cleanup sweep:
//! - Pod status snapshots and the classification rules over them
//! - The cluster collaborator used to list and delete pods
//! - The sweeper that ties listing, classification, and deletion together

pub mod classifier;
pub mod cluster;
pub mod error;
pub mod models;
pub mod sweeper;

pub use classifier::{evaluate, should_delete, DeleteReason};
pub use cluster::{KubePodApi, PodApi};
pub use error::{DeleteError, ListError, SweepError};
pub use models::{ContainerReadiness, PodPhase, PodSnapshot, RestartPolicy};
pub use sweeper::{DeleteOutcome, SweepReport, Sweeper, SweptPod};
