//! Core data models for the pod janitor

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;
use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by the cluster for a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    /// Parse a phase string as reported by the API server
    ///
    /// Comparison is case-insensitive; anything unrecognized maps to
    /// `Unknown` so it can never satisfy a terminal-phase check.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => PodPhase::Pending,
            "running" => PodPhase::Running,
            "succeeded" => PodPhase::Succeeded,
            "failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

/// Pod-level restart policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

impl RestartPolicy {
    /// Parse a restart policy string
    ///
    /// Absent or unrecognized input maps to `Always`, the cluster
    /// default when the field is unset.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("never") => RestartPolicy::Never,
            Some("onfailure") => RestartPolicy::OnFailure,
            _ => RestartPolicy::Always,
        }
    }
}

/// Readiness of a single container within a pod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerReadiness {
    pub ready: bool,
}

/// Read-only view of one pod at evaluation time
///
/// Built fresh from cluster state on every sweep and discarded after
/// the decision is made; nothing here survives across sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodSnapshot {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub reason: Option<String>,
    pub restart_policy: RestartPolicy,
    pub start_time: Option<DateTime<Utc>>,
    pub containers: Vec<ContainerReadiness>,
}

impl PodSnapshot {
    /// Build a snapshot from the wire representation
    ///
    /// Returns `None` for pods without a metadata name, which cannot be
    /// addressed for deletion. Every other missing field degrades to a
    /// non-matching default instead of erroring.
    pub fn from_pod(pod: &Pod) -> Option<Self> {
        let name = pod.metadata.name.clone()?;
        let namespace = pod.metadata.namespace.clone().unwrap_or_default();
        let status = pod.status.as_ref();

        let phase = status
            .and_then(|s| s.phase.as_deref())
            .map(PodPhase::parse)
            .unwrap_or(PodPhase::Unknown);
        let reason = status
            .and_then(|s| s.reason.clone())
            .filter(|r| !r.is_empty());
        let restart_policy =
            RestartPolicy::parse(pod.spec.as_ref().and_then(|s| s.restart_policy.as_deref()));
        let start_time = status.and_then(|s| s.start_time.as_ref()).map(|t| t.0);
        let containers = status
            .and_then(|s| s.container_statuses.as_ref())
            .map(|statuses| {
                statuses
                    .iter()
                    .map(|c| ContainerReadiness { ready: c.ready })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name,
            namespace,
            phase,
            reason,
            restart_policy,
            start_time,
            containers,
        })
    }
}
