//! Cluster API collaborator
//!
//! The sweeper talks to the cluster through [`PodApi`] so tests can
//! substitute a fake. [`KubePodApi`] is the real implementation over an
//! authenticated `kube` client.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::warn;

use crate::error::{DeleteError, ListError};
use crate::models::PodSnapshot;

/// Operations the sweeper needs from the cluster
#[async_trait]
pub trait PodApi: Send + Sync {
    /// List every pod in the namespace as a snapshot sequence
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, ListError>;

    /// Delete one pod by name
    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), DeleteError>;
}

/// [`PodApi`] backed by a `kube` client
#[derive(Clone)]
pub struct KubePodApi {
    client: Client,
}

impl KubePodApi {
    /// Connect using the ambient configuration: in-cluster service
    /// account first, then the local kubeconfig.
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("failed to load cluster configuration")?;
        Ok(Self { client })
    }

    /// Connect using an explicit kubeconfig file
    pub async fn from_kubeconfig(path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(path)
            .with_context(|| format!("failed to read kubeconfig at {}", path.display()))?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context("failed to build cluster configuration from kubeconfig")?;
        let client = Client::try_from(config).context("failed to build cluster client")?;
        Ok(Self { client })
    }

    /// Wrap an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl PodApi for KubePodApi {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, ListError> {
        let list = self
            .pods(namespace)
            .list(&ListParams::default())
            .await
            .map_err(|source| ListError {
                namespace: namespace.to_string(),
                source,
            })?;

        let snapshots = list
            .items
            .iter()
            .filter_map(|pod| {
                let snapshot = PodSnapshot::from_pod(pod);
                if snapshot.is_none() {
                    // Unnamed pods cannot be addressed for deletion.
                    warn!(namespace = %namespace, "skipping pod without a name");
                }
                snapshot
            })
            .collect();
        Ok(snapshots)
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), DeleteError> {
        self.pods(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(DeleteError::from_kube)?;
        Ok(())
    }
}
