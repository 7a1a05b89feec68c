//! Error taxonomy for the sweep
//!
//! Failures split two ways: credential loading and the namespace
//! listing are fatal for the whole sweep, while a failed delete is
//! scoped to one pod and never propagates past the sweep loop.

use thiserror::Error;

/// Listing the namespace failed; fatal for the sweep
#[derive(Debug, Error)]
#[error("failed to list pods in namespace {namespace}")]
pub struct ListError {
    pub namespace: String,
    #[source]
    pub source: kube::Error,
}

/// A single delete call failed
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The pod was already gone when the delete arrived
    #[error("pod not found")]
    NotFound,
    /// The API server rejected the delete
    #[error("api error (status {code}): {message}")]
    Api { code: u16, message: String },
    /// The request never produced an API response
    #[error("transport error")]
    Transport(#[source] kube::Error),
}

impl DeleteError {
    /// Map a `kube` client error, distinguishing the benign
    /// already-gone case from real failures.
    pub fn from_kube(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) if resp.code == 404 => DeleteError::NotFound,
            kube::Error::Api(resp) => DeleteError::Api {
                code: resp.code,
                message: resp.message,
            },
            other => DeleteError::Transport(other),
        }
    }

    /// True when the pod was already gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeleteError::NotFound)
    }
}

/// Fatal sweep failure
///
/// Delete failures are deliberately absent: they surface in the
/// [`SweepReport`](crate::sweeper::SweepReport) instead.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    List(#[from] ListError),
}
