//! Namespace sweep orchestration
//!
//! Lists every pod in a namespace, runs each snapshot through the
//! classifier, and deletes the matches. Delete failures are logged and
//! counted but never abort the sweep; the next scheduled run is the
//! retry mechanism.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::{self, DeleteReason};
use crate::cluster::PodApi;
use crate::error::{DeleteError, SweepError};

/// Outcome of a delete attempt for one selected pod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// Delete accepted by the API server
    Deleted,
    /// The pod was gone before the delete arrived
    AlreadyGone,
    /// Delete rejected or failed
    Failed(String),
    /// Dry run: the pod matched but no delete was issued
    WouldDelete,
}

/// One selected pod's record in the sweep report
#[derive(Debug, Clone, Serialize)]
pub struct SweptPod {
    pub name: String,
    pub reason: DeleteReason,
    pub outcome: DeleteOutcome,
}

/// Summary of a completed sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub namespace: String,
    /// Pods inspected
    pub scanned: usize,
    /// Delete calls that succeeded
    pub deleted: usize,
    /// Delete calls that found the pod already removed
    pub already_gone: usize,
    /// Delete calls that failed for any other reason
    pub failed: usize,
    /// Per-pod records for everything that matched a rule
    pub pods: Vec<SweptPod>,
}

/// Sweeps a namespace: list, classify, delete
pub struct Sweeper {
    api: Arc<dyn PodApi>,
    stuck_threshold_minutes: i64,
    dry_run: bool,
}

impl Sweeper {
    pub fn new(api: Arc<dyn PodApi>, stuck_threshold_minutes: i64) -> Self {
        Self {
            api,
            stuck_threshold_minutes,
            dry_run: false,
        }
    }

    /// Classify and report without issuing deletes
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run one full sweep over `namespace`
    ///
    /// Fatal only when the listing itself fails. Pods are processed
    /// sequentially in list order, with one API call outstanding at a
    /// time; each pod's decision is independent of the others.
    pub async fn sweep(&self, namespace: &str) -> Result<SweepReport, SweepError> {
        let pods = self.api.list_pods(namespace).await?;
        // One notion of "now" for the whole sweep.
        let now = Utc::now();

        let mut report = SweepReport {
            namespace: namespace.to_string(),
            scanned: pods.len(),
            deleted: 0,
            already_gone: 0,
            failed: 0,
            pods: Vec::new(),
        };

        for pod in &pods {
            debug!(
                pod = %pod.name,
                namespace = %namespace,
                phase = ?pod.phase,
                reason = pod.reason.as_deref().unwrap_or("-"),
                "inspecting pod"
            );

            let Some(reason) = classifier::evaluate(pod, self.stuck_threshold_minutes, now)
            else {
                continue;
            };
            info!(pod = %pod.name, namespace = %namespace, %reason, "pod selected for deletion");

            let outcome = if self.dry_run {
                DeleteOutcome::WouldDelete
            } else {
                match self.api.delete_pod(&pod.name, namespace).await {
                    Ok(()) => {
                        info!(pod = %pod.name, namespace = %namespace, "pod deleted");
                        DeleteOutcome::Deleted
                    }
                    Err(DeleteError::NotFound) => {
                        debug!(pod = %pod.name, namespace = %namespace, "pod already gone");
                        DeleteOutcome::AlreadyGone
                    }
                    Err(err) => {
                        warn!(pod = %pod.name, namespace = %namespace, error = %err, "delete failed");
                        DeleteOutcome::Failed(err.to_string())
                    }
                }
            };

            match outcome {
                DeleteOutcome::Deleted => report.deleted += 1,
                DeleteOutcome::AlreadyGone => report.already_gone += 1,
                DeleteOutcome::Failed(_) => report.failed += 1,
                DeleteOutcome::WouldDelete => {}
            }
            report.pods.push(SweptPod {
                name: pod.name.clone(),
                reason,
                outcome,
            });
        }

        info!(
            namespace = %namespace,
            scanned = report.scanned,
            deleted = report.deleted,
            already_gone = report.already_gone,
            failed = report.failed,
            "sweep finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListError;
    use crate::models::{ContainerReadiness, PodPhase, PodSnapshot, RestartPolicy};
    use async_trait::async_trait;
    use kube::core::ErrorResponse;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mock cluster for testing
    ///
    /// Deleting removes the pod from the listing, so back-to-back
    /// sweeps see the post-delete state.
    struct MockPodApi {
        pods: Mutex<Vec<PodSnapshot>>,
        fail_deletes: HashSet<String>,
        missing: HashSet<String>,
        fail_list: bool,
        delete_calls: Mutex<Vec<String>>,
    }

    impl MockPodApi {
        fn new(pods: Vec<PodSnapshot>) -> Self {
            Self {
                pods: Mutex::new(pods),
                fail_deletes: HashSet::new(),
                missing: HashSet::new(),
                fail_list: false,
                delete_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_delete(mut self, name: &str) -> Self {
            self.fail_deletes.insert(name.to_string());
            self
        }

        fn missing_pod(mut self, name: &str) -> Self {
            self.missing.insert(name.to_string());
            self
        }

        fn failing_list(mut self) -> Self {
            self.fail_list = true;
            self
        }

        fn deleted_names(&self) -> Vec<String> {
            self.delete_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PodApi for MockPodApi {
        async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSnapshot>, ListError> {
            if self.fail_list {
                return Err(ListError {
                    namespace: namespace.to_string(),
                    source: kube::Error::Api(ErrorResponse {
                        status: "Failure".to_string(),
                        message: "forbidden".to_string(),
                        reason: "Forbidden".to_string(),
                        code: 403,
                    }),
                });
            }
            Ok(self.pods.lock().unwrap().clone())
        }

        async fn delete_pod(&self, name: &str, _namespace: &str) -> Result<(), DeleteError> {
            self.delete_calls.lock().unwrap().push(name.to_string());
            if self.fail_deletes.contains(name) {
                return Err(DeleteError::Api {
                    code: 500,
                    message: "internal error".to_string(),
                });
            }
            if self.missing.contains(name) {
                return Err(DeleteError::NotFound);
            }
            self.pods.lock().unwrap().retain(|p| p.name != name);
            Ok(())
        }
    }

    fn pod(name: &str, phase: PodPhase) -> PodSnapshot {
        PodSnapshot {
            name: name.to_string(),
            namespace: "default".to_string(),
            phase,
            reason: None,
            restart_policy: RestartPolicy::Always,
            start_time: Some(Utc::now()),
            containers: vec![ContainerReadiness { ready: true }],
        }
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_eligible_pods() {
        let api = Arc::new(MockPodApi::new(vec![
            pod("finished", PodPhase::Succeeded),
            pod("serving", PodPhase::Running),
        ]));
        let sweeper = Sweeper::new(api.clone(), 15);

        let report = sweeper.sweep("default").await.unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(api.deleted_names(), vec!["finished".to_string()]);
    }

    #[tokio::test]
    async fn test_sweep_continues_after_delete_failure() {
        let api = Arc::new(
            MockPodApi::new(vec![
                pod("doomed", PodPhase::Succeeded),
                pod("finished", PodPhase::Succeeded),
            ])
            .failing_delete("doomed"),
        );
        let sweeper = Sweeper::new(api.clone(), 15);

        let report = sweeper.sweep("default").await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed, 1);
        // Both deletes were attempted despite the first failing.
        assert_eq!(
            api.deleted_names(),
            vec!["doomed".to_string(), "finished".to_string()]
        );
        let doomed = report.pods.iter().find(|p| p.name == "doomed").unwrap();
        assert!(matches!(doomed.outcome, DeleteOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_already_gone_is_not_a_failure() {
        let api = Arc::new(
            MockPodApi::new(vec![pod("ghost", PodPhase::Succeeded)]).missing_pod("ghost"),
        );
        let sweeper = Sweeper::new(api, 15);

        let report = sweeper.sweep("default").await.unwrap();

        assert_eq!(report.already_gone, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.deleted, 0);
    }

    #[tokio::test]
    async fn test_list_failure_is_fatal() {
        let api = Arc::new(MockPodApi::new(vec![]).failing_list());
        let sweeper = Sweeper::new(api, 15);

        let result = sweeper.sweep("default").await;

        assert!(matches!(result, Err(SweepError::List(_))));
    }

    #[tokio::test]
    async fn test_second_sweep_deletes_nothing_new() {
        let api = Arc::new(MockPodApi::new(vec![
            pod("finished", PodPhase::Succeeded),
            pod("serving", PodPhase::Running),
        ]));
        let sweeper = Sweeper::new(api.clone(), 15);

        let first = sweeper.sweep("default").await.unwrap();
        assert_eq!(first.deleted, 1);

        let second = sweeper.sweep("default").await.unwrap();
        assert_eq!(second.scanned, 1);
        assert_eq!(second.deleted, 0);
        assert_eq!(api.deleted_names().len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_issues_no_deletes() {
        let api = Arc::new(MockPodApi::new(vec![pod("finished", PodPhase::Succeeded)]));
        let sweeper = Sweeper::new(api.clone(), 15).dry_run(true);

        let report = sweeper.sweep("default").await.unwrap();

        assert_eq!(report.deleted, 0);
        assert!(api.deleted_names().is_empty());
        assert_eq!(report.pods.len(), 1);
        assert_eq!(report.pods[0].outcome, DeleteOutcome::WouldDelete);
    }

    #[tokio::test]
    async fn test_stuck_pod_is_swept() {
        let mut stuck = pod("wedged", PodPhase::Running);
        stuck.containers = vec![ContainerReadiness { ready: false }];
        stuck.start_time = Some(Utc::now() - chrono::Duration::minutes(30));

        let api = Arc::new(MockPodApi::new(vec![stuck]));
        let sweeper = Sweeper::new(api, 15);

        let report = sweeper.sweep("default").await.unwrap();

        assert_eq!(report.deleted, 1);
        assert!(matches!(
            report.pods[0].reason,
            DeleteReason::Stuck { .. }
        ));
    }
}
