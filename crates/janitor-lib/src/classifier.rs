//! Cleanup decision rules
//!
//! Pure predicates over a [`PodSnapshot`]; nothing here talks to the
//! cluster or mutates state. A pod is swept when any single rule
//! matches:
//! - its phase is terminal and its controller will never resubmit it
//! - the node evicted it under resource pressure
//! - it has sat not-ready past the configured age threshold

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{PodPhase, PodSnapshot, RestartPolicy};

/// Status reason the node sets on pods it evicts
const EVICTED_REASON: &str = "evicted";

/// Why a pod was selected for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteReason {
    /// Terminal phase that no controller will resubmit
    TerminalPhase,
    /// Evicted by the node under resource pressure
    Evicted,
    /// Not ready past the stuck threshold
    Stuck { not_ready_minutes: i64 },
}

impl fmt::Display for DeleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteReason::TerminalPhase => write!(f, "terminal phase"),
            DeleteReason::Evicted => write!(f, "evicted"),
            DeleteReason::Stuck { not_ready_minutes } => {
                write!(f, "not ready for {}m", not_ready_minutes)
            }
        }
    }
}

/// Decide whether a pod should be swept, and why
///
/// The rules are independent; the reported reason is the first match in
/// rule order. `now` is captured once by the caller so every pod in a
/// sweep shares the same notion of the current time.
pub fn evaluate(
    pod: &PodSnapshot,
    stuck_threshold_minutes: i64,
    now: DateTime<Utc>,
) -> Option<DeleteReason> {
    if is_terminal(pod) {
        return Some(DeleteReason::TerminalPhase);
    }
    if is_evicted(pod) {
        return Some(DeleteReason::Evicted);
    }
    if let Some(minutes) = stuck_minutes(pod, stuck_threshold_minutes, now) {
        return Some(DeleteReason::Stuck {
            not_ready_minutes: minutes,
        });
    }
    None
}

/// Boolean form of [`evaluate`]
pub fn should_delete(pod: &PodSnapshot, stuck_threshold_minutes: i64, now: DateTime<Utc>) -> bool {
    evaluate(pod, stuck_threshold_minutes, now).is_some()
}

/// Succeeded pods are always terminal. Failed pods are terminal only
/// under `Never`: with `Always` or `OnFailure` the cluster is expected
/// to resubmit the containers, so the pod is not cleanup-eligible.
fn is_terminal(pod: &PodSnapshot) -> bool {
    match pod.phase {
        PodPhase::Succeeded => true,
        PodPhase::Failed => pod.restart_policy == RestartPolicy::Never,
        _ => false,
    }
}

/// An absent reason never matches; comparison is case-insensitive.
fn is_evicted(pod: &PodSnapshot) -> bool {
    pod.reason
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case(EVICTED_REASON))
}

/// Whole minutes the pod has been running not-ready, if that meets the
/// threshold
///
/// A pod with no start time was never scheduled and is never stuck.
fn stuck_minutes(pod: &PodSnapshot, threshold_minutes: i64, now: DateTime<Utc>) -> Option<i64> {
    if pod.containers.iter().all(|c| c.ready) {
        return None;
    }
    let start = pod.start_time?;
    let minutes = now.signed_duration_since(start).num_minutes();
    (minutes >= threshold_minutes).then_some(minutes)
}
