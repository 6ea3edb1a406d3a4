//! Rollout error types.

use std::fmt;

use slipway_core::ClusterError;
use slipway_history::HistoryError;
use thiserror::Error;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Why workload validation rejected a manifest set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    NoEligibleWorkloads,
    MultipleWorkloads { count: usize },
}

/// Operator-facing rejection of a manifest set, as a hint/explanation
/// pair suitable for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadValidation {
    pub kind: ValidationKind,
    /// Short summary of what is wrong.
    pub hint: String,
    /// What was found and what to change.
    pub explanation: String,
}

impl WorkloadValidation {
    pub fn none_eligible() -> Self {
        Self {
            kind: ValidationKind::NoEligibleWorkloads,
            hint: "no workload eligible for progressive delivery".to_string(),
            explanation: "the rendered manifests contain no workload under \
                          progressive-delivery control; add a workload manifest \
                          or remove the apply-direct annotation from one"
                .to_string(),
        }
    }

    pub fn multiple(count: usize) -> Self {
        Self {
            kind: ValidationKind::MultipleWorkloads { count },
            hint: "multiple workloads eligible for progressive delivery".to_string(),
            explanation: format!(
                "found {count} eligible workloads; progressive delivery controls \
                 exactly one workload per attempt, mark the others apply-direct"
            ),
        }
    }
}

impl fmt::Display for WorkloadValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.hint, self.explanation)
    }
}

/// Errors that can occur while driving a canary attempt.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// The manifest set failed workload validation.
    #[error("{0}")]
    Validation(WorkloadValidation),

    /// An operation that assumes a prepared release was called first.
    #[error("no release prepared for this attempt")]
    NotPrepared,

    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
