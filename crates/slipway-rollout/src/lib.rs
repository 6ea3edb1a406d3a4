//! slipway-rollout — the progressive-delivery orchestrator.
//!
//! Drives one canary attempt end to end: validates that exactly one
//! workload is under progressive-delivery control, reconciles releases
//! left in progress by a crashed prior attempt, records the new attempt
//! in the history, sizes the canary from the live cluster, relabels the
//! workload manifest, classifies live pods, and records the terminal
//! status.
//!
//! # Components
//!
//! - **`orchestrator`** — [`CanaryOrchestrator`], the per-attempt state
//!   machine
//! - **`classifier`** — pure pod classification against the canary track
//! - **`traffic`** — weighted-routing manifest rewriting
//!
//! The orchestrator holds a working copy of the release history and
//! persists it through the cluster port after every mutation that must
//! survive a crash. It never retries port calls and never polls; both
//! belong to the caller.

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod traffic;

pub use classifier::flag_new_variant;
pub use error::{RolloutError, RolloutResult, ValidationKind, WorkloadValidation};
pub use orchestrator::{CanaryOrchestrator, CanaryPhase, PrepareOutcome};
pub use traffic::update_traffic_split_manifests;
