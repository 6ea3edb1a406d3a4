//! slipway-core — shared domain model for the Slipway release engine.
//!
//! Slipway tracks deployment attempts against an orchestration cluster and
//! drives canary/blue-green variants of a workload. This crate holds the
//! pieces every other Slipway crate needs:
//!
//! - **`types`** — cluster object references, pods, label selectors
//! - **`manifest`** — the in-memory model of a rendered manifest set
//! - **`config`** — engine configuration (retention, suffixes, label keys)
//! - **`port`** — the narrow cluster-facing port trait and its in-memory
//!   test double
//!
//! The engine never parses YAML and never talks to the orchestration API
//! directly: rendered manifests arrive already structured, and all cluster
//! access goes through [`port::ClusterPort`].

pub mod config;
pub mod manifest;
pub mod port;
pub mod types;

pub use config::EngineConfig;
pub use manifest::{
    ManifestObject, ManifestSet, PlainManifest, TrafficSplitManifest, WorkloadManifest,
};
pub use port::{ClusterError, ClusterPort, ClusterResult, InMemoryCluster};
pub use types::{LabelSelector, Pod, ResourceRef};
