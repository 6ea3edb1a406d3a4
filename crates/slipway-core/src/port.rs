//! Cluster-facing port.
//!
//! All access to the orchestration API goes through [`ClusterPort`]: the
//! engine asks for replica counts, pod listings, and the persisted
//! history blob, and never issues API calls itself. Implementations own
//! retry/backoff and timeouts; the engine propagates their failures
//! upward unchanged.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::{Pod, ResourceRef};

/// Result type alias for cluster port operations.
pub type ClusterResult<T> = Result<T, ClusterError>;

/// Errors surfaced by cluster port implementations.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster api error: {0}")]
    Api(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("resource not found: {0}")]
    NotFound(String),
}

/// The single seam between the release engine and the orchestration API.
///
/// Every call is one network round trip; callers apply their own timeout
/// and cancellation around the returned futures.
pub trait ClusterPort: Send + Sync {
    /// Live replica count of a workload, or `None` if the workload does
    /// not exist yet.
    fn replica_count(
        &self,
        workload: &ResourceRef,
    ) -> impl Future<Output = ClusterResult<Option<u32>>> + Send;

    /// Pods in a namespace matching a rendered label selector.
    fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = ClusterResult<Vec<Pod>>> + Send;

    /// The persisted history blob for a release name, or `None` if no
    /// attempt was ever recorded.
    fn read_history(
        &self,
        release_name: &str,
    ) -> impl Future<Output = ClusterResult<Option<String>>> + Send;

    /// Overwrite the persisted history blob for a release name.
    fn write_history(
        &self,
        release_name: &str,
        body: &str,
    ) -> impl Future<Output = ClusterResult<()>> + Send;

    /// Human-readable description of a resource, for operator-facing
    /// logs only — never decision logic.
    fn describe(
        &self,
        resource: &ResourceRef,
    ) -> impl Future<Output = ClusterResult<String>> + Send;
}

#[derive(Default)]
struct InMemoryClusterState {
    replica_counts: HashMap<ResourceRef, u32>,
    /// Pod listings keyed by `(namespace, selector)`.
    pods: HashMap<(String, String), Vec<Pod>>,
    /// History blobs keyed by release name.
    history: HashMap<String, String>,
}

/// In-memory [`ClusterPort`] (for testing).
///
/// Seed it with replica counts and pod listings, then inspect the
/// history blobs the engine writes through it.
#[derive(Default)]
pub struct InMemoryCluster {
    state: Mutex<InMemoryClusterState>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_replica_count(&self, workload: ResourceRef, count: u32) {
        self.state.lock().await.replica_counts.insert(workload, count);
    }

    pub async fn set_pods(&self, namespace: &str, selector: &str, pods: Vec<Pod>) {
        self.state
            .lock()
            .await
            .pods
            .insert((namespace.to_string(), selector.to_string()), pods);
    }

    pub async fn seed_history(&self, release_name: &str, body: &str) {
        self.state
            .lock()
            .await
            .history
            .insert(release_name.to_string(), body.to_string());
    }

    /// The blob most recently written for a release name, if any.
    pub async fn history_blob(&self, release_name: &str) -> Option<String> {
        self.state.lock().await.history.get(release_name).cloned()
    }
}

impl ClusterPort for InMemoryCluster {
    async fn replica_count(&self, workload: &ResourceRef) -> ClusterResult<Option<u32>> {
        Ok(self.state.lock().await.replica_counts.get(workload).copied())
    }

    async fn list_pods(&self, namespace: &str, selector: &str) -> ClusterResult<Vec<Pod>> {
        let key = (namespace.to_string(), selector.to_string());
        Ok(self
            .state
            .lock()
            .await
            .pods
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn read_history(&self, release_name: &str) -> ClusterResult<Option<String>> {
        Ok(self.state.lock().await.history.get(release_name).cloned())
    }

    async fn write_history(&self, release_name: &str, body: &str) -> ClusterResult<()> {
        debug!(release = %release_name, bytes = body.len(), "history blob written");
        self.state
            .lock()
            .await
            .history
            .insert(release_name.to_string(), body.to_string());
        Ok(())
    }

    async fn describe(&self, resource: &ResourceRef) -> ClusterResult<String> {
        Ok(format!("{resource}: in-memory resource"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replica_count_absent_for_unknown_workload() {
        let cluster = InMemoryCluster::new();
        let workload = ResourceRef::new("Deployment", "api", "default");

        assert_eq!(cluster.replica_count(&workload).await.unwrap(), None);

        cluster.set_replica_count(workload.clone(), 4).await;
        assert_eq!(cluster.replica_count(&workload).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn list_pods_empty_without_seed() {
        let cluster = InMemoryCluster::new();
        let pods = cluster.list_pods("default", "release=api").await.unwrap();
        assert!(pods.is_empty());
    }

    #[tokio::test]
    async fn history_write_then_read() {
        let cluster = InMemoryCluster::new();

        assert_eq!(cluster.read_history("api").await.unwrap(), None);

        cluster.write_history("api", "releases: []").await.unwrap();
        assert_eq!(
            cluster.read_history("api").await.unwrap().as_deref(),
            Some("releases: []")
        );
        assert_eq!(
            cluster.history_blob("api").await.as_deref(),
            Some("releases: []")
        );
    }
}
