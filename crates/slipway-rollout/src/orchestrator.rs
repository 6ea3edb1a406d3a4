//! Canary orchestrator — drives one progressive-delivery attempt.
//!
//! One orchestrator instance covers one attempt against one release
//! name. The surrounding platform serializes attempts per target before
//! invoking it, so the orchestrator assumes exclusive ownership of the
//! persisted history for the duration of the attempt.
//!
//! Phases run in order: prepare (validate, recover, record), size,
//! relabel, then — after the pipeline applies the mutated manifests —
//! classify, and finally succeed or fail. Every mutation that must
//! survive a crash re-encodes and rewrites the whole history blob
//! through the cluster port before the next phase begins.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use slipway_core::{
    ClusterPort, EngineConfig, LabelSelector, ManifestSet, Pod, ResourceRef,
    TrafficSplitManifest,
};
use slipway_history::{codec, Release, ReleaseHistory, ReleaseStatus};

use crate::classifier;
use crate::error::{RolloutError, RolloutResult, WorkloadValidation};
use crate::traffic;

/// Phase of one canary attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanaryPhase {
    /// Validating manifests and recording the attempt.
    Preparing,
    /// Deciding how many replicas the canary should run.
    Sizing,
    /// Mutating the workload manifest (name, labels, replicas).
    Relabeling,
    /// Classifying live pods after the pipeline applied the manifests.
    Classifying,
    Succeeded,
    Failed,
}

/// Result of preparing a manifest set for canary delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum PrepareOutcome {
    /// The attempt was recorded and the history persisted.
    Ready(Release),
    /// The manifest set was rejected by validation; nothing was recorded.
    Rejected(WorkloadValidation),
}

/// Per-attempt state machine for progressive delivery.
pub struct CanaryOrchestrator<C: ClusterPort> {
    cluster: C,
    config: EngineConfig,
    release_name: String,
    history: ReleaseHistory,
    /// The rendered set under mutation; the pipeline applies it after
    /// relabeling.
    manifests: Option<ManifestSet>,
    /// Index of the controlled workload within `manifests`.
    workload_index: Option<usize>,
    /// The production workload as it exists before this attempt,
    /// under its original name.
    stable_workload: Option<ResourceRef>,
    /// Replica count declared by the rendered manifest, if any.
    declared_replicas: Option<u32>,
    target_instances: Option<u32>,
    phase: CanaryPhase,
}

impl<C: ClusterPort> CanaryOrchestrator<C> {
    pub fn new(cluster: C, config: EngineConfig, release_name: impl Into<String>) -> Self {
        Self {
            cluster,
            config,
            release_name: release_name.into(),
            history: ReleaseHistory::new(),
            manifests: None,
            workload_index: None,
            stable_workload: None,
            declared_replicas: None,
            target_instances: None,
            phase: CanaryPhase::Preparing,
        }
    }

    pub fn phase(&self) -> CanaryPhase {
        self.phase
    }

    pub fn release_name(&self) -> &str {
        &self.release_name
    }

    /// The working history copy. Mutations made here must be followed by
    /// [`persist_history`](Self::persist_history) to survive a crash.
    pub fn history(&self) -> &ReleaseHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ReleaseHistory {
        &mut self.history
    }

    /// The manifest set as mutated so far, for the pipeline to apply.
    pub fn manifests(&self) -> Option<&ManifestSet> {
        self.manifests.as_ref()
    }

    pub fn target_instances(&self) -> Option<u32> {
        self.target_instances
    }

    /// The underlying cluster port.
    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    /// Replace the working history with the persisted blob (absent blob
    /// means no attempt was ever recorded).
    pub async fn load_history(&mut self) -> RolloutResult<()> {
        let blob = self.cluster.read_history(&self.release_name).await?;
        self.history = match blob {
            Some(body) => codec::decode(&body)?,
            None => ReleaseHistory::new(),
        };
        debug!(
            release = %self.release_name,
            entries = self.history.len(),
            "history loaded"
        );
        Ok(())
    }

    /// Rewrite the whole history blob through the cluster port.
    pub async fn persist_history(&mut self) -> RolloutResult<()> {
        let body = codec::encode(&self.history)?;
        self.cluster.write_history(&self.release_name, &body).await?;
        debug!(
            release = %self.release_name,
            entries = self.history.len(),
            "history persisted"
        );
        Ok(())
    }

    /// Validate the manifest set, reconcile releases left in progress by
    /// a crashed prior attempt, record the new attempt, and persist.
    ///
    /// Exactly one workload must be eligible for progressive delivery.
    /// With `strict_validation_errors` set, a rejection is returned as a
    /// structured error carrying the operator-facing hint/explanation
    /// pair; otherwise it is reported as [`PrepareOutcome::Rejected`]
    /// without propagating an error.
    pub async fn prepare_for_canary(
        &mut self,
        manifests: ManifestSet,
    ) -> RolloutResult<PrepareOutcome> {
        self.phase = CanaryPhase::Preparing;

        let eligible = manifests.eligible_workload_indices();
        let index = match eligible.as_slice() {
            [single] => *single,
            [] => return self.reject(WorkloadValidation::none_eligible()),
            many => return self.reject(WorkloadValidation::multiple(many.len())),
        };

        self.load_history().await?;
        self.reconcile_stale_in_progress().await?;

        // The controlled workload leads the resource list so the
        // recorded release manages it; the rest keep application order.
        let workload_ref = manifests.objects()[index].resource_ref();
        let mut refs = Vec::with_capacity(manifests.objects().len());
        refs.push(workload_ref.clone());
        refs.extend(
            manifests
                .resource_refs()
                .into_iter()
                .enumerate()
                .filter_map(|(i, r)| (i != index).then_some(r)),
        );

        self.history.create_new_release(refs);
        let digest = manifests.digest()?;
        self.history.set_content_hash_of_latest(digest)?;
        self.history.prune(self.config.history_retention);
        self.persist_history().await?;

        let release = self.history.latest()?.clone();
        info!(
            release = %self.release_name,
            number = release.number,
            workload = %workload_ref,
            "canary attempt recorded"
        );

        self.declared_replicas = manifests.workload(index).and_then(|w| w.replicas);
        self.stable_workload = Some(workload_ref);
        self.workload_index = Some(index);
        self.manifests = Some(manifests);
        self.phase = CanaryPhase::Sizing;
        Ok(PrepareOutcome::Ready(release))
    }

    fn reject(&mut self, validation: WorkloadValidation) -> RolloutResult<PrepareOutcome> {
        self.phase = CanaryPhase::Failed;
        warn!(release = %self.release_name, %validation, "manifest set rejected");
        if self.config.strict_validation_errors {
            Err(RolloutError::Validation(validation))
        } else {
            Ok(PrepareOutcome::Rejected(validation))
        }
    }

    /// Fail any entries a prior process left in progress, and persist
    /// before a new attempt is recorded. Runs unconditionally during
    /// preparation so a restart can never leave two live in-progress
    /// markers.
    async fn reconcile_stale_in_progress(&mut self) -> RolloutResult<()> {
        let stale = self.history.fail_in_progress();
        if stale > 0 {
            warn!(
                release = %self.release_name,
                stale,
                "failed in-progress releases left by a prior attempt"
            );
            self.persist_history().await?;
        }
        Ok(())
    }

    /// How many replicas the canary's production counterpart runs today.
    ///
    /// Falls back from the live replica count, to the count declared in
    /// the rendered manifest, to 1 — so sizing behaves the same on
    /// first-time and steady-state deployments.
    pub async fn current_instances(&mut self) -> RolloutResult<u32> {
        let stable = self
            .stable_workload
            .as_ref()
            .ok_or(RolloutError::NotPrepared)?;

        let count = if let Some(live) = self.cluster.replica_count(stable).await? {
            debug!(workload = %stable, live, "sized from live replica count");
            live
        } else if let Some(declared) = self.declared_replicas {
            debug!(workload = %stable, declared, "sized from declared replica count");
            declared
        } else {
            debug!(workload = %stable, "workload not found, sized to one replica");
            1
        };

        self.phase = CanaryPhase::Relabeling;
        Ok(count)
    }

    /// Turn the controlled workload into the canary variant: append the
    /// canary suffix to its name, stamp release and track labels into
    /// the selector and the pod template, and set the replica count to
    /// `target`. Mutates the in-memory manifest only; no cluster calls.
    pub fn update_target_instances(&mut self, target: u32) -> RolloutResult<()> {
        let index = self.workload_index.ok_or(RolloutError::NotPrepared)?;
        let canary_suffix = self.config.canary_suffix.clone();
        let release_label_key = self.config.release_label_key.clone();
        let track_label_key = self.config.track_label_key.clone();
        let canary_track = self.config.canary_track.clone();
        let release_name = self.release_name.clone();

        let workload = self
            .manifests
            .as_mut()
            .and_then(|set| set.workload_mut(index))
            .ok_or(RolloutError::NotPrepared)?;

        workload.append_name_suffix(&canary_suffix);
        workload.insert_selector_label(release_label_key.clone(), release_name.clone());
        workload.insert_selector_label(track_label_key.clone(), canary_track.clone());
        workload.insert_template_label(release_label_key, release_name);
        workload.insert_template_label(track_label_key, canary_track);
        workload.set_replicas(target);

        info!(
            release = %self.release_name,
            workload = %workload.name,
            target,
            "canary workload relabeled"
        );
        self.target_instances = Some(target);
        Ok(())
    }

    /// Rewrite weighted-routing objects to reference the canary and
    /// stable tracks at the given canary weight.
    pub fn update_traffic_split_manifests(
        &self,
        splits: &mut [TrafficSplitManifest],
        canary_weight: u32,
    ) {
        traffic::update_traffic_split_manifests(splits, &self.config, canary_weight);
    }

    /// List the release's pods twice (base selector, then base plus the
    /// canary track label) and flag which belong to the new variant.
    ///
    /// The listings reflect whatever the cluster reports right now;
    /// waiting out eventual consistency is the caller's polling loop.
    pub async fn all_pods(&mut self) -> RolloutResult<Vec<Pod>> {
        let stable = self
            .stable_workload
            .as_ref()
            .ok_or(RolloutError::NotPrepared)?;
        let namespace = stable.namespace.clone();

        let base = LabelSelector::new()
            .with(self.config.release_label_key.as_str(), self.release_name.as_str());
        let track = base.clone().with(
            self.config.track_label_key.as_str(),
            self.config.canary_track.as_str(),
        );

        self.phase = CanaryPhase::Classifying;
        let all = self.cluster.list_pods(&namespace, &base.to_string()).await?;
        let track_pods = self.cluster.list_pods(&namespace, &track.to_string()).await?;
        debug!(
            release = %self.release_name,
            all = all.len(),
            track = track_pods.len(),
            "classifying pods"
        );
        Ok(classifier::flag_new_variant(&all, &track_pods))
    }

    /// Record the attempt as failed and persist immediately.
    ///
    /// This is the single synchronous failure-recording path: it runs
    /// before any further cleanup so a later failure cannot leave the
    /// history claiming the attempt is still in progress.
    pub async fn fail_and_save(&mut self) -> RolloutResult<()> {
        self.history.set_status_of_latest(ReleaseStatus::Failed)?;
        self.persist_history().await?;
        self.phase = CanaryPhase::Failed;
        warn!(release = %self.release_name, "release marked failed");
        Ok(())
    }

    /// Record the attempt as succeeded and persist. Called by the
    /// pipeline once downstream steps confirm steady state.
    pub async fn succeed_and_save(&mut self) -> RolloutResult<()> {
        self.history.set_status_of_latest(ReleaseStatus::Succeeded)?;
        self.persist_history().await?;
        self.phase = CanaryPhase::Succeeded;
        info!(release = %self.release_name, "release marked succeeded");
        Ok(())
    }

    /// Log the cluster's view of the managed workload for operators.
    /// Diagnostic only; failures are logged and swallowed.
    pub async fn wrap_up(&self) {
        let Ok(release) = self.history.latest() else {
            return;
        };
        match self.cluster.describe(&release.managed_workload).await {
            Ok(text) => info!(
                release = %self.release_name,
                workload = %release.managed_workload,
                "workload state at wrap-up: {text}"
            ),
            Err(e) => debug!(
                release = %self.release_name,
                error = %e,
                "describe failed during wrap-up"
            ),
        }
    }
}
