//! In-memory model of the rendered manifest set for one deployment attempt.
//!
//! Templating and YAML parsing happen upstream; the renderer hands the
//! engine already-structured objects. A [`ManifestSet`] preserves the
//! order in which objects will be applied to the cluster, and the engine
//! mutates the single eligible [`WorkloadManifest`] in place (rename,
//! labels, replicas) before the surrounding pipeline applies the set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::ResourceRef;

/// Objects annotated with this (value `"true"`) bypass progressive
/// delivery and are applied as-is, e.g. ingress or config objects.
pub const APPLY_DIRECT_ANNOTATION: &str = "slipway.io/apply-direct";

/// A workload manifest the engine may take control of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadManifest {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    /// Declared replica count, if the rendered manifest sets one.
    pub replicas: Option<u32>,
    /// Object-level labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Selector the workload controller matches pods with.
    #[serde(default)]
    pub selector_labels: BTreeMap<String, String>,
    /// Labels stamped onto the pod template.
    #[serde(default)]
    pub template_labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl WorkloadManifest {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            replicas: None,
            labels: BTreeMap::new(),
            selector_labels: BTreeMap::new(),
            template_labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }

    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(&self.kind, &self.name, &self.namespace)
    }

    /// Whether this object opts out of progressive delivery.
    pub fn apply_direct(&self) -> bool {
        self.annotations
            .get(APPLY_DIRECT_ANNOTATION)
            .is_some_and(|v| v == "true")
    }

    /// Rename the workload by appending a suffix (e.g. `-canary`).
    pub fn append_name_suffix(&mut self, suffix: &str) {
        self.name.push_str(suffix);
    }

    pub fn insert_selector_label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.selector_labels.insert(key.into(), value.into());
    }

    pub fn insert_template_label(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.template_labels.insert(key.into(), value.into());
    }

    pub fn set_replicas(&mut self, count: u32) {
        self.replicas = Some(count);
    }
}

/// A non-workload object carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainManifest {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl PlainManifest {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: namespace.into(),
            annotations: BTreeMap::new(),
        }
    }

    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(&self.kind, &self.name, &self.namespace)
    }
}

/// One rendered object in a manifest set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManifestObject {
    Workload(WorkloadManifest),
    Plain(PlainManifest),
}

impl ManifestObject {
    pub fn resource_ref(&self) -> ResourceRef {
        match self {
            ManifestObject::Workload(w) => w.resource_ref(),
            ManifestObject::Plain(p) => p.resource_ref(),
        }
    }
}

/// Ordered collection of rendered objects; order is application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSet {
    objects: Vec<ManifestObject>,
}

impl ManifestSet {
    pub fn new(objects: Vec<ManifestObject>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[ManifestObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// References to every object, in application order.
    pub fn resource_refs(&self) -> Vec<ResourceRef> {
        self.objects.iter().map(ManifestObject::resource_ref).collect()
    }

    /// Indices of workloads eligible for progressive delivery: workload
    /// manifests not annotated apply-direct.
    pub fn eligible_workload_indices(&self) -> Vec<usize> {
        self.objects
            .iter()
            .enumerate()
            .filter_map(|(i, obj)| match obj {
                ManifestObject::Workload(w) if !w.apply_direct() => Some(i),
                _ => None,
            })
            .collect()
    }

    pub fn workload(&self, index: usize) -> Option<&WorkloadManifest> {
        match self.objects.get(index) {
            Some(ManifestObject::Workload(w)) => Some(w),
            _ => None,
        }
    }

    pub fn workload_mut(&mut self, index: usize) -> Option<&mut WorkloadManifest> {
        match self.objects.get_mut(index) {
            Some(ManifestObject::Workload(w)) => Some(w),
            _ => None,
        }
    }

    /// Hex-encoded sha256 over the canonical serialization of the set.
    /// Stable across runs for identical rendered content; used to stamp
    /// releases for idempotence checks.
    pub fn digest(&self) -> anyhow::Result<String> {
        let canonical = serde_json::to_vec(&self.objects)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Auxiliary weighted-routing object referencing the canary and stable
/// tracks. Rewritten in memory; applied by the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSplitManifest {
    pub name: String,
    pub namespace: String,
    /// Service whose traffic is being split.
    pub service: String,
    pub canary_track: String,
    pub stable_track: String,
    /// Percentage of traffic routed to the canary track (0-100).
    pub canary_weight: u32,
}

impl TrafficSplitManifest {
    pub fn stable_weight(&self) -> u32 {
        100 - self.canary_weight.min(100)
    }
}
