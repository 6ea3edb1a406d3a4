//! Domain types for the release history.

use serde::{Deserialize, Serialize};
use slipway_core::ResourceRef;

/// Status of one deployment attempt.
///
/// Starts at `InProgress` and transitions exactly once, to `Succeeded`
/// or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    InProgress,
    Succeeded,
    Failed,
}

/// Alternating-environment color derived from the workload name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Blue,
    Green,
}

/// Promotion state of a blue/green release. Unlike status, this may
/// change after creation to reflect promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Stage,
    Primary,
}

/// One recorded deployment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Monotonically increasing per release name; never reused.
    pub number: u64,
    pub status: ReleaseStatus,
    /// The single primary workload this attempt controls. Always present
    /// in `resources`.
    pub managed_workload: ResourceRef,
    /// Every object applied as part of this attempt, in application order.
    pub resources: Vec<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_tag: Option<ColorTag>,
    /// Digest of the rendered manifest set, stamped after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl Release {
    /// Blue/green color of this release, detected from the managed
    /// workload name: a case-sensitive `-blue` or `-green` suffix on the
    /// full name. Anything else is uncolored.
    pub fn color(&self) -> Option<Color> {
        let name = &self.managed_workload.name;
        if name.ends_with("-blue") {
            Some(Color::Blue)
        } else if name.ends_with("-green") {
            Some(Color::Green)
        } else {
            None
        }
    }

    pub fn is_colored(&self) -> bool {
        self.color().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_named(name: &str) -> Release {
        let workload = ResourceRef::new("Deployment", name, "default");
        Release {
            number: 1,
            status: ReleaseStatus::Succeeded,
            managed_workload: workload.clone(),
            resources: vec![workload],
            color_tag: None,
            content_hash: None,
        }
    }

    #[test]
    fn color_from_name_suffix() {
        assert_eq!(release_named("nginx-blue").color(), Some(Color::Blue));
        assert_eq!(release_named("nginx-green").color(), Some(Color::Green));
        assert_eq!(release_named("nginx").color(), None);
    }

    #[test]
    fn color_suffix_is_case_sensitive() {
        assert_eq!(release_named("nginx-Blue").color(), None);
        assert_eq!(release_named("nginx-GREEN").color(), None);
    }

    #[test]
    fn color_suffix_must_trail_the_name() {
        assert_eq!(release_named("blue-nginx").color(), None);
        assert_eq!(release_named("green-api-stable").color(), None);
    }
}
