//! Traffic-split manifest rewriting.

use slipway_core::{EngineConfig, TrafficSplitManifest};
use tracing::debug;

/// Point every routing object at the configured canary and stable
/// tracks and set the canary weight (clamped to 100). Pure manifest
/// mutation; the surrounding pipeline applies the objects.
pub fn update_traffic_split_manifests(
    splits: &mut [TrafficSplitManifest],
    config: &EngineConfig,
    canary_weight: u32,
) {
    let weight = canary_weight.min(100);
    for split in splits.iter_mut() {
        split.canary_track = config.canary_track.clone();
        split.stable_track = config.stable_track.clone();
        split.canary_weight = weight;
        debug!(split = %split.name, weight, "traffic split updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split() -> TrafficSplitManifest {
        TrafficSplitManifest {
            name: "api-split".to_string(),
            namespace: "default".to_string(),
            service: "api".to_string(),
            canary_track: String::new(),
            stable_track: String::new(),
            canary_weight: 0,
        }
    }

    #[test]
    fn rewrites_tracks_and_weight() {
        let config = EngineConfig::default();
        let mut splits = vec![split()];

        update_traffic_split_manifests(&mut splits, &config, 20);

        assert_eq!(splits[0].canary_track, "canary");
        assert_eq!(splits[0].stable_track, "stable");
        assert_eq!(splits[0].canary_weight, 20);
        assert_eq!(splits[0].stable_weight(), 80);
    }

    #[test]
    fn clamps_weight_to_full_traffic() {
        let config = EngineConfig::default();
        let mut splits = vec![split()];

        update_traffic_split_manifests(&mut splits, &config, 250);

        assert_eq!(splits[0].canary_weight, 100);
        assert_eq!(splits[0].stable_weight(), 0);
    }
}
