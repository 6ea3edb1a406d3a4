//! Pod classification for canary rollouts.

use std::collections::HashSet;

use slipway_core::Pod;

/// Flag which pods belong to the new variant.
///
/// `all_pods` is the full listing for the release's base selector;
/// `track_pods` is the listing additionally matching the canary track
/// label. A pod is the new variant iff its name appears in the track
/// listing. Inputs are not mutated; the returned pods are copies with
/// the flag populated.
pub fn flag_new_variant(all_pods: &[Pod], track_pods: &[Pod]) -> Vec<Pod> {
    let track_names: HashSet<&str> = track_pods.iter().map(|p| p.name.as_str()).collect();
    all_pods
        .iter()
        .map(|p| {
            let mut pod = p.clone();
            pod.new_variant = track_names.contains(p.name.as_str());
            pod
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(name: &str) -> Pod {
        Pod::new(name, "default", true)
    }

    #[test]
    fn flags_pods_present_in_track_listing() {
        let all = vec![pod("a"), pod("b")];
        let track = vec![pod("b")];

        let classified = flag_new_variant(&all, &track);

        assert!(!classified[0].new_variant);
        assert!(classified[1].new_variant);
    }

    #[test]
    fn empty_inputs_yield_empty_output() {
        assert!(flag_new_variant(&[], &[]).is_empty());
        assert!(flag_new_variant(&[], &[pod("b")]).is_empty());
    }

    #[test]
    fn no_track_pods_flags_nothing() {
        let all = vec![pod("a"), pod("b")];
        let classified = flag_new_variant(&all, &[]);
        assert!(classified.iter().all(|p| !p.new_variant));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let all = vec![pod("a")];
        let track = vec![pod("a")];

        let classified = flag_new_variant(&all, &track);

        assert!(classified[0].new_variant);
        assert!(!all[0].new_variant);
    }
}
