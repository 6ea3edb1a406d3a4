//! ReleaseHistory — ordered record of deployment attempts.
//!
//! The sequence is most-recent-first: index 0 is the newest attempt and
//! numbers strictly decrease front-to-back. Entries are value types;
//! mutations of the front entry (status, color tag, content hash)
//! replace the slot with an updated copy rather than editing in place,
//! because the whole history is re-encoded and rewritten on every
//! persist anyway.

use serde::{Deserialize, Serialize};
use slipway_core::ResourceRef;
use tracing::debug;

use crate::error::{HistoryError, HistoryResult};
use crate::types::{ColorTag, Release, ReleaseStatus};

/// Most-recent-first sequence of releases for one release name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseHistory {
    releases: Vec<Release>,
}

impl ReleaseHistory {
    /// A history with no recorded attempts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// All releases, newest first.
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn iter(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter()
    }

    /// Record a new attempt at the front.
    ///
    /// The new release gets number `front + 1` (1 on an empty history),
    /// status `InProgress`, and the first resource as its managed
    /// workload. `resources` must be non-empty and lead with the
    /// workload under control; callers are trusted internal code.
    pub fn create_new_release(&mut self, resources: Vec<ResourceRef>) -> Release {
        let number = self.releases.first().map_or(1, |r| r.number + 1);
        let release = Release {
            number,
            status: ReleaseStatus::InProgress,
            managed_workload: resources[0].clone(),
            resources,
            color_tag: None,
            content_hash: None,
        };
        self.releases.insert(0, release.clone());
        debug!(number, "release recorded");
        release
    }

    /// Prepend an externally constructed release as-is: no renumbering,
    /// no validation. Existing entries shift back one position untouched.
    pub fn add_to_front(&mut self, release: Release) {
        self.releases.insert(0, release);
    }

    /// The most recent attempt. Calling this on an empty history is a
    /// sequencing bug in the caller, not a search miss.
    pub fn latest(&self) -> HistoryResult<&Release> {
        self.releases.first().ok_or(HistoryError::NoRelease)
    }

    /// Replace the front entry's status.
    pub fn set_status_of_latest(&mut self, status: ReleaseStatus) -> HistoryResult<()> {
        let front = self.releases.first().ok_or(HistoryError::NoRelease)?;
        let mut updated = front.clone();
        updated.status = status;
        self.releases[0] = updated;
        debug!(?status, "latest release status updated");
        Ok(())
    }

    /// Replace the front entry's color tag (blue/green promotion).
    pub fn set_color_of_latest(&mut self, tag: ColorTag) -> HistoryResult<()> {
        let front = self.releases.first().ok_or(HistoryError::NoRelease)?;
        let mut updated = front.clone();
        updated.color_tag = Some(tag);
        self.releases[0] = updated;
        Ok(())
    }

    /// Replace the front entry's content hash.
    pub fn set_content_hash_of_latest(&mut self, hash: impl Into<String>) -> HistoryResult<()> {
        let front = self.releases.first().ok_or(HistoryError::NoRelease)?;
        let mut updated = front.clone();
        updated.content_hash = Some(hash.into());
        self.releases[0] = updated;
        Ok(())
    }

    /// First release, front-to-back, matching the predicate.
    fn find_first(&self, pred: impl Fn(&Release) -> bool) -> Option<&Release> {
        self.releases.iter().find(|r| pred(r))
    }

    /// The most recent succeeded release, or `None` if no attempt has
    /// succeeded yet (including the empty history).
    pub fn last_successful(&self) -> Option<&Release> {
        self.find_first(|r| r.status == ReleaseStatus::Succeeded)
    }

    /// The most recent blue/green release, returned only if it
    /// succeeded. Uncolored releases are skipped regardless of status;
    /// the scan stops at the first colored entry.
    pub fn latest_successful_colored(&self) -> Option<&Release> {
        self.find_first(|r| r.is_colored())
            .filter(|r| r.status == ReleaseStatus::Succeeded)
    }

    /// Flip every in-progress entry to failed, replacing each slot.
    /// Returns how many entries were flipped. Entries left in progress
    /// by a process that died mid-attempt are reconciled this way before
    /// a new attempt starts.
    pub fn fail_in_progress(&mut self) -> usize {
        let mut flipped = 0;
        for slot in &mut self.releases {
            if slot.status == ReleaseStatus::InProgress {
                let mut updated = slot.clone();
                updated.status = ReleaseStatus::Failed;
                *slot = updated;
                flipped += 1;
            }
        }
        if flipped > 0 {
            debug!(flipped, "stale in-progress releases failed");
        }
        flipped
    }

    /// Drop entries beyond `retain` from the back; no-op when already
    /// within bound.
    pub fn prune(&mut self, retain: usize) {
        if self.releases.len() > retain {
            let dropped = self.releases.len() - retain;
            self.releases.truncate(retain);
            debug!(dropped, retain, "history pruned");
        }
    }
}
