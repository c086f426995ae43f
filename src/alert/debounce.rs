//! Alert debouncing.
//!
//! The detector reports the same object on every frame it is visible; the
//! speaker must announce it once. The debouncer remembers which labels have
//! been announced and suppresses repeats until the whole set is cleared by a
//! quiet period.
//!
//! The cooldown is global, not per label: the announced set resets as a whole
//! once no *new* label has been announced for `cooldown` seconds. A label that
//! stays in view indefinitely is therefore re-announced only after the tracker
//! as a whole has been quiet long enough.

use std::collections::{BTreeSet, HashSet};

use crate::frame::FrameSnapshot;

/// Decides which labels in a frame warrant a fresh announcement.
///
/// Pure decision logic: never touches speech, screenshots, or the log.
pub struct AlertDebouncer {
    announced: HashSet<String>,
    last_new_announcement: f64,
    cooldown: f64,
    confidence_threshold: f32,
}

impl AlertDebouncer {
    /// `cooldown` must be positive and `confidence_threshold` in 0..=1; the
    /// config layer enforces both.
    pub fn new(cooldown: f64, confidence_threshold: f32) -> Self {
        Self {
            announced: HashSet::new(),
            last_new_announcement: 0.0,
            cooldown,
            confidence_threshold,
        }
    }

    /// Evaluate one frame and return the labels to alert on now.
    ///
    /// Labels below the confidence threshold are invisible to the debouncer.
    /// The cooldown reset is applied before the new-label computation, so a
    /// frame arriving after a long quiet period can re-announce a label that
    /// never left the camera's view.
    pub fn evaluate(&mut self, snapshot: &FrameSnapshot) -> BTreeSet<String> {
        let now = snapshot.timestamp;

        if now - self.last_new_announcement > self.cooldown {
            self.announced.clear();
        }

        let current: HashSet<String> = snapshot
            .detections
            .iter()
            .filter(|det| det.confidence > self.confidence_threshold)
            .map(|det| det.canonical_label())
            .collect();

        let new: BTreeSet<String> = current
            .iter()
            .filter(|label| !self.announced.contains(*label))
            .cloned()
            .collect();

        if !new.is_empty() {
            self.announced.extend(new.iter().cloned());
            self.last_new_announcement = now;
        }

        new
    }

    /// Labels currently suppressed as already announced.
    pub fn announced_len(&self) -> usize {
        self.announced.len()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
