//! Presence tracking with display hysteresis.
//!
//! The detector misses objects for a frame or two all the time; without
//! hysteresis the overlay flickers. The tracker keeps a label "present" until
//! it has been unseen for longer than `display_timeout`, and reports per-frame
//! detection counts for the overlay.

use std::collections::HashMap;

use crate::frame::FrameSnapshot;

/// One line of the per-frame presence summary.
///
/// `count` is the number of detections of this label in the *current* frame.
/// A label inside the timeout window but not re-detected this frame is
/// reported with count 0, so the overlay can distinguish "still shown" from
/// "seen right now".
#[derive(Clone, Debug, PartialEq)]
pub struct PresenceEntry {
    pub label: String,
    pub count: usize,
    pub last_seen: f64,
}

/// Presence summary for one frame, sorted by label for stable rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresenceSummary {
    pub entries: Vec<PresenceEntry>,
    pub timestamp: f64,
}

impl PresenceSummary {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current count for a label, 0 when absent or not re-detected.
    pub fn count(&self, label: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }
}

/// Tracks which labels are currently visible, smoothing over detection gaps.
///
/// Owned and mutated only by the frame orchestrator; no collaborator access.
pub struct PresenceTracker {
    last_seen: HashMap<String, f64>,
    display_timeout: f64,
}

impl PresenceTracker {
    /// `display_timeout` must be positive; the config layer enforces this.
    pub fn new(display_timeout: f64) -> Self {
        Self {
            last_seen: HashMap::new(),
            display_timeout,
        }
    }

    /// Refresh last-seen stamps from the snapshot, evict expired entries, and
    /// return the presence summary for this frame.
    ///
    /// A label seen at t0 and never again remains present through
    /// t0 + display_timeout inclusive, and is evicted on the first update
    /// strictly after that.
    pub fn update(&mut self, snapshot: &FrameSnapshot) -> PresenceSummary {
        let now = snapshot.timestamp;

        let mut frame_counts: HashMap<String, usize> = HashMap::new();
        for det in &snapshot.detections {
            let label = det.canonical_label();
            *frame_counts.entry(label.clone()).or_insert(0) += 1;
            self.last_seen.insert(label, now);
        }

        let timeout = self.display_timeout;
        self.last_seen.retain(|_, seen| now - *seen <= timeout);

        let mut entries: Vec<PresenceEntry> = self
            .last_seen
            .iter()
            .map(|(label, seen)| PresenceEntry {
                label: label.clone(),
                count: frame_counts.get(label).copied().unwrap_or(0),
                last_seen: *seen,
            })
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));

        PresenceSummary {
            entries,
            timestamp: now,
        }
    }

    /// Number of labels currently considered present.
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
