//! Frame orchestration.
//!
//! One synchronous pass per frame: sanitize the detector output, refresh the
//! presence tracker, run the debouncer, intersect with the dangerous set, and
//! hand the qualifying labels to the dispatcher. The caller (the daemon loop
//! or a test) owns the frame and drops it afterwards; the dispatcher keeps its
//! own reference for screenshots.

use std::collections::{BTreeSet, VecDeque};

use chrono::Local;

use crate::alert::{AlertDebouncer, AlertDispatcher, DangerClassifier, DispatchPolicy};
use crate::config::IntellicamConfig;
use crate::frame::{Detection, Frame, FrameSnapshot};
use crate::track::{PresenceSummary, PresenceTracker};

/// How many recent alert lines the UI ring keeps.
const RECENT_ALERTS_CAP: usize = 10;

/// What one frame produced: the presence summary for the overlay and the
/// labels that alerted this frame (already dispatched).
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    pub presence: PresenceSummary,
    pub alerted: BTreeSet<String>,
    /// Malformed detections dropped from this frame.
    pub dropped: usize,
}

pub struct Pipeline {
    tracker: PresenceTracker,
    debouncer: AlertDebouncer,
    classifier: DangerClassifier,
    dispatcher: AlertDispatcher,
    policy: DispatchPolicy,
    dropped_total: u64,
    recent_alerts: VecDeque<String>,
}

impl Pipeline {
    pub fn new(cfg: &IntellicamConfig, dispatcher: AlertDispatcher) -> Self {
        Self {
            tracker: PresenceTracker::new(cfg.display_timeout),
            debouncer: AlertDebouncer::new(cfg.alert_cooldown, cfg.alert_confidence_threshold),
            classifier: DangerClassifier::new(cfg.dangerous_labels.iter()),
            dispatcher,
            policy: DispatchPolicy {
                voice_alerts_enabled: cfg.voice_alerts_enabled,
                screenshots_enabled: cfg.screenshots_enabled,
            },
            dropped_total: 0,
            recent_alerts: VecDeque::with_capacity(RECENT_ALERTS_CAP),
        }
    }

    /// Process one frame's detections.
    pub fn process(&mut self, frame: &Frame, detections: Vec<Detection>) -> FrameOutcome {
        let mut snapshot = FrameSnapshot::new(detections, frame.timestamp);
        let dropped = snapshot.sanitize();
        if dropped > 0 {
            self.dropped_total += dropped as u64;
            log::warn!(
                "dropped {} malformed detection(s) at t={:.3} ({} total)",
                dropped,
                snapshot.timestamp,
                self.dropped_total
            );
        }

        let presence = self.tracker.update(&snapshot);

        // The debouncer sees every label; only dangerous ones reach the
        // dispatcher. "person" becoming announced is what keeps it from being
        // treated as new on every later frame.
        let new = self.debouncer.evaluate(&snapshot);
        let alerted: BTreeSet<String> = new
            .into_iter()
            .filter(|label| self.classifier.is_dangerous(label))
            .collect();

        if !alerted.is_empty() {
            self.dispatcher
                .dispatch(&alerted, &snapshot, frame, &self.policy);
            for label in &alerted {
                if self.recent_alerts.len() == RECENT_ALERTS_CAP {
                    self.recent_alerts.pop_front();
                }
                self.recent_alerts
                    .push_back(format!("[{}] {} ⚠", Local::now().format("%H:%M:%S"), label));
            }
        }

        FrameOutcome {
            presence,
            alerted,
            dropped,
        }
    }

    /// Swap the side-effect toggles at runtime (UI checkboxes).
    pub fn set_policy(&mut self, policy: DispatchPolicy) {
        self.policy = policy;
    }

    /// Swap the dangerous-label set at runtime.
    pub fn set_classifier(&mut self, classifier: DangerClassifier) {
        self.classifier = classifier;
    }

    /// Total malformed detections dropped since startup.
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total
    }

    /// Most recent alert lines, oldest first, for the UI log panel.
    pub fn recent_alerts(&self) -> impl Iterator<Item = &str> {
        self.recent_alerts.iter().map(String::as_str)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
