//! Alert dispatch.
//!
//! The dispatcher turns debouncer decisions into side effects: one speech
//! request, one screenshot, one log record per alerted label. Side effects run
//! on a background worker thread fed over a channel, so a slow speech engine
//! never stalls the frame loop. The worker only ever sees owned `AlertEvent`
//! copies; tracker and debouncer state stay with the orchestrator thread.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::frame::{Frame, FrameSnapshot};

use super::sinks::{alert_log_line, LogSink, ScreenshotSink, SpeechSynthesizer};

/// One alert produced by the debouncer, ready for side effects.
///
/// Carries its own frame reference so the worker can write a screenshot after
/// the orchestrator has moved on to the next frame.
#[derive(Clone, Debug)]
pub struct AlertEvent {
    pub label: String,
    pub confidence: f32,
    pub timestamp: f64,
    pub frame: Frame,
}

/// Per-call side-effect toggles, owned by the orchestrator's configuration
/// and read (never mutated) by the dispatcher.
#[derive(Clone, Copy, Debug)]
pub struct DispatchPolicy {
    pub voice_alerts_enabled: bool,
    pub screenshots_enabled: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            voice_alerts_enabled: true,
            screenshots_enabled: true,
        }
    }
}

/// Counters for dispatched events and per-sink failures.
#[derive(Debug, Default)]
pub struct DispatchCounters {
    pub dispatched: AtomicU64,
    pub speech_failures: AtomicU64,
    pub screenshot_failures: AtomicU64,
    pub log_failures: AtomicU64,
}

impl DispatchCounters {
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.speech_failures.load(Ordering::Relaxed)
            + self.screenshot_failures.load(Ordering::Relaxed)
            + self.log_failures.load(Ordering::Relaxed)
    }
}

/// The three collaborator sinks the worker drives.
pub struct AlertSinks {
    pub speech: Box<dyn SpeechSynthesizer>,
    pub screenshots: Box<dyn ScreenshotSink>,
    pub log: Box<dyn LogSink>,
}

/// Run the side effects for one alert event.
///
/// Each side effect is attempted independently: a screenshot failure never
/// suppresses the log record or the speech request, and vice versa. Failures
/// are logged and counted, never returned.
pub fn run_alert(
    event: &AlertEvent,
    policy: &DispatchPolicy,
    sinks: &mut AlertSinks,
    counters: &DispatchCounters,
) {
    counters.dispatched.fetch_add(1, Ordering::Relaxed);

    if policy.voice_alerts_enabled {
        let text = format!("Dangerous item detected: {}", event.label);
        if let Err(e) = sinks.speech.speak(&text) {
            counters.speech_failures.fetch_add(1, Ordering::Relaxed);
            log::warn!("speech failed for '{}': {}", event.label, e);
        }
    }

    if policy.screenshots_enabled {
        match sinks.screenshots.save(&event.frame, &event.label) {
            Ok(path) => log::debug!("screenshot for '{}' at {}", event.label, path.display()),
            Err(e) => {
                counters.screenshot_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("screenshot failed for '{}': {}", event.label, e);
            }
        }
    }

    if let Err(e) = sinks.log.append(&alert_log_line(&event.label)) {
        counters.log_failures.fetch_add(1, Ordering::Relaxed);
        log::warn!("alert log append failed for '{}': {}", event.label, e);
    }
}

/// Fire-and-forget dispatcher backed by a worker thread.
pub struct AlertDispatcher {
    tx: Option<Sender<(AlertEvent, DispatchPolicy)>>,
    counters: Arc<DispatchCounters>,
    join: Option<JoinHandle<()>>,
}

impl AlertDispatcher {
    /// Spawn the dispatch worker owning the given sinks.
    pub fn spawn(mut sinks: AlertSinks) -> Self {
        let (tx, rx) = mpsc::channel::<(AlertEvent, DispatchPolicy)>();
        let counters = Arc::new(DispatchCounters::default());
        let worker_counters = counters.clone();
        let join = std::thread::spawn(move || {
            while let Ok((event, policy)) = rx.recv() {
                run_alert(&event, &policy, &mut sinks, &worker_counters);
            }
        });
        Self {
            tx: Some(tx),
            counters,
            join: Some(join),
        }
    }

    /// Queue side effects for a batch of alerting labels, at most one event
    /// per label. Never blocks on the sinks; if the worker has exited (process
    /// shutdown) the events are silently dropped.
    pub fn dispatch(
        &self,
        labels: &BTreeSet<String>,
        snapshot: &FrameSnapshot,
        frame: &Frame,
        policy: &DispatchPolicy,
    ) {
        let Some(tx) = &self.tx else {
            return;
        };
        for label in labels {
            let confidence = snapshot
                .detections
                .iter()
                .filter(|det| det.canonical_label() == *label)
                .map(|det| det.confidence)
                .fold(0.0_f32, f32::max);
            let event = AlertEvent {
                label: label.clone(),
                confidence,
                timestamp: snapshot.timestamp,
                frame: frame.clone(),
            };
            if tx.send((event, *policy)).is_err() {
                log::debug!("alert worker gone, dropping event for '{}'", label);
                return;
            }
        }
    }

    pub fn counters(&self) -> Arc<DispatchCounters> {
        self.counters.clone()
    }
}

impl Drop for AlertDispatcher {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain what is queued and exit.
        self.tx.take();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
