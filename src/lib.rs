//! Intellicam detection-alert kernel.
//!
//! Glue between an external object detector and the operator-facing alert
//! surfaces (voice, screenshots, alert log, overlay panel). The original
//! engineering lives in three small temporal state machines:
//!
//! 1. **Presence tracking**: a label stays "present" until unseen for longer
//!    than the display timeout, so one missed frame does not flicker the
//!    overlay.
//! 2. **Alert debouncing**: each label is announced once per announcement
//!    window; the announced set resets as a whole after a quiet period
//!    (global cooldown, not per label).
//! 3. **Dispatch isolation**: speech, screenshot, and log side effects run on
//!    a background worker, independently per label and per sink, and never
//!    block the frame loop.
//!
//! # Module Structure
//!
//! - `frame`: frames, detections, snapshot sanitization
//! - `ingest`: frame sources (`stub://` built in, real cameras plug in)
//! - `detect`: detector backend trait + scripted stub
//! - `track`: presence tracker
//! - `alert`: classifier, debouncer, dispatcher, sinks
//! - `pipeline`: per-frame orchestration
//! - `ui`: overlay text rendering
//! - `config`: file + env configuration with load-time validation

pub mod alert;
pub mod config;
pub mod detect;
pub mod frame;
pub mod ingest;
pub mod pipeline;
pub mod track;
pub mod ui;

pub use alert::{
    AlertDebouncer, AlertDispatcher, AlertEvent, AlertSinks, CommandSpeech, DangerClassifier,
    DispatchCounters, DispatchPolicy, FileLogSink, JpegScreenshotSink, LogSink, ScreenshotSink,
    SpeechSynthesizer, DEFAULT_DANGEROUS_LABELS,
};
pub use config::{CameraSettings, IntellicamConfig};
pub use detect::{DetectorBackend, StubDetector};
pub use frame::{canonical_label, BoundingBox, Clock, Detection, Frame, FrameSnapshot};
pub use ingest::{open_source, FrameSource, SourceStats, StubSource};
pub use pipeline::{FrameOutcome, Pipeline};
pub use track::{PresenceEntry, PresenceSummary, PresenceTracker};
pub use ui::render_presence;
