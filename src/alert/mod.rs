//! Alert decision and dispatch: dangerous-object classification, debouncing,
//! and side-effect fan-out.

pub mod danger;
pub mod debounce;
pub mod dispatch;
pub mod sinks;

pub use danger::{DangerClassifier, DEFAULT_DANGEROUS_LABELS};
pub use debounce::AlertDebouncer;
pub use dispatch::{
    run_alert, AlertDispatcher, AlertEvent, AlertSinks, DispatchCounters, DispatchPolicy,
};
pub use sinks::{
    alert_log_line, CommandSpeech, FileLogSink, JpegScreenshotSink, LogSink, ScreenshotSink,
    SpeechSynthesizer,
};
