//! End-to-end scenarios through the pipeline: presence hysteresis, debounce,
//! cooldown, and dispatch fan-out, using recording sinks in place of the real
//! speech/screenshot/log collaborators.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use intellicam::{
    AlertDispatcher, AlertSinks, BoundingBox, CameraSettings, Detection, Frame, IntellicamConfig,
    LogSink, Pipeline, ScreenshotSink, SpeechSynthesizer,
};

#[derive(Clone, Default)]
struct Recorder {
    spoken: Arc<Mutex<Vec<String>>>,
    saved: Arc<Mutex<Vec<String>>>,
    logged: Arc<Mutex<Vec<String>>>,
    fail_screenshots_for: Option<String>,
}

impl Recorder {
    fn sinks(&self) -> AlertSinks {
        AlertSinks {
            speech: Box::new(self.clone()),
            screenshots: Box::new(self.clone()),
            log: Box::new(self.clone()),
        }
    }
}

impl SpeechSynthesizer for Recorder {
    fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl ScreenshotSink for Recorder {
    fn save(&mut self, _frame: &Frame, label: &str) -> Result<PathBuf> {
        if self.fail_screenshots_for.as_deref() == Some(label) {
            return Err(anyhow!("disk full"));
        }
        self.saved.lock().unwrap().push(label.to_string());
        Ok(PathBuf::from(format!("{label}.jpg")))
    }
}

impl LogSink for Recorder {
    fn append(&mut self, line: &str) -> Result<()> {
        self.logged.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

fn config() -> IntellicamConfig {
    IntellicamConfig {
        display_timeout: 1.0,
        alert_cooldown: 15.0,
        alert_confidence_threshold: 0.5,
        dangerous_labels: vec!["knife".into(), "gun".into(), "fire".into()],
        voice_alerts_enabled: true,
        screenshots_enabled: true,
        camera: CameraSettings {
            url: "stub://test".into(),
            target_fps: 10,
            width: 8,
            height: 8,
        },
        screenshot_dir: PathBuf::from("screenshots"),
        alert_log_path: PathBuf::from("log.txt"),
        tts_command: "espeak".into(),
    }
}

fn pipeline_with(rec: &Recorder) -> Pipeline {
    Pipeline::new(&config(), AlertDispatcher::spawn(rec.sinks()))
}

fn frame(timestamp: f64) -> Frame {
    Frame::new(vec![0u8; 8 * 8 * 3], 8, 8, timestamp)
}

fn det(label: &str, confidence: f32) -> Detection {
    Detection::new(label, confidence, BoundingBox::new(0, 0, 10, 10))
}

#[test]
fn knife_alert_emits_each_side_effect_once() {
    // Scenario A: one knife detection, one speech + screenshot + log record.
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    let outcome = pipe.process(&frame(0.0), vec![det("knife", 0.9)]);
    assert_eq!(outcome.alerted.len(), 1);
    assert!(outcome.alerted.contains("knife"));
    drop(pipe); // joins the dispatch worker

    assert_eq!(
        rec.spoken.lock().unwrap().as_slice(),
        ["Dangerous item detected: knife"]
    );
    assert_eq!(rec.saved.lock().unwrap().as_slice(), ["knife"]);
    let logged = rec.logged.lock().unwrap();
    assert_eq!(logged.len(), 1);
    assert!(logged[0].ends_with("ALERT: knife detected"));
}

#[test]
fn persistent_person_is_displayed_but_never_alerts() {
    // Scenario B: non-dangerous label across several frames.
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    for t in [0.0, 0.1, 0.2] {
        let outcome = pipe.process(&frame(t), vec![det("person", 0.8)]);
        assert!(outcome.presence.contains("person"));
        assert_eq!(outcome.presence.count("person"), 1);
        assert!(outcome.alerted.is_empty());
    }
    drop(pipe);

    assert!(rec.spoken.lock().unwrap().is_empty());
    assert!(rec.saved.lock().unwrap().is_empty());
    assert!(rec.logged.lock().unwrap().is_empty());
}

#[test]
fn fire_realerts_after_cooldown_but_not_before() {
    // Scenario C: fire at t=0, quiet until t=16, again at t=20.
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    let first = pipe.process(&frame(0.0), vec![det("fire", 0.9)]);
    assert!(first.alerted.contains("fire"));

    // Absent frames while the cooldown runs out.
    for t in [5.0, 10.0, 15.9] {
        let outcome = pipe.process(&frame(t), vec![]);
        assert!(outcome.alerted.is_empty());
    }

    let again = pipe.process(&frame(16.0), vec![det("fire", 0.9)]);
    assert!(again.alerted.contains("fire"), "cooldown elapsed, must re-alert");

    let suppressed = pipe.process(&frame(20.0), vec![det("fire", 0.9)]);
    assert!(suppressed.alerted.is_empty(), "cooldown restarted at t=16");
    drop(pipe);

    assert_eq!(rec.spoken.lock().unwrap().len(), 2);
}

#[test]
fn duplicate_knives_count_twice_but_alert_once() {
    // Scenario D: two knives in one frame.
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    let outcome = pipe.process(&frame(0.0), vec![det("knife", 0.9), det("knife", 0.7)]);
    assert_eq!(outcome.presence.count("knife"), 2);
    assert_eq!(outcome.alerted.len(), 1);
    drop(pipe);

    assert_eq!(rec.spoken.lock().unwrap().len(), 1);
    assert_eq!(rec.saved.lock().unwrap().len(), 1);
    assert_eq!(rec.logged.lock().unwrap().len(), 1);
}

#[test]
fn screenshot_failure_is_isolated_per_label_and_per_sink() {
    let rec = Recorder {
        fail_screenshots_for: Some("knife".to_string()),
        ..Recorder::default()
    };
    let mut pipe = pipeline_with(&rec);

    let outcome = pipe.process(&frame(0.0), vec![det("knife", 0.9), det("gun", 0.9)]);
    assert_eq!(outcome.alerted.len(), 2);
    drop(pipe);

    // knife's screenshot failed; its speech and log record still ran, and gun
    // got all three.
    let mut spoken = rec.spoken.lock().unwrap().clone();
    spoken.sort();
    assert_eq!(
        spoken,
        [
            "Dangerous item detected: gun",
            "Dangerous item detected: knife"
        ]
    );
    assert_eq!(rec.saved.lock().unwrap().as_slice(), ["gun"]);
    assert_eq!(rec.logged.lock().unwrap().len(), 2);
}

#[test]
fn presence_outlives_detection_gaps_until_timeout() {
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    pipe.process(&frame(0.0), vec![det("person", 0.8)]);

    // Gap frames: still present, count 0.
    let held = pipe.process(&frame(0.8), vec![]);
    assert!(held.presence.contains("person"));
    assert_eq!(held.presence.count("person"), 0);

    // Past the timeout: gone.
    let gone = pipe.process(&frame(2.0), vec![]);
    assert!(!gone.presence.contains("person"));
}

#[test]
fn low_confidence_dangerous_detection_does_not_alert() {
    let rec = Recorder::default();
    let mut pipe = pipeline_with(&rec);

    let outcome = pipe.process(&frame(0.0), vec![det("knife", 0.4)]);
    assert!(outcome.alerted.is_empty());
    // Presence tracking is independent of the alert threshold.
    assert!(outcome.presence.contains("knife"));
    drop(pipe);
    assert!(rec.spoken.lock().unwrap().is_empty());
}
