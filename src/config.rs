use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::alert::DEFAULT_DANGEROUS_LABELS;
use crate::frame::canonical_label;

const DEFAULT_DISPLAY_TIMEOUT_S: f64 = 1.0;
const DEFAULT_ALERT_COOLDOWN_S: f64 = 15.0;
const DEFAULT_ALERT_CONFIDENCE_THRESHOLD: f32 = 0.5;
const DEFAULT_CAMERA_URL: &str = "stub://webcam";
const DEFAULT_CAMERA_FPS: u32 = 30;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 480;
const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";
const DEFAULT_ALERT_LOG_PATH: &str = "log.txt";
const DEFAULT_TTS_COMMAND: &str = "espeak";

#[derive(Debug, Deserialize, Default)]
struct IntellicamConfigFile {
    display_timeout: Option<f64>,
    alert_cooldown: Option<f64>,
    alert_confidence_threshold: Option<f32>,
    dangerous_labels: Option<Vec<String>>,
    voice_alerts_enabled: Option<bool>,
    screenshots_enabled: Option<bool>,
    camera: Option<CameraConfigFile>,
    screenshot_dir: Option<PathBuf>,
    alert_log_path: Option<PathBuf>,
    tts_command: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct IntellicamConfig {
    pub display_timeout: f64,
    pub alert_cooldown: f64,
    pub alert_confidence_threshold: f32,
    pub dangerous_labels: Vec<String>,
    pub voice_alerts_enabled: bool,
    pub screenshots_enabled: bool,
    pub camera: CameraSettings,
    pub screenshot_dir: PathBuf,
    pub alert_log_path: PathBuf,
    pub tts_command: String,
}

#[derive(Clone, Debug)]
pub struct CameraSettings {
    pub url: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl IntellicamConfig {
    /// Load from the file named by `INTELLICAM_CONFIG` (if set), apply env
    /// overrides, and validate. Out-of-range values are rejected here, never
    /// at call time.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("INTELLICAM_CONFIG").ok();
        Self::load_with(config_path.as_deref().map(Path::new))
    }

    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => IntellicamConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: IntellicamConfigFile) -> Self {
        let camera = CameraSettings {
            url: file
                .camera
                .as_ref()
                .and_then(|cam| cam.url.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_URL.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|cam| cam.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|cam| cam.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|cam| cam.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        Self {
            display_timeout: file.display_timeout.unwrap_or(DEFAULT_DISPLAY_TIMEOUT_S),
            alert_cooldown: file.alert_cooldown.unwrap_or(DEFAULT_ALERT_COOLDOWN_S),
            alert_confidence_threshold: file
                .alert_confidence_threshold
                .unwrap_or(DEFAULT_ALERT_CONFIDENCE_THRESHOLD),
            dangerous_labels: file.dangerous_labels.unwrap_or_else(|| {
                DEFAULT_DANGEROUS_LABELS
                    .iter()
                    .map(|l| l.to_string())
                    .collect()
            }),
            voice_alerts_enabled: file.voice_alerts_enabled.unwrap_or(true),
            screenshots_enabled: file.screenshots_enabled.unwrap_or(true),
            camera,
            screenshot_dir: file
                .screenshot_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCREENSHOT_DIR)),
            alert_log_path: file
                .alert_log_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ALERT_LOG_PATH)),
            tts_command: file
                .tts_command
                .unwrap_or_else(|| DEFAULT_TTS_COMMAND.to_string()),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("INTELLICAM_CAMERA_URL") {
            if !url.trim().is_empty() {
                self.camera.url = url;
            }
        }
        if let Ok(timeout) = std::env::var("INTELLICAM_DISPLAY_TIMEOUT") {
            self.display_timeout = timeout
                .parse()
                .map_err(|_| anyhow!("INTELLICAM_DISPLAY_TIMEOUT must be seconds"))?;
        }
        if let Ok(cooldown) = std::env::var("INTELLICAM_ALERT_COOLDOWN") {
            self.alert_cooldown = cooldown
                .parse()
                .map_err(|_| anyhow!("INTELLICAM_ALERT_COOLDOWN must be seconds"))?;
        }
        if let Ok(labels) = std::env::var("INTELLICAM_DANGEROUS_LABELS") {
            let parsed = split_csv(&labels);
            if !parsed.is_empty() {
                self.dangerous_labels = parsed;
            }
        }
        if let Ok(voice) = std::env::var("INTELLICAM_VOICE_ALERTS") {
            self.voice_alerts_enabled = parse_bool("INTELLICAM_VOICE_ALERTS", &voice)?;
        }
        if let Ok(shots) = std::env::var("INTELLICAM_SCREENSHOTS") {
            self.screenshots_enabled = parse_bool("INTELLICAM_SCREENSHOTS", &shots)?;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        if !self.display_timeout.is_finite() || self.display_timeout <= 0.0 {
            return Err(anyhow!("display_timeout must be a positive number of seconds"));
        }
        if !self.alert_cooldown.is_finite() || self.alert_cooldown <= 0.0 {
            return Err(anyhow!("alert_cooldown must be a positive number of seconds"));
        }
        if !(0.0..=1.0).contains(&self.alert_confidence_threshold) {
            return Err(anyhow!("alert_confidence_threshold must be within 0..=1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be non-zero"));
        }
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be non-zero"));
        }
        self.dangerous_labels = self
            .dangerous_labels
            .iter()
            .map(|l| canonical_label(l))
            .filter(|l| !l.is_empty())
            .collect();
        if self.dangerous_labels.is_empty() {
            return Err(anyhow!("dangerous_labels must not be empty"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<IntellicamConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{} must be a boolean, got '{}'", name, value)),
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
