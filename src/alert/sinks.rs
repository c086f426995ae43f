//! Side-effect collaborator contracts and their default implementations.
//!
//! Speech, screenshots, and the alert log are best-effort: a failing sink is
//! reported and counted by the dispatcher, never propagated into the frame
//! loop.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, Result};
use chrono::Local;

use crate::frame::Frame;

/// Text-to-speech collaborator. Best-effort; may be slow or fail.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Screenshot collaborator: persists a frame tagged with label + timestamp.
pub trait ScreenshotSink: Send {
    fn save(&mut self, frame: &Frame, label: &str) -> Result<PathBuf>;
}

/// Append-only alert log collaborator. One UTF-8 record per line.
pub trait LogSink: Send {
    fn append(&mut self, line: &str) -> Result<()>;
}

/// Format one alert log record: `[HH:MM:SS] ALERT: <label> detected`.
pub fn alert_log_line(label: &str) -> String {
    format!(
        "[{}] ALERT: {} detected",
        Local::now().format("%H:%M:%S"),
        label
    )
}

// ----------------------------------------------------------------------------
// Default implementations
// ----------------------------------------------------------------------------

/// Speaks by shelling out to an external TTS command (default `espeak`).
///
/// The child process is waited on inside the dispatch worker, so synthesis
/// latency never touches the frame loop.
pub struct CommandSpeech {
    program: String,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandSpeech {
    fn default() -> Self {
        Self::new("espeak")
    }
}

impl SpeechSynthesizer for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| anyhow!("failed to launch tts command '{}': {}", self.program, e))?;
        if !status.success() {
            return Err(anyhow!("tts command '{}' exited with {}", self.program, status));
        }
        Ok(())
    }
}

/// Writes frames as JPEG files named `{label}_{wall_clock}.jpg`.
pub struct JpegScreenshotSink {
    dir: PathBuf,
}

impl JpegScreenshotSink {
    /// Creates the screenshot directory if it does not exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| anyhow!("failed to create screenshot dir {}: {}", dir.display(), e))?;
        Ok(Self { dir })
    }
}

impl ScreenshotSink for JpegScreenshotSink {
    fn save(&mut self, frame: &Frame, label: &str) -> Result<PathBuf> {
        let expected = frame.width as usize * frame.height as usize * 3;
        if frame.byte_len() != expected {
            return Err(anyhow!(
                "frame length mismatch: expected {} RGB bytes, got {}",
                expected,
                frame.byte_len()
            ));
        }
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let path = self.dir.join(format!("{}_{}.jpg", label, stamp));
        image::save_buffer(
            &path,
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| anyhow!("failed to write screenshot {}: {}", path.display(), e))?;
        Ok(path)
    }
}

/// Appends alert records to a text file, one per line.
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LogSink for FileLogSink {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| anyhow!("failed to open alert log {}: {}", self.path.display(), e))?;
        writeln!(file, "{}", line)
            .map_err(|e| anyhow!("failed to append alert log {}: {}", self.path.display(), e))?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
