//! Frame sources.
//!
//! A source hands the daemon one frame at a time at whatever rate the camera
//! produces them; inter-frame time is carried on the frame's timestamp, not
//! assumed fixed. The stub source synthesizes frames so the whole pipeline can
//! run without hardware.

use anyhow::Result;

use crate::config::CameraSettings;
use crate::frame::{Clock, Frame};

/// Camera/frame-source collaborator.
pub trait FrameSource: Send {
    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<Frame>;

    /// True while the source is delivering frames.
    fn is_healthy(&self) -> bool;

    fn stats(&self) -> SourceStats;
}

#[derive(Clone, Debug)]
pub struct SourceStats {
    pub url: String,
    pub frames_captured: u64,
}

/// Synthetic source producing flat gray RGB frames (`stub://` urls).
pub struct StubSource {
    settings: CameraSettings,
    clock: Clock,
    frames_captured: u64,
}

impl StubSource {
    pub fn new(settings: CameraSettings, clock: Clock) -> Self {
        Self {
            settings,
            clock,
            frames_captured: 0,
        }
    }
}

impl FrameSource for StubSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let len = self.settings.width as usize * self.settings.height as usize * 3;
        // Vary the shade a little so consecutive frames differ.
        let shade = 96u8.wrapping_add((self.frames_captured % 64) as u8);
        let frame = Frame::new(
            vec![shade; len],
            self.settings.width,
            self.settings.height,
            self.clock.now(),
        );
        self.frames_captured += 1;
        Ok(frame)
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            url: self.settings.url.clone(),
            frames_captured: self.frames_captured,
        }
    }
}

/// Open the source named by the camera settings.
///
/// Only `stub://` urls are built in; real capture backends (V4L2, RTSP) plug
/// in behind [`FrameSource`].
pub fn open_source(settings: &CameraSettings, clock: &Clock) -> Result<Box<dyn FrameSource>> {
    if settings.url.starts_with("stub://") {
        return Ok(Box::new(StubSource::new(settings.clone(), clock.clone())));
    }
    Err(anyhow::anyhow!(
        "unsupported camera url '{}' (only stub:// is built in)",
        settings.url
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CameraSettings {
        CameraSettings {
            url: "stub://webcam".to_string(),
            target_fps: 30,
            width: 4,
            height: 2,
        }
    }

    #[test]
    fn stub_source_produces_rgb_frames_with_monotonic_timestamps() -> Result<()> {
        let mut source = StubSource::new(settings(), Clock::new());
        let a = source.next_frame()?;
        let b = source.next_frame()?;
        assert_eq!(a.byte_len(), 4 * 2 * 3);
        assert!(b.timestamp >= a.timestamp);
        assert_eq!(source.stats().frames_captured, 2);
        Ok(())
    }

    #[test]
    fn open_source_rejects_unknown_schemes() {
        let mut bad = settings();
        bad.url = "rtsp://camera-1".to_string();
        assert!(open_source(&bad, &Clock::new()).is_err());
    }
}
