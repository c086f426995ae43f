use anyhow::Result;

use crate::frame::{Detection, Frame};

/// Detector backend trait.
///
/// Backends wrap an external model (ONNX runtime, remote inference box, test
/// stub) behind one call per frame. Zero detections is a normal result, not an
/// error; confidences are expected to be normalized to 0..=1 already. The
/// pipeline still sanitizes every snapshot, so a misbehaving backend cannot
/// push malformed detections into the tracker.
pub trait DetectorBackend: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Run detection on one frame.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;

    /// Optional warm-up hook (model load, first-inference JIT).
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
