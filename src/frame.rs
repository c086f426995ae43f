//! Frame and detection value types.
//!
//! - `Frame`: raw RGB pixels plus capture metadata, produced by an ingest source.
//! - `Detection`: one labeled box from the detector, confidence in 0..=1.
//! - `FrameSnapshot`: the per-frame detection list the core consumes.
//!
//! Snapshots are sanitized at the pipeline boundary: malformed detections
//! (confidence outside 0..=1, degenerate box) are dropped and counted before
//! the tracker ever sees them.

use std::sync::Arc;
use std::time::Instant;

/// Monotonic clock shared by the ingest path.
///
/// Snapshot timestamps are seconds since the clock's start, so the core's
/// time arithmetic is plain `f64` and tests can fabricate timestamps freely.
#[derive(Clone, Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was created.
    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical form of an object label: trimmed, lowercased.
///
/// Every classifier, tracker, and debouncer lookup goes through this, so
/// "Knife", " knife " and "knife" are the same object class.
pub fn canonical_label(label: &str) -> String {
    label.trim().to_lowercase()
}

// ----------------------------------------------------------------------------
// Frame
// ----------------------------------------------------------------------------

/// One captured camera frame: packed RGB24 pixels plus capture time.
///
/// Frames are reference-counted so the dispatch worker can hold one for a
/// screenshot write after the frame loop has moved on.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pixels: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// Monotonic capture time in seconds (see [`Clock`]).
    pub timestamp: f64,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, timestamp: f64) -> Self {
        Self {
            pixels: Arc::new(pixels),
            width,
            height,
            timestamp,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

// ----------------------------------------------------------------------------
// Detections
// ----------------------------------------------------------------------------

/// Axis-aligned box in integer pixel coordinates. Valid when x1 < x2 and y1 < y2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }
}

/// One detector output for one frame.
#[derive(Clone, Debug)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// Canonical label for set lookups.
    pub fn canonical_label(&self) -> String {
        canonical_label(&self.label)
    }

    fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence) && self.bbox.is_valid()
    }
}

/// Ordered detections for one frame plus the frame's monotonic timestamp.
#[derive(Clone, Debug, Default)]
pub struct FrameSnapshot {
    pub detections: Vec<Detection>,
    pub timestamp: f64,
}

impl FrameSnapshot {
    pub fn new(detections: Vec<Detection>, timestamp: f64) -> Self {
        Self {
            detections,
            timestamp,
        }
    }

    /// Drop malformed detections in place, returning how many were removed.
    ///
    /// A detection is malformed when its confidence falls outside 0..=1 or its
    /// box is degenerate. The tracker and debouncer only ever see sanitized
    /// snapshots.
    pub fn sanitize(&mut self) -> usize {
        let before = self.detections.len();
        self.detections.retain(Detection::is_well_formed);
        before - self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
