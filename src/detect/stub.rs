use anyhow::Result;

use crate::frame::{BoundingBox, Detection, Frame};

use super::backend::DetectorBackend;

/// Scripted detector for tests and camera-less runs.
///
/// Plays back a fixed sequence of per-frame detection lists, then returns
/// empty frames. `looping(..)` replays the script forever instead, which is
/// what the daemon uses with a stub source.
pub struct StubDetector {
    script: Vec<Vec<Detection>>,
    cursor: usize,
    looping: bool,
}

impl StubDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script,
            cursor: 0,
            looping: false,
        }
    }

    pub fn looping(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script,
            cursor: 0,
            looping: true,
        }
    }

    /// Script used by `intellicamd` when no real model is configured:
    /// a person walks in, a knife appears briefly, everything leaves.
    pub fn demo_script() -> Vec<Vec<Detection>> {
        let person = || Detection::new("person", 0.82, BoundingBox::new(120, 60, 420, 460));
        let knife = || Detection::new("knife", 0.91, BoundingBox::new(300, 220, 380, 300));
        vec![
            vec![],
            vec![person()],
            vec![person()],
            vec![person(), knife()],
            vec![person(), knife()],
            vec![person()],
            vec![person()],
            vec![],
            vec![],
        ]
    }
}

impl DetectorBackend for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        if self.script.is_empty() {
            return Ok(vec![]);
        }
        if self.cursor >= self.script.len() {
            if self.looping {
                self.cursor = 0;
            } else {
                return Ok(vec![]);
            }
        }
        let detections = self.script[self.cursor].clone();
        self.cursor += 1;
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 0.0)
    }

    #[test]
    fn plays_script_then_goes_quiet() -> Result<()> {
        let script = vec![
            vec![Detection::new("person", 0.8, BoundingBox::new(0, 0, 5, 5))],
            vec![],
        ];
        let mut detector = StubDetector::new(script);
        assert_eq!(detector.detect(&frame())?.len(), 1);
        assert!(detector.detect(&frame())?.is_empty());
        assert!(detector.detect(&frame())?.is_empty());
        Ok(())
    }

    #[test]
    fn looping_replays_from_the_start() -> Result<()> {
        let script = vec![vec![Detection::new("person", 0.8, BoundingBox::new(0, 0, 5, 5))]];
        let mut detector = StubDetector::looping(script);
        for _ in 0..5 {
            assert_eq!(detector.detect(&frame())?.len(), 1);
        }
        Ok(())
    }
}
