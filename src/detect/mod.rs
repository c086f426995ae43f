//! Detector backends.

pub mod backend;
pub mod stub;

pub use backend::DetectorBackend;
pub use stub::StubDetector;
