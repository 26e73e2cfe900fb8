use thiserror::Error;

use crate::shared::bounding_box::Candidate;
use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("face detection unavailable: {0}")]
    Unavailable(String),
}

/// Domain interface for face detection.
///
/// No ordering or determinism is promised; callers apply their own
/// confidence threshold. Implementations may be stateful, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Candidate>, DetectionError>;
}
