use std::time::Duration;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
#[error("frame acquisition failed: {0}")]
pub struct FrameSourceError(pub String);

/// A frame plus its capture time, measured from when the source started.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub frame: Frame,
    pub captured_at: Duration,
}

/// Abstracts camera acquisition so the frame loop does not depend on a
/// capture backend. `None` means the source is exhausted.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame, FrameSourceError>>;
}
