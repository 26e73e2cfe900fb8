use std::sync::Arc;

use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::shared::bounding_box::Candidate;
use crate::shared::frame::Frame;
use crate::video::infrastructure::scenario::Scenario;

/// Detector that answers from a recorded scenario, keyed by frame index.
///
/// Cheap to clone; clones share the same scenario.
#[derive(Clone)]
pub struct ScriptedDetector {
    scenario: Arc<Scenario>,
}

impl ScriptedDetector {
    pub fn new(scenario: Arc<Scenario>) -> Self {
        Self { scenario }
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Candidate>, DetectionError> {
        self.scenario
            .frames
            .get(frame.index())
            .map(|f| f.faces.clone())
            .ok_or_else(|| {
                DetectionError::Unavailable(format!("no scripted frame {}", frame.index()))
            })
    }
}
