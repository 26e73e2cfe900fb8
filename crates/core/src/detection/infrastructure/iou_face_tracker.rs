use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_tracker::FaceTracker;
use crate::shared::bounding_box::{BoundingBox, Candidate};
use crate::shared::frame::Frame;

/// Tracker adapter that follows a face by re-detecting every frame and
/// associating the detection with the best overlap to the previous box.
///
/// Stands in for a dedicated visual tracker when only a detector is
/// available. The target is lost as soon as no detection overlaps the last
/// known box by at least `min_iou`. Detections below `confidence_threshold`
/// are ignored, as they are during selection.
pub struct IouFaceTracker {
    detector: Box<dyn FaceDetector>,
    current: Option<BoundingBox>,
    min_iou: f64,
    confidence_threshold: f64,
}

impl IouFaceTracker {
    pub fn new(detector: Box<dyn FaceDetector>, min_iou: f64, confidence_threshold: f64) -> Self {
        Self {
            detector,
            current: None,
            min_iou,
            confidence_threshold,
        }
    }

    fn best_match(&self, prev: &BoundingBox, boxes: &[BoundingBox]) -> Option<BoundingBox> {
        boxes
            .iter()
            .map(|b| (*b, prev.iou(b)))
            .filter(|(_, score)| *score >= self.min_iou)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(b, _)| b)
    }
}

impl FaceTracker for IouFaceTracker {
    fn init(&mut self, _frame: &Frame, seed: BoundingBox) {
        self.current = Some(seed);
    }

    fn update(&mut self, frame: &Frame) -> Option<BoundingBox> {
        let prev = self.current?;
        let boxes: Vec<BoundingBox> = match self.detector.detect(frame) {
            Ok(candidates) => Candidate::filter_confident(&candidates, self.confidence_threshold)
                .into_iter()
                .map(|c| c.bbox)
                .collect(),
            Err(e) => {
                log::debug!("tracker detection failed: {e}");
                Vec::new()
            }
        };
        self.current = self.best_match(&prev, &boxes);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::DetectionError;

    struct FakeDetector {
        results: Vec<Result<Vec<Candidate>, DetectionError>>,
        call_count: usize,
    }

    impl FakeDetector {
        fn new(results: Vec<Result<Vec<Candidate>, DetectionError>>) -> Self {
            Self {
                results,
                call_count: 0,
            }
        }
    }

    impl FaceDetector for FakeDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Candidate>, DetectionError> {
            let result = self.results[self.call_count % self.results.len()].clone();
            self.call_count += 1;
            result
        }
    }

    fn face(x: i32, y: i32) -> Candidate {
        Candidate::new(BoundingBox::new(x, y, 50, 50), 0.9)
    }

    fn frame() -> Frame {
        Frame::blank(200, 200, 0)
    }

    #[test]
    fn test_update_before_init_is_lost() {
        let mut tracker = IouFaceTracker::new(Box::new(FakeDetector::new(vec![Ok(vec![])])), 0.3, 0.5);
        assert!(tracker.update(&frame()).is_none());
    }

    #[test]
    fn test_follows_overlapping_detection() {
        let detector = FakeDetector::new(vec![Ok(vec![face(15, 12)])]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        let b = tracker.update(&frame()).unwrap();
        assert_eq!((b.x, b.y), (15, 12));
    }

    #[test]
    fn test_picks_highest_overlap_among_several() {
        let detector = FakeDetector::new(vec![Ok(vec![face(30, 10), face(12, 10)])]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        assert_eq!(tracker.update(&frame()).unwrap().x, 12);
    }

    #[test]
    fn test_lost_when_no_overlap() {
        let detector = FakeDetector::new(vec![Ok(vec![face(150, 150)])]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        assert!(tracker.update(&frame()).is_none());
        // Stays lost even if the face comes back.
        assert!(tracker.update(&frame()).is_none());
    }

    #[test]
    fn test_low_confidence_overlap_is_ignored() {
        let weak = Candidate::new(BoundingBox::new(12, 10, 50, 50), 0.2);
        let detector = FakeDetector::new(vec![Ok(vec![weak])]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        assert!(tracker.update(&frame()).is_none());
    }

    #[test]
    fn test_low_confidence_does_not_outrank_confident_match() {
        let weak = Candidate::new(BoundingBox::new(10, 10, 50, 50), 0.2);
        let detector = FakeDetector::new(vec![Ok(vec![weak, face(20, 10)])]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        assert_eq!(tracker.update(&frame()).unwrap().x, 20);
    }

    #[test]
    fn test_detector_error_counts_as_lost() {
        let detector = FakeDetector::new(vec![Err(DetectionError::Unavailable("gone".into()))]);
        let mut tracker = IouFaceTracker::new(Box::new(detector), 0.3, 0.5);
        tracker.init(&frame(), BoundingBox::new(10, 10, 50, 50));

        assert!(tracker.update(&frame()).is_none());
    }
}
