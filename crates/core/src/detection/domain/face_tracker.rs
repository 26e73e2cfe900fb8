use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Single-target visual tracker.
///
/// Seeded once with `init`, then advanced one frame at a time. An update
/// returning `None` means the target is lost; the instance is discarded
/// afterwards and never updated again.
pub trait FaceTracker: Send {
    fn init(&mut self, frame: &Frame, seed: BoundingBox);

    fn update(&mut self, frame: &Frame) -> Option<BoundingBox>;
}

/// Creates a fresh tracker instance each time a session commits to a face.
pub trait TrackerFactory: Send {
    fn create(&self) -> Box<dyn FaceTracker>;
}

impl<F> TrackerFactory for F
where
    F: Fn() -> Box<dyn FaceTracker> + Send,
{
    fn create(&self) -> Box<dyn FaceTracker> {
        self()
    }
}
