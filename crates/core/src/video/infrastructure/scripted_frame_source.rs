use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::pipeline::follow_me_use_case::SessionRequest;
use crate::shared::bounding_box::Point;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{CapturedFrame, FrameSource, FrameSourceError};
use crate::video::infrastructure::scenario::Scenario;

/// Replays a recorded scenario as a camera.
///
/// Frames are blank images of the scenario's size whose index matches the
/// scenario frame, so a [`ScriptedDetector`] can answer for them. User
/// input recorded with a frame is pushed to the request queue just before
/// that frame is handed out.
///
/// [`ScriptedDetector`]: crate::detection::infrastructure::scripted_detector::ScriptedDetector
pub struct ScriptedFrameSource {
    scenario: Arc<Scenario>,
    next: usize,
    requests: Option<Sender<SessionRequest>>,
    realtime: bool,
    started: Option<Instant>,
}

impl ScriptedFrameSource {
    pub fn new(scenario: Arc<Scenario>) -> Self {
        Self {
            scenario,
            next: 0,
            requests: None,
            realtime: false,
            started: None,
        }
    }

    pub fn with_requests(mut self, requests: Sender<SessionRequest>) -> Self {
        self.requests = Some(requests);
        self
    }

    /// Sleep until each frame's recorded time instead of replaying at once.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    fn pace(&mut self, at: Duration) {
        let started = *self.started.get_or_insert_with(Instant::now);
        let due = started + at;
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
    }

    fn forward_input(&self, click: Option<Point>, deselect: bool) {
        let Some(requests) = &self.requests else {
            return;
        };
        let pending = deselect
            .then_some(SessionRequest::Deselect)
            .into_iter()
            .chain(click.map(SessionRequest::Click));
        for request in pending {
            if requests.send(request).is_err() {
                log::debug!("Request queue closed; scripted {request:?} dropped");
            }
        }
    }
}

impl FrameSource for ScriptedFrameSource {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame, FrameSourceError>> {
        let index = self.next;
        let recorded = self.scenario.frames.get(index)?.clone();
        self.next += 1;

        let captured_at = Duration::from_millis(recorded.t_ms);
        if self.realtime {
            self.pace(captured_at);
        }
        self.forward_input(recorded.click, recorded.deselect);

        Some(Ok(CapturedFrame {
            frame: Frame::blank(self.scenario.width, self.scenario.height, index),
            captured_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Arc<Scenario> {
        let json = r#"{
            "width": 320, "height": 240,
            "frames": [
                {"t_ms": 0},
                {"t_ms": 40, "click": {"x": 10, "y": 20}},
                {"t_ms": 80, "deselect": true, "click": {"x": 1, "y": 2}}
            ]
        }"#;
        Arc::new(Scenario::from_json(json).unwrap())
    }

    #[test]
    fn test_yields_every_frame_then_ends() {
        let mut source = ScriptedFrameSource::new(scenario());
        let mut seen = Vec::new();
        while let Some(next) = source.next_frame() {
            let captured = next.unwrap();
            assert_eq!(captured.frame.width(), 320);
            assert_eq!(captured.frame.height(), 240);
            seen.push((captured.frame.index(), captured.captured_at.as_millis()));
        }
        assert_eq!(seen, vec![(0, 0), (1, 40), (2, 80)]);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_forwards_recorded_input_with_its_frame() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut source = ScriptedFrameSource::new(scenario()).with_requests(tx);

        source.next_frame();
        assert!(rx.try_recv().is_err());

        source.next_frame();
        assert_eq!(rx.try_recv().unwrap(), SessionRequest::Click(Point::new(10, 20)));

        source.next_frame();
        let requests: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            requests,
            vec![
                SessionRequest::Deselect,
                SessionRequest::Click(Point::new(1, 2))
            ]
        );
    }

    #[test]
    fn test_closed_queue_does_not_stop_replay() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut source = ScriptedFrameSource::new(scenario()).with_requests(tx);
        assert_eq!(std::iter::from_fn(|| source.next_frame()).count(), 3);
    }

    #[test]
    fn test_realtime_paces_frames() {
        let started = Instant::now();
        let mut source = ScriptedFrameSource::new(scenario()).realtime(true);
        while source.next_frame().is_some() {}
        assert!(started.elapsed() >= Duration::from_millis(80));
    }
}
