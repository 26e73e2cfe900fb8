use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;

use crate::command::domain::channel::Command;
use crate::command::domain::command_debouncer::{CommandDebouncer, Delivery};
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::session_logger::SessionLogger;
use crate::shared::bounding_box::Point;
use crate::shared::frame::Frame;
use crate::tracking::domain::lock_state::{LockState, Transition, TransitionReason};
use crate::tracking::domain::track_session::{CycleOutcome, TrackSession};
use crate::video::domain::frame_source::{FrameSource, FrameSourceError};

/// Control input applied to the session between frame cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRequest {
    Click(Point),
    Deselect,
    Exit,
}

/// Counters for one follow-me run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub transitions: usize,
    pub locks: usize,
    pub losses: usize,
    pub commands_sent: usize,
    pub commands_suppressed: usize,
    pub commands_failed: usize,
    pub final_state: LockState,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {} transitions ({} locks, {} losses), commands: {} sent, {} suppressed, {} failed, final state {}",
            self.frames,
            self.transitions,
            self.locks,
            self.losses,
            self.commands_sent,
            self.commands_suppressed,
            self.commands_failed,
            self.final_state
        )
    }
}

/// Drives a [`TrackSession`] frame by frame and turns its outcomes into
/// debounced commands.
///
/// The use case is the session's single writer: frames and control
/// requests are applied strictly one after the other.
pub struct FollowMeUseCase {
    session: TrackSession,
    detector: Box<dyn FaceDetector>,
    debouncer: Arc<CommandDebouncer>,
    logger: Box<dyn SessionLogger>,
    summary: RunSummary,
}

impl FollowMeUseCase {
    pub fn new(
        session: TrackSession,
        detector: Box<dyn FaceDetector>,
        debouncer: Arc<CommandDebouncer>,
        logger: Box<dyn SessionLogger>,
    ) -> Self {
        Self {
            session,
            detector,
            debouncer,
            logger,
            summary: RunSummary::default(),
        }
    }

    pub fn session(&self) -> &TrackSession {
        &self.session
    }

    pub fn debouncer(&self) -> &Arc<CommandDebouncer> {
        &self.debouncer
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            final_state: self.session.state(),
            ..self.summary
        }
    }

    /// Runs one cycle on `frame` captured at `now`.
    pub fn process_frame(&mut self, frame: &Frame, now: Instant) -> CycleOutcome {
        let stage = match self.session.state() {
            LockState::Locked => "track",
            LockState::Searching | LockState::Locking => "detect",
        };
        let started = Instant::now();
        let outcome = self.session.process_frame(frame, &mut *self.detector, now);
        self.logger
            .timing(stage, started.elapsed().as_secs_f64() * 1000.0);
        self.summary.frames += 1;

        if stage == "detect" {
            self.logger.metric("candidates", outcome.candidates as f64);
        }
        if let Some(transition) = &outcome.transition {
            self.record_transition(transition);
        }
        if let Some(command) = outcome.command {
            self.emit(command);
        }
        if outcome.lost {
            self.debouncer.reset();
        }
        outcome
    }

    /// Applies a control request. Returns `false` once the session should
    /// stop running.
    pub fn handle_request(&mut self, request: SessionRequest) -> bool {
        match request {
            SessionRequest::Click(point) => {
                self.session.click(point);
                true
            }
            SessionRequest::Deselect => {
                let transition = self.session.deselect();
                self.stop_outputs(transition);
                true
            }
            SessionRequest::Exit => {
                let transition = self.session.exit();
                self.stop_outputs(transition);
                false
            }
        }
    }

    /// Pulls frames until the source is exhausted or an exit request
    /// arrives. Requests queued while a frame was being acquired apply to
    /// that frame. The session is always released before returning.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        requests: &Receiver<SessionRequest>,
        start: Instant,
    ) -> Result<RunSummary, FrameSourceError> {
        loop {
            let next = source.next_frame();
            if !self.drain_requests(requests) {
                break;
            }
            match next {
                Some(Ok(captured)) => {
                    self.process_frame(&captured.frame, start + captured.captured_at);
                }
                Some(Err(e)) => {
                    self.handle_request(SessionRequest::Exit);
                    self.logger.summary();
                    return Err(e);
                }
                None => {
                    self.handle_request(SessionRequest::Exit);
                    break;
                }
            }
        }
        self.logger.summary();
        Ok(self.summary())
    }

    fn drain_requests(&mut self, requests: &Receiver<SessionRequest>) -> bool {
        while let Ok(request) = requests.try_recv() {
            if !self.handle_request(request) {
                return false;
            }
        }
        true
    }

    /// Stop is a toggle on the controller, so it is only sent when the
    /// session actually leaves a selection.
    fn stop_outputs(&mut self, transition: Option<Transition>) {
        let Some(t) = transition else {
            return;
        };
        self.record_transition(&t);
        self.emit(Command::STOP);
        self.debouncer.reset();
    }

    fn emit(&mut self, command: Command) {
        let result = self.debouncer.send(command);
        match &result {
            Ok(Delivery::Sent(_)) => self.summary.commands_sent += 1,
            Ok(Delivery::Suppressed) => self.summary.commands_suppressed += 1,
            Err(_) => self.summary.commands_failed += 1,
        }
        self.logger.command(command, &result);
    }

    fn record_transition(&mut self, transition: &Transition) {
        self.summary.transitions += 1;
        if transition.to == LockState::Locked {
            self.summary.locks += 1;
        }
        if transition.reason == TransitionReason::TrackerLost {
            self.summary.losses += 1;
        }
        self.logger.transition(transition);
    }
}
