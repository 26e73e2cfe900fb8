use std::time::Instant;

use crate::command::domain::channel::Command;
use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::face_tracker::{FaceTracker, TrackerFactory};
use crate::selection::domain::selection_policy::{SelectionOutcome, SelectionPolicy};
use crate::selection::domain::selection_region::SelectionRegion;
use crate::shared::bounding_box::{BoundingBox, Candidate, Point};
use crate::shared::frame::Frame;
use crate::tracking::domain::lock_state::{LockState, Transition, TransitionReason};
use crate::tracking::domain::zone_mapper::{zone_for_box, Zone};

/// What one frame cycle did to the session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CycleOutcome {
    pub state: LockState,
    pub transition: Option<Transition>,
    /// Candidates that passed the confidence threshold (0 while locked).
    pub candidates: usize,
    pub tracked: Option<BoundingBox>,
    pub zone: Option<Zone>,
    /// Command the cycle wants sent, before debouncing.
    pub command: Option<Command>,
    pub lost: bool,
    pub ambiguous: bool,
}

/// The face-lock state machine.
///
/// Owns the current phase and, while `Locked`, the only tracker instance.
/// It performs no I/O: commands are returned in [`CycleOutcome`] for the
/// caller to debounce and dispatch. Exactly one frame loop may drive a
/// session; it is `Send` but intentionally not shared.
pub struct TrackSession {
    state: LockState,
    tracked: Option<BoundingBox>,
    lock_start: Option<Instant>,
    tracker: Option<Box<dyn FaceTracker>>,
    policy: SelectionPolicy,
    region: SelectionRegion,
    confidence_threshold: f64,
    tracker_factory: Box<dyn TrackerFactory>,
}

impl TrackSession {
    pub fn new(
        policy: SelectionPolicy,
        region: SelectionRegion,
        confidence_threshold: f64,
        tracker_factory: Box<dyn TrackerFactory>,
    ) -> Self {
        Self {
            state: LockState::Searching,
            tracked: None,
            lock_start: None,
            tracker: None,
            policy,
            region,
            confidence_threshold,
            tracker_factory,
        }
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn tracked_box(&self) -> Option<BoundingBox> {
        self.tracked
    }

    pub fn lock_start(&self) -> Option<Instant> {
        self.lock_start
    }

    pub fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn region(&self) -> SelectionRegion {
        self.region
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Queues a user click for manual selection. Ignored while locked or
    /// when the policy is automatic.
    pub fn click(&mut self, point: Point) -> bool {
        if self.state == LockState::Locked {
            log::debug!("Click at ({}, {}) ignored while locked", point.x, point.y);
            return false;
        }
        self.policy.click(point)
    }

    /// Runs one cycle: detection and selection while searching or locking,
    /// tracker update while locked.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        detector: &mut dyn FaceDetector,
        now: Instant,
    ) -> CycleOutcome {
        let outcome = match self.state {
            LockState::Searching | LockState::Locking => {
                self.select_target(frame, detector.detect(frame), now)
            }
            LockState::Locked => self.track(frame),
        };
        outcome
    }

    /// Unconditionally returns to `Searching`, dropping the tracker and any
    /// pending selection input.
    pub fn deselect(&mut self) -> Option<Transition> {
        self.release(TransitionReason::Deselect)
    }

    /// Like [`deselect`](Self::deselect); the caller stops driving the
    /// session afterwards.
    pub fn exit(&mut self) -> Option<Transition> {
        self.release(TransitionReason::Exit)
    }

    fn select_target(
        &mut self,
        frame: &Frame,
        detection: Result<Vec<Candidate>, DetectionError>,
        now: Instant,
    ) -> CycleOutcome {
        let candidates = match detection {
            Ok(all) => Candidate::filter_confident(&all, self.confidence_threshold),
            Err(e) => {
                log::warn!("{e}");
                return self.detection_unavailable();
            }
        };

        let elapsed = self.lock_start.map(|start| now.saturating_duration_since(start));
        let selection = self.policy.select(&candidates, &self.region, elapsed);

        let mut outcome = CycleOutcome {
            candidates: candidates.len(),
            ..CycleOutcome::default()
        };

        let transition = match (self.state, selection) {
            (_, SelectionOutcome::Selected(candidate)) => {
                Some(self.commit(frame, candidate.bbox, now, TransitionReason::ManualSelect))
            }
            (LockState::Searching, SelectionOutcome::InRegion { ambiguous, .. }) => {
                outcome.ambiguous = ambiguous;
                self.lock_start = Some(now);
                Some(self.move_to(LockState::Locking, TransitionReason::EnteredRegion))
            }
            (
                LockState::Locking,
                SelectionOutcome::InRegion {
                    candidate,
                    dwell_complete,
                    ambiguous,
                },
            ) => {
                outcome.ambiguous = ambiguous;
                dwell_complete.then(|| {
                    self.commit(frame, candidate.bbox, now, TransitionReason::DwellComplete)
                })
            }
            (LockState::Locking, SelectionOutcome::NotInRegion | SelectionOutcome::NoSelection) => {
                self.lock_start = None;
                Some(self.move_to(LockState::Searching, TransitionReason::LeftRegion))
            }
            _ => None,
        };
        outcome.transition = transition;
        if outcome.ambiguous {
            log::warn!("Several faces inside the selection region; following the last one");
        }

        outcome.state = self.state;
        outcome.tracked = self.tracked;
        outcome
    }

    fn detection_unavailable(&mut self) -> CycleOutcome {
        let transition = (self.state == LockState::Locking).then(|| {
            self.lock_start = None;
            self.move_to(LockState::Searching, TransitionReason::DetectionUnavailable)
        });
        CycleOutcome {
            state: self.state,
            transition,
            ..CycleOutcome::default()
        }
    }

    fn track(&mut self, frame: &Frame) -> CycleOutcome {
        let updated = self.tracker.as_mut().and_then(|t| t.update(frame));
        match updated {
            Some(bbox) => {
                self.tracked = Some(bbox);
                let zone = zone_for_box(&bbox, frame.width());
                CycleOutcome {
                    state: self.state,
                    tracked: Some(bbox),
                    zone: Some(zone),
                    command: Some(zone.command()),
                    ..CycleOutcome::default()
                }
            }
            None => {
                log::info!("Lost track of the face");
                let transition = self.release(TransitionReason::TrackerLost);
                CycleOutcome {
                    state: self.state,
                    transition,
                    command: Some(Command::STOP),
                    lost: true,
                    ..CycleOutcome::default()
                }
            }
        }
    }

    /// Seeds a fresh tracker on `bbox` and enters `Locked`.
    fn commit(
        &mut self,
        frame: &Frame,
        bbox: BoundingBox,
        now: Instant,
        reason: TransitionReason,
    ) -> Transition {
        let mut tracker = self.tracker_factory.create();
        tracker.init(frame, bbox);
        self.tracker = Some(tracker);
        self.tracked = Some(bbox);
        self.lock_start.get_or_insert(now);
        self.move_to(LockState::Locked, reason)
    }

    fn release(&mut self, reason: TransitionReason) -> Option<Transition> {
        self.tracker = None;
        self.tracked = None;
        self.lock_start = None;
        self.policy.clear();
        (self.state != LockState::Searching)
            .then(|| self.move_to(LockState::Searching, reason))
    }

    fn move_to(&mut self, to: LockState, reason: TransitionReason) -> Transition {
        let from = std::mem::replace(&mut self.state, to);
        let transition = Transition { from, to, reason };
        log::info!("Lock state {transition}");
        transition
    }
}
