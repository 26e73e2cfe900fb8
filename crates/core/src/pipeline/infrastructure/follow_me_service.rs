use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::command::domain::channel::ChannelId;
use crate::command::domain::command_debouncer::{CommandDebouncer, Delivery};
use crate::command::domain::dispatch_router::DispatchError;
use crate::heartbeat::heartbeat_emitter::{HeartbeatEmitter, HeartbeatHandle};
use crate::pipeline::follow_me_use_case::{FollowMeUseCase, RunSummary, SessionRequest};
use crate::shared::bounding_box::Point;
use crate::video::domain::frame_source::{FrameSource, FrameSourceError};

#[derive(Error, Debug)]
pub enum FollowMeError {
    #[error("cannot start follow-me: {0}")]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    FrameSource(#[from] FrameSourceError),
    #[error("follow-me worker panicked")]
    WorkerPanicked,
}

/// Runs the follow-me loop on a worker thread so the caller stays free to
/// submit commands and control requests.
///
/// Layout: `source → worker [session/debounce/dispatch]`, with an optional
/// heartbeat thread beside it. Requests reach the worker through a queue
/// and are applied between frames.
pub struct FollowMeService {
    requests_tx: Sender<SessionRequest>,
    requests_rx: Receiver<SessionRequest>,
}

impl FollowMeService {
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = crossbeam_channel::unbounded();
        Self {
            requests_tx,
            requests_rx,
        }
    }

    /// Sender for input devices that feed requests directly to the loop.
    pub fn requests(&self) -> Sender<SessionRequest> {
        self.requests_tx.clone()
    }

    /// Starts the loop. Fails without spawning anything when the motor
    /// controller is not connected.
    pub fn start(
        self,
        mut use_case: FollowMeUseCase,
        mut source: Box<dyn FrameSource>,
        heartbeat: Option<HeartbeatEmitter>,
    ) -> Result<FollowMeHandle, FollowMeError> {
        let debouncer = use_case.debouncer().clone();
        if !debouncer.router().is_open(ChannelId::Motor) {
            return Err(DispatchError::ChannelUnavailable {
                channel: ChannelId::Motor,
                reason: "motor controller not connected".to_string(),
            }
            .into());
        }

        let heartbeat = heartbeat.map(HeartbeatEmitter::spawn);
        let requests_rx = self.requests_rx;
        let worker = std::thread::spawn(move || {
            let start = Instant::now();
            log::info!("Follow-me started ({})", use_case.session().policy().name());
            let result = use_case.run(&mut *source, &requests_rx, start);
            log::info!("Follow-me stopped");
            result
        });

        Ok(FollowMeHandle {
            requests_tx: self.requests_tx,
            debouncer,
            worker: Some(worker),
            heartbeat,
        })
    }
}

impl Default for FollowMeService {
    fn default() -> Self {
        Self::new()
    }
}

/// Control surface of a running follow-me loop.
pub struct FollowMeHandle {
    requests_tx: Sender<SessionRequest>,
    debouncer: Arc<CommandDebouncer>,
    worker: Option<JoinHandle<Result<RunSummary, FrameSourceError>>>,
    heartbeat: Option<HeartbeatHandle>,
}

impl FollowMeHandle {
    /// Sends a one-off command through the shared debouncer.
    pub fn submit(&self, channel: ChannelId, symbol: &str) -> Result<Delivery, DispatchError> {
        self.debouncer.maybe_send(channel, symbol)
    }

    pub fn click(&self, point: Point) {
        self.request(SessionRequest::Click(point));
    }

    pub fn deselect(&self) {
        self.request(SessionRequest::Deselect);
    }

    /// Asks the loop to release its target and stop after the current frame.
    pub fn exit(&self) {
        self.request(SessionRequest::Exit);
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Waits for the loop to finish, then stops the heartbeat.
    pub fn wait(mut self) -> Result<RunSummary, FollowMeError> {
        let result = match self.worker.take() {
            Some(worker) => match worker.join() {
                Ok(run) => run.map_err(FollowMeError::from),
                Err(_) => Err(FollowMeError::WorkerPanicked),
            },
            None => Err(FollowMeError::WorkerPanicked),
        };
        if let Some(heartbeat) = self.heartbeat.take() {
            let beats = heartbeat.stop();
            log::debug!("Heartbeat delivered {beats} beats");
        }
        result
    }

    fn request(&self, request: SessionRequest) {
        if self.requests_tx.send(request).is_err() {
            log::debug!("Follow-me loop already stopped; {request:?} dropped");
        }
    }
}
