use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::command::domain::channel::Command;
use crate::command::domain::dispatch_router::DispatchRouter;

/// Periodically sends the blink command on the face channel so the display
/// looks alive whatever the lock state.
///
/// Beats go straight to the router: they are not debounced, and a failed
/// beat is logged and skipped without stopping the emitter.
pub struct HeartbeatEmitter {
    router: Arc<DispatchRouter>,
    interval: Duration,
}

impl HeartbeatEmitter {
    pub fn new(router: Arc<DispatchRouter>, interval: Duration) -> Self {
        Self { router, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sends one beat. Returns whether it reached the transport.
    pub fn emit_once(&self) -> bool {
        let beat = Command::Blink;
        match self.router.dispatch(beat.channel(), beat.symbol()) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Heartbeat skipped: {e}");
                false
            }
        }
    }

    /// Starts beating on a background thread, first beat immediately.
    pub fn spawn(self) -> HeartbeatHandle {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let thread = std::thread::spawn(move || self.run(stop_rx));
        HeartbeatHandle {
            stop_tx,
            thread: Some(thread),
        }
    }

    fn run(self, stop_rx: Receiver<()>) -> usize {
        let ticker = crossbeam_channel::tick(self.interval);
        let mut beats = 0;
        loop {
            if self.emit_once() {
                beats += 1;
            }
            crossbeam_channel::select! {
                recv(ticker) -> _ => {}
                recv(stop_rx) -> _ => break,
            }
        }
        log::debug!("Heartbeat stopped after {beats} beats");
        beats
    }
}

/// Owns the heartbeat thread; stopping (or dropping) it ends the thread.
pub struct HeartbeatHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<usize>>,
}

impl HeartbeatHandle {
    /// Stops the emitter and returns how many beats were delivered.
    pub fn stop(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        let _ = self.stop_tx.try_send(());
        self.thread
            .take()
            .and_then(|t| t.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
