use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::command::domain::transport::{Transport, TransportError};

/// In-memory transport that records every symbol written to it.
///
/// Clones share state, so a caller can keep a handle for inspection after
/// handing the transport to a router. Used for dry runs and tests.
#[derive(Clone)]
pub struct RecordingTransport {
    label: String,
    written: Arc<Mutex<Vec<String>>>,
    open: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::with_label("recording")
    }

    pub fn with_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            written: Arc::new(Mutex::new(Vec::new())),
            open: Arc::new(AtomicBool::new(true)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn reopen(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail with an I/O error while staying open.
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    fn write(&mut self, symbol: &str) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::Closed);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "simulated failure").into());
        }
        log::debug!("[{}] <- '{symbol}'", self.label);
        self.written
            .lock()
            .map_err(|_| TransportError::Closed)?
            .push(symbol.to_string());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}
