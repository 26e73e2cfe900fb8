use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("transport is closed")]
    Closed,
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte-level link to one controller. Opening and line configuration
/// happen before a transport is handed to the core.
pub trait Transport: Send {
    fn write(&mut self, symbol: &str) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;
}

/// A transport shared between writers. The mutex keeps one write in flight
/// per physical link so symbols never interleave on the wire.
pub type SharedTransport = Arc<Mutex<dyn Transport>>;

pub fn shared<T: Transport + 'static>(transport: T) -> SharedTransport {
    Arc::new(Mutex::new(transport))
}
