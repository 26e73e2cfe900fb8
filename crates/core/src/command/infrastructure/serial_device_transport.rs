use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::command::domain::transport::{Transport, TransportError};

/// Writes command symbols as raw bytes to a serial device node.
///
/// The device must already be configured (baud rate, line discipline);
/// this type only opens it for writing. Each symbol is flushed on its own.
/// A failed write closes the transport; it stays closed until replaced.
pub struct SerialDeviceTransport {
    label: String,
    writer: Option<Box<dyn Write + Send>>,
}

impl SerialDeviceTransport {
    pub fn open(path: &Path) -> Result<Self, TransportError> {
        let file = OpenOptions::new().write(true).open(path)?;
        Ok(Self::from_writer(&path.display().to_string(), Box::new(file)))
    }

    /// Opens `path`, falling back to a closed transport on failure so the
    /// rest of the system can start without the controller attached.
    pub fn connect(path: &Path) -> Self {
        match Self::open(path) {
            Ok(transport) => {
                log::info!("Connected to controller at {}", path.display());
                transport
            }
            Err(e) => {
                log::warn!("Could not open {}: {e}", path.display());
                Self::closed(&path.display().to_string())
            }
        }
    }

    pub fn from_writer(label: &str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            label: label.to_string(),
            writer: Some(writer),
        }
    }

    pub fn closed(label: &str) -> Self {
        Self {
            label: label.to_string(),
            writer: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn close(&mut self) {
        self.writer = None;
    }
}

impl Transport for SerialDeviceTransport {
    fn write(&mut self, symbol: &str) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::Closed)?;
        let result = writer
            .write_all(symbol.as_bytes())
            .and_then(|_| writer.flush());
        if let Err(e) = result {
            log::warn!("Write to {} failed, closing: {e}", self.label);
            self.writer = None;
            return Err(e.into());
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}
