use std::collections::HashMap;

use thiserror::Error;

use crate::command::domain::channel::ChannelId;
use crate::command::domain::translation_table::TranslationTable;
use crate::command::domain::transport::SharedTransport;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid {channel} command '{symbol}'")]
    InvalidCommand { channel: ChannelId, symbol: String },
    #[error("{channel} channel unavailable: {reason}")]
    ChannelUnavailable { channel: ChannelId, reason: String },
}

/// Acknowledges a forwarded command with the symbol actually written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub channel: ChannelId,
    pub requested: String,
    pub sent: String,
}

struct Binding {
    table: TranslationTable,
    transport: SharedTransport,
}

/// Validates commands against each channel's translation table and writes
/// the translated symbol to that channel's transport.
///
/// Failures are returned to the caller and never retried here.
#[derive(Default)]
pub struct DispatchRouter {
    bindings: HashMap<ChannelId, Binding>,
}

impl DispatchRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default tables with the control channel driving the motor
    /// controller, as the start/stop toggle lives on that board.
    pub fn standard(motor: SharedTransport, face: SharedTransport) -> Self {
        Self::new()
            .with_channel(ChannelId::Motor, TranslationTable::motor(), motor.clone())
            .with_channel(ChannelId::Control, TranslationTable::control(), motor)
            .with_channel(ChannelId::Face, TranslationTable::face(), face)
    }

    pub fn with_channel(
        mut self,
        channel: ChannelId,
        table: TranslationTable,
        transport: SharedTransport,
    ) -> Self {
        self.bindings.insert(channel, Binding { table, transport });
        self
    }

    pub fn table(&self, channel: ChannelId) -> Option<&TranslationTable> {
        self.bindings.get(&channel).map(|b| &b.table)
    }

    pub fn is_open(&self, channel: ChannelId) -> bool {
        self.bindings
            .get(&channel)
            .and_then(|b| b.transport.lock().ok().map(|t| t.is_open()))
            .unwrap_or(false)
    }

    pub fn dispatch(&self, channel: ChannelId, raw: &str) -> Result<Ack, DispatchError> {
        let result = self.forward(channel, raw);
        match &result {
            Ok(ack) => log::debug!("{channel}: sent '{}' (from '{raw}')", ack.sent),
            Err(e) => log::warn!("{e}"),
        }
        result
    }

    fn forward(&self, channel: ChannelId, raw: &str) -> Result<Ack, DispatchError> {
        let binding = self
            .bindings
            .get(&channel)
            .ok_or_else(|| unavailable(channel, "no transport bound"))?;

        let translated = binding
            .table
            .translate(raw)
            .ok_or_else(|| DispatchError::InvalidCommand {
                channel,
                symbol: raw.to_string(),
            })?;

        let mut transport = binding
            .transport
            .lock()
            .map_err(|_| unavailable(channel, "transport lock poisoned"))?;
        if !transport.is_open() {
            return Err(unavailable(channel, "not connected"));
        }
        transport
            .write(translated)
            .map_err(|e| unavailable(channel, &e.to_string()))?;

        Ok(Ack {
            channel,
            requested: raw.to_string(),
            sent: translated.to_string(),
        })
    }
}

fn unavailable(channel: ChannelId, reason: &str) -> DispatchError {
    DispatchError::ChannelUnavailable {
        channel,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::domain::transport::shared;
    use crate::command::infrastructure::recording_transport::RecordingTransport;
    use rstest::rstest;

    fn router() -> (DispatchRouter, RecordingTransport, RecordingTransport) {
        let motor = RecordingTransport::new();
        let face = RecordingTransport::new();
        let router = DispatchRouter::standard(shared(motor.clone()), shared(face.clone()));
        (router, motor, face)
    }

    #[test]
    fn test_translates_motor_command() {
        let (router, motor, _) = router();
        let ack = router.dispatch(ChannelId::Motor, "4").unwrap();
        assert_eq!(ack.sent, "2");
        assert_eq!(ack.requested, "4");
        assert_eq!(motor.written(), vec!["2"]);
    }

    #[test]
    fn test_invalid_command_never_written() {
        let (router, motor, face) = router();
        let err = router.dispatch(ChannelId::Motor, "x").unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidCommand {
                channel: ChannelId::Motor,
                symbol: "x".into()
            }
        );
        assert!(motor.written().is_empty());
        assert!(face.written().is_empty());
    }

    #[rstest]
    #[case(ChannelId::Motor)]
    #[case(ChannelId::Face)]
    #[case(ChannelId::Control)]
    fn test_every_table_symbol_forwards_mapped_value(#[case] channel: ChannelId) {
        let motor = RecordingTransport::new();
        let face = RecordingTransport::new();
        let router = DispatchRouter::standard(shared(motor.clone()), shared(face.clone()));
        let table = TranslationTable::for_channel(channel);
        let sink = if channel == ChannelId::Face { &face } else { &motor };

        for symbol in table.symbols() {
            let ack = router.dispatch(channel, symbol).unwrap();
            assert_eq!(Some(ack.sent.as_str()), table.translate(symbol));
            assert_eq!(sink.written().last().map(String::as_str), table.translate(symbol));
        }
        assert_eq!(sink.written().len(), table.len());
    }

    #[test]
    fn test_control_shares_motor_transport() {
        let (router, motor, face) = router();
        router.dispatch(ChannelId::Control, "s").unwrap();
        assert_eq!(motor.written(), vec!["s"]);
        assert!(face.written().is_empty());
    }

    #[test]
    fn test_closed_transport_is_unavailable() {
        let (router, motor, _) = router();
        motor.close();
        let err = router.dispatch(ChannelId::Motor, "3").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ChannelUnavailable {
                channel: ChannelId::Motor,
                ..
            }
        ));
        assert!(motor.written().is_empty());
    }

    #[test]
    fn test_validation_precedes_availability() {
        let (router, motor, _) = router();
        motor.close();
        let err = router.dispatch(ChannelId::Motor, "zz").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidCommand { .. }));
    }

    #[test]
    fn test_write_failure_is_unavailable() {
        let (router, _, face) = router();
        face.fail_writes(true);
        let err = router.dispatch(ChannelId::Face, "B").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::ChannelUnavailable {
                channel: ChannelId::Face,
                ..
            }
        ));
    }

    #[test]
    fn test_unbound_channel_is_unavailable() {
        let router = DispatchRouter::new();
        let err = router.dispatch(ChannelId::Face, "B").unwrap_err();
        assert!(matches!(err, DispatchError::ChannelUnavailable { .. }));
        assert!(!router.is_open(ChannelId::Face));
    }

    #[test]
    fn test_is_open_reflects_transport() {
        let (router, motor, _) = router();
        assert!(router.is_open(ChannelId::Motor));
        motor.close();
        assert!(!router.is_open(ChannelId::Motor));
        assert!(!router.is_open(ChannelId::Control));
        assert!(router.is_open(ChannelId::Face));
    }

    #[test]
    fn test_dispatch_is_not_debounced() {
        let (router, motor, _) = router();
        router.dispatch(ChannelId::Motor, "3").unwrap();
        router.dispatch(ChannelId::Motor, "3").unwrap();
        assert_eq!(motor.written(), vec!["3", "3"]);
    }
}
