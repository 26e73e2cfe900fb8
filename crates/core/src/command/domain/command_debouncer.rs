use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::command::domain::channel::{ChannelId, Command};
use crate::command::domain::dispatch_router::{Ack, DispatchError, DispatchRouter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent(Ack),
    /// Same as the channel's last sent command; nothing was written.
    Suppressed,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent(_))
    }
}

/// Suppresses repeats of a channel's last successfully sent command.
///
/// State is kept per channel, so a motor command never masks a control
/// command. Only successful dispatches update the state; a failed send is
/// attempted again the next time it is requested.
pub struct CommandDebouncer {
    router: Arc<DispatchRouter>,
    last_sent: Mutex<HashMap<ChannelId, String>>,
}

impl CommandDebouncer {
    pub fn new(router: Arc<DispatchRouter>) -> Self {
        Self {
            router,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    pub fn router(&self) -> &Arc<DispatchRouter> {
        &self.router
    }

    pub fn maybe_send(&self, channel: ChannelId, symbol: &str) -> Result<Delivery, DispatchError> {
        // Held across the dispatch so compare-and-send is atomic per debouncer.
        let mut last_sent = self.state();
        if last_sent.get(&channel).is_some_and(|last| last == symbol) {
            return Ok(Delivery::Suppressed);
        }
        let ack = self.router.dispatch(channel, symbol)?;
        last_sent.insert(channel, symbol.to_string());
        Ok(Delivery::Sent(ack))
    }

    pub fn send(&self, command: Command) -> Result<Delivery, DispatchError> {
        self.maybe_send(command.channel(), command.symbol())
    }

    pub fn last_sent(&self, channel: ChannelId) -> Option<String> {
        self.state().get(&channel).cloned()
    }

    /// Forgets every channel's last command so the next one is always sent.
    pub fn reset(&self) {
        self.state().clear();
    }

    fn state(&self) -> MutexGuard<'_, HashMap<ChannelId, String>> {
        self.last_sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
