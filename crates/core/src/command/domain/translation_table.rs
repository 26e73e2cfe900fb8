use std::collections::HashMap;

use crate::command::domain::channel::ChannelId;

/// Client-facing symbol → controller symbol mapping for one channel.
///
/// Total on its declared keys only: anything else is rejected, never
/// passed through untranslated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Direction keys are mirrored for the motor controller.
    pub fn motor() -> Self {
        Self::new([
            ("3", "3"),
            ("r", "b"),
            ("2", "4"),
            ("4", "2"),
            ("1", "5"),
            ("5", "1"),
        ])
    }

    pub fn face() -> Self {
        Self::new([("H", "H"), ("B", "B"), ("r", "e")])
    }

    pub fn control() -> Self {
        Self::new([("s", "s")])
    }

    pub fn for_channel(channel: ChannelId) -> Self {
        match channel {
            ChannelId::Motor => Self::motor(),
            ChannelId::Face => Self::face(),
            ChannelId::Control => Self::control(),
        }
    }

    pub fn translate(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    /// Accepted client symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
