use std::fmt;
use std::str::FromStr;

/// Logical command destination. Each channel is bound to one transport;
/// several channels may share a physical controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelId {
    Motor,
    Face,
    Control,
}

impl ChannelId {
    pub const ALL: [ChannelId; 3] = [ChannelId::Motor, ChannelId::Face, ChannelId::Control];

    pub fn name(&self) -> &'static str {
        match self {
            ChannelId::Motor => "motor",
            ChannelId::Face => "face",
            ChannelId::Control => "control",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "motor" => Ok(ChannelId::Motor),
            "face" => Ok(ChannelId::Face),
            "control" => Ok(ChannelId::Control),
            other => Err(format!(
                "unknown channel '{other}' (expected motor, face or control)"
            )),
        }
    }
}

/// Client-facing commands the system itself emits.
///
/// Symbols are the keys of the per-channel translation tables, not the
/// bytes that reach the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
    Reverse,
    /// Start/stop toggle; also sent when a face is lost or released.
    StartStop,
    Happy,
    /// Alive signal for the face controller.
    Blink,
    ErrorTone,
}

impl Command {
    /// Emitted when tracking stops for any reason.
    pub const STOP: Command = Command::StartStop;

    pub fn channel(&self) -> ChannelId {
        match self {
            Command::FarLeft
            | Command::Left
            | Command::Center
            | Command::Right
            | Command::FarRight
            | Command::Reverse => ChannelId::Motor,
            Command::StartStop => ChannelId::Control,
            Command::Happy | Command::Blink | Command::ErrorTone => ChannelId::Face,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Command::FarLeft => "1",
            Command::Left => "2",
            Command::Center => "3",
            Command::Right => "4",
            Command::FarRight => "5",
            Command::Reverse => "r",
            Command::StartStop => "s",
            Command::Happy => "H",
            Command::Blink => "B",
            Command::ErrorTone => "r",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel(), self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("motor", ChannelId::Motor)]
    #[case("FACE", ChannelId::Face)]
    #[case("Control", ChannelId::Control)]
    fn test_parse_channel(#[case] input: &str, #[case] expected: ChannelId) {
        assert_eq!(input.parse::<ChannelId>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_channel() {
        let err = "wheels".parse::<ChannelId>().unwrap_err();
        assert!(err.contains("wheels"));
    }

    #[test]
    fn test_stop_goes_to_control() {
        assert_eq!(Command::STOP.channel(), ChannelId::Control);
        assert_eq!(Command::STOP.symbol(), "s");
    }

    #[test]
    fn test_same_symbol_on_different_channels() {
        assert_eq!(Command::Reverse.symbol(), Command::ErrorTone.symbol());
        assert_ne!(Command::Reverse.channel(), Command::ErrorTone.channel());
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::Blink.to_string(), "face:B");
    }
}
