use std::fmt;

/// Phase of a tracking session. Sessions start in `Searching` and never
/// terminate on their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LockState {
    #[default]
    Searching,
    Locking,
    Locked,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockState::Searching => write!(f, "SEARCHING"),
            LockState::Locking => write!(f, "LOCKING"),
            LockState::Locked => write!(f, "LOCKED"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionReason {
    EnteredRegion,
    LeftRegion,
    DwellComplete,
    ManualSelect,
    DetectionUnavailable,
    TrackerLost,
    Deselect,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: LockState,
    pub to: LockState,
    pub reason: TransitionReason,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({:?})", self.from, self.to, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_searching() {
        assert_eq!(LockState::default(), LockState::Searching);
    }

    #[test]
    fn test_transition_display() {
        let t = Transition {
            from: LockState::Locked,
            to: LockState::Searching,
            reason: TransitionReason::TrackerLost,
        };
        assert_eq!(t.to_string(), "LOCKED -> SEARCHING (TrackerLost)");
    }
}
