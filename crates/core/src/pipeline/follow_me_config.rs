use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_tracker::TrackerFactory;
use crate::selection::domain::selection_policy::SelectionPolicy;
use crate::selection::domain::selection_region::SelectionRegion;
use crate::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, HEARTBEAT_INTERVAL, LOCK_DURATION, SELECTION_HEIGHT,
    SELECTION_WIDTH,
};
use crate::tracking::domain::track_session::TrackSession;

/// How the follow-me loop picks its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Lock onto a face that stays in the selection region.
    #[default]
    Auto,
    /// Lock onto the face the user clicks.
    Manual,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown selection mode '{other}' (expected auto or manual)")),
        }
    }
}

/// Tunables for one follow-me session.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowMeConfig {
    pub lock_duration: Duration,
    pub confidence_threshold: f64,
    pub selection_width: i32,
    pub selection_height: i32,
    pub heartbeat_interval: Duration,
    pub selection_mode: SelectionMode,
}

impl Default for FollowMeConfig {
    fn default() -> Self {
        Self {
            lock_duration: LOCK_DURATION,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            selection_width: SELECTION_WIDTH,
            selection_height: SELECTION_HEIGHT,
            heartbeat_interval: HEARTBEAT_INTERVAL,
            selection_mode: SelectionMode::Auto,
        }
    }
}

impl FollowMeConfig {
    pub fn policy(&self) -> SelectionPolicy {
        match self.selection_mode {
            SelectionMode::Auto => SelectionPolicy::auto_dwell(self.lock_duration),
            SelectionMode::Manual => SelectionPolicy::manual(),
        }
    }

    pub fn region_for(&self, frame_width: u32, frame_height: u32) -> SelectionRegion {
        SelectionRegion::centered(
            frame_width,
            frame_height,
            self.selection_width,
            self.selection_height,
        )
    }

    /// Builds a fresh session in `Searching` for frames of the given size.
    pub fn build_session(
        &self,
        frame_width: u32,
        frame_height: u32,
        tracker_factory: Box<dyn TrackerFactory>,
    ) -> TrackSession {
        TrackSession::new(
            self.policy(),
            self.region_for(frame_width, frame_height),
            self.confidence_threshold,
            tracker_factory,
        )
    }
}
