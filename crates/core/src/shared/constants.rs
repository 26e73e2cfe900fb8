use std::time::Duration;

/// Continuous dwell inside the selection region required before locking.
pub const LOCK_DURATION: Duration = Duration::from_secs(3);

/// Period of the face controller's blink/alive signal.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Detector confidence below this is ignored.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Size of the centred dwell region for automatic locking.
pub const SELECTION_WIDTH: i32 = 150;
pub const SELECTION_HEIGHT: i32 = 200;

/// Minimum overlap for the IoU tracker to keep following a face.
pub const TRACKER_MIN_IOU: f64 = 0.3;

/// Number of equal horizontal zones the frame is divided into.
pub const ZONE_COUNT: u32 = 5;
