use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use facelock_core::pipeline::follow_me_config::{FollowMeConfig, SelectionMode};

/// Persisted defaults for the `facelock` binary. Command-line flags take
/// precedence over every value here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub selection_mode: SelectionMode,
    pub confidence: f64,
    pub lock_duration_ms: u64,
    pub heartbeat_interval_ms: u64,
    pub selection_width: i32,
    pub selection_height: i32,
    pub motor_device: Option<PathBuf>,
    pub face_device: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let config = FollowMeConfig::default();
        Self {
            selection_mode: config.selection_mode,
            confidence: config.confidence_threshold,
            lock_duration_ms: config.lock_duration.as_millis() as u64,
            heartbeat_interval_ms: config.heartbeat_interval.as_millis() as u64,
            selection_width: config.selection_width,
            selection_height: config.selection_height,
            motor_device: None,
            face_device: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("facelock").join("settings.json"))
    }

    /// Loads from `path`, or the per-user config file when `None`. Missing
    /// or unreadable files yield defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };
        path.map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn to_config(&self) -> FollowMeConfig {
        FollowMeConfig {
            lock_duration: Duration::from_millis(self.lock_duration_ms),
            confidence_threshold: self.confidence,
            selection_width: self.selection_width,
            selection_height: self.selection_height,
            heartbeat_interval: Duration::from_millis(self.heartbeat_interval_ms),
            selection_mode: self.selection_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_core_config() {
        assert_eq!(Settings::default().to_config(), FollowMeConfig::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.json")));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_json_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"selection_mode": "manual", "motor_device": "/dev/ttyACM0"}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.selection_mode, SelectionMode::Manual);
        assert_eq!(settings.motor_device, Some(PathBuf::from("/dev/ttyACM0")));
        assert_eq!(settings.lock_duration_ms, 3000);
        assert!(settings.face_device.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            confidence: 0.6,
            face_device: Some(PathBuf::from("/dev/ttyUSB1")),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_to_config_converts_durations() {
        let settings = Settings {
            lock_duration_ms: 1500,
            heartbeat_interval_ms: 250,
            ..Settings::default()
        };
        let config = settings.to_config();
        assert_eq!(config.lock_duration, Duration::from_millis(1500));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(250));
    }
}
