use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::bounding_box::{Candidate, Point};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// A recorded session: frame geometry plus, per frame, what the detector
/// saw and any user input that arrived with it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<ScenarioFrame>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScenarioFrame {
    /// Capture time in milliseconds from the start of the recording.
    pub t_ms: u64,
    #[serde(default)]
    pub faces: Vec<Candidate>,
    #[serde(default)]
    pub click: Option<Point>,
    #[serde(default)]
    pub deselect: bool,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScenarioError::Invalid(format!(
                "frame size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(i) = self
            .frames
            .windows(2)
            .position(|w| w[1].t_ms < w[0].t_ms)
        {
            return Err(ScenarioError::Invalid(format!(
                "timestamps must not decrease (frame {})",
                i + 1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parses_minimal_frames_with_defaults() {
        let s = Scenario::from_json(r#"{"width": 500, "height": 400, "frames": [{"t_ms": 0}]}"#)
            .unwrap();
        assert_eq!(s.frames.len(), 1);
        assert!(s.frames[0].faces.is_empty());
        assert!(s.frames[0].click.is_none());
        assert!(!s.frames[0].deselect);
    }

    #[test]
    fn test_parses_click_and_deselect() {
        let s = Scenario::from_json(
            r#"{"width": 500, "height": 400, "frames": [
                {"t_ms": 0, "click": {"x": 10, "y": 20}},
                {"t_ms": 10, "deselect": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(s.frames[0].click, Some(Point::new(10, 20)));
        assert!(s.frames[1].deselect);
    }

    #[test]
    fn test_rejects_zero_size() {
        let err = Scenario::from_json(r#"{"width": 0, "height": 400, "frames": []}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::Invalid(_)));
    }

    #[test]
    fn test_rejects_decreasing_timestamps() {
        let err = Scenario::from_json(
            r#"{"width": 10, "height": 10, "frames": [{"t_ms": 5}, {"t_ms": 4}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("frame 1"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Scenario::from_json("{not json").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"width": 20, "height": 10, "frames": [{{"t_ms": 0}}]}}"#).unwrap();
        let s = Scenario::load(file.path()).unwrap();
        assert_eq!((s.width, s.height), (20, 10));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Scenario::load(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, ScenarioError::Read { .. }));
    }
}
