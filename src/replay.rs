//! Recorded landmark sessions for offline replay.
//!
//! A recording is a YAML document holding the canvas size and one entry per
//! frame. Frames without a face carry `landmarks: null`.

use crate::{
    geometry::CanvasSize,
    landmarks::Landmark,
    session::{FrameOutcome, FramingSession},
    Error, Result,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// One recorded detector frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,

    /// First detected face, if any
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl RecordedFrame {
    #[must_use]
    pub const fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }
}

/// A sequence of detector frames on a fixed canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub canvas: CanvasSize,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid recording
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let recording = Self::from_yaml(&content)?;
        info!(
            "Loaded recording {} with {} frames",
            path.as_ref().display(),
            recording.frames.len()
        );
        Ok(recording)
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordingError` on malformed YAML, an invalid canvas,
    /// or timestamps that go backwards
    pub fn from_yaml(content: &str) -> Result<Self> {
        let recording: Self =
            serde_yaml::from_str(content).map_err(|e| Error::RecordingError(format!("Failed to parse recording: {e}")))?;
        recording.validate()?;
        Ok(recording)
    }

    /// Save the recording as YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yaml::to_string(self).map_err(|e| Error::RecordingError(format!("Failed to serialize recording: {e}")))?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Check canvas and timestamp ordering
    ///
    /// # Errors
    ///
    /// Returns `Error::RecordingError` describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if !self.canvas.is_valid() {
            return Err(Error::RecordingError(format!(
                "Invalid canvas {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }

        for (i, pair) in self.frames.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(Error::RecordingError(format!(
                    "Frame {} timestamp {} ms precedes previous frame at {} ms",
                    i + 1,
                    pair[1].timestamp_ms,
                    pair[0].timestamp_ms
                )));
            }
        }
        Ok(())
    }

    /// Feed every frame through a session in order
    pub fn replay<'a>(&'a self, session: &'a mut FramingSession) -> impl Iterator<Item = (&'a RecordedFrame, FrameOutcome)> + 'a {
        let canvas = self.canvas;
        self.frames.iter().map(move |frame| {
            let outcome = session.process_frame(frame.landmarks.as_deref(), canvas, frame.timestamp());
            (frame, outcome)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r"
canvas:
  width: 640
  height: 480
frames:
  - timestamp_ms: 0
    landmarks: null
  - timestamp_ms: 33
    landmarks:
      - {x: 0.4, y: 0.5, z: 0.0}
      - {x: 0.6, y: 0.5}
  - timestamp_ms: 66
";

    #[test]
    fn test_parse_recording() {
        let recording = Recording::from_yaml(RECORDING).unwrap();
        assert_eq!(recording.canvas, CanvasSize::new(640.0, 480.0));
        assert_eq!(recording.frames.len(), 3);
        assert!(recording.frames[0].landmarks.is_none());
        assert!(recording.frames[2].landmarks.is_none());

        let landmarks = recording.frames[1].landmarks.as_ref().unwrap();
        assert_eq!(landmarks[1], Landmark::new(0.6, 0.5, 0.0));
        assert_eq!(recording.frames[1].timestamp(), Duration::from_millis(33));
    }

    #[test]
    fn test_reject_backwards_timestamps() {
        let yaml = r"
canvas: {width: 640, height: 480}
frames:
  - {timestamp_ms: 100}
  - {timestamp_ms: 50}
";
        assert!(matches!(Recording::from_yaml(yaml), Err(Error::RecordingError(_))));
    }

    #[test]
    fn test_reject_invalid_canvas() {
        let yaml = "canvas: {width: 0, height: 480}\nframes: []\n";
        assert!(Recording::from_yaml(yaml).is_err());
        assert!(Recording::from_yaml("not: [valid").is_err());
    }
}
