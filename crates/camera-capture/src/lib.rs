//! Camera Capture Library for the Driver Monitor
//!
//! Frames reach the monitor already passed through the external facial
//! landmark model, so a frame here is a set of landmark faces plus capture
//! metadata. Supports:
//! - JSON-lines replay from a file, or from stdin when a landmark model
//!   process pipes its output in
//! - In-memory scripted feeds for tests
//! - A reader thread that streams any source into the async loop

pub mod frame;
pub mod reader;
pub mod replay;
pub mod scripted;

pub use frame::LandmarkFrame;
pub use reader::{spawn_reader, FrameResult};
pub use replay::ReplayFeed;
pub use scripted::ScriptedFeed;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open frame source {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Frame source read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed frame on line {line}: {source}")]
    Decode {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("No frame source configured")]
    NotConfigured,
}

/// Anything that yields landmark frames in capture order
pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, CameraError>;
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, CameraError> {
        (**self).next_frame()
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// JSON-lines landmark file, or "-" for stdin
    pub replay_path: Option<PathBuf>,
    /// Frame pacing rate; 0 processes frames as fast as they arrive
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            replay_path: None,
            fps: 30,
        }
    }
}

impl CameraConfig {
    /// Time between frames, `None` when unpaced
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f64(1.0 / self.fps as f64))
    }

    /// Open the configured source
    pub fn open(&self) -> Result<Box<dyn FrameSource + Send>, CameraError> {
        match self.replay_path.as_deref() {
            None => Err(CameraError::NotConfigured),
            Some(path) if path.as_os_str() == "-" => Ok(Box::new(ReplayFeed::stdin())),
            Some(path) => Ok(Box::new(ReplayFeed::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let config = CameraConfig::default();
        assert_eq!(config.frame_interval(), Some(Duration::from_secs_f64(1.0 / 30.0)));

        let unpaced = CameraConfig {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(unpaced.frame_interval(), None);
    }

    #[test]
    fn test_open_requires_path() {
        assert!(matches!(
            CameraConfig::default().open(),
            Err(CameraError::NotConfigured)
        ));

        let missing = CameraConfig {
            replay_path: Some(PathBuf::from("/nonexistent/session.jsonl")),
            ..Default::default()
        };
        assert!(matches!(missing.open(), Err(CameraError::Open { .. })));
    }
}
