//! In-memory frame feed

use std::collections::VecDeque;

use crate::{CameraError, FrameSource, LandmarkFrame};

/// Hands out a fixed list of frames, then ends or fails
#[derive(Debug, Default)]
pub struct ScriptedFeed {
    frames: VecDeque<LandmarkFrame>,
    failure: Option<String>,
}

impl ScriptedFeed {
    pub fn new(frames: impl IntoIterator<Item = LandmarkFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            failure: None,
        }
    }

    /// Fail with a stream error once the frames run out, like a camera unplug
    pub fn fail_when_drained(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn push(&mut self, frame: LandmarkFrame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ScriptedFeed {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, CameraError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => match &self.failure {
                Some(message) => Err(CameraError::Stream(message.clone())),
                None => Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_then_ends() {
        let mut feed = ScriptedFeed::new([LandmarkFrame::new(1, 640, 480, Vec::new())]);
        feed.push(LandmarkFrame::new(2, 640, 480, Vec::new()));
        assert_eq!(feed.remaining(), 2);

        assert_eq!(feed.next_frame().unwrap().unwrap().sequence, 1);
        assert_eq!(feed.next_frame().unwrap().unwrap().sequence, 2);
        assert!(feed.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_fail_when_drained() {
        let mut feed = ScriptedFeed::new(Vec::new()).fail_when_drained("camera unplugged");
        assert!(matches!(feed.next_frame(), Err(CameraError::Stream(m)) if m == "camera unplugged"));
    }
}
