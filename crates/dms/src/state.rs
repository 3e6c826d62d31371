//! Driver state tracking

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioral classification of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DriverStatus {
    #[default]
    Normal,
    Drowsy,
    Yawning,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Normal => "Normal",
            DriverStatus::Drowsy => "Drowsy",
            DriverStatus::Yawning => "Yawning",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detector state carried across ticks
///
/// Created once per session and mutated once per measured frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorState {
    /// Current classification
    pub status: DriverStatus,

    /// Consecutive frames with EAR below threshold (blink accounting)
    pub eye_closed_frames: u32,

    /// Consecutive frames with MAR above threshold
    pub mouth_open_frames: u32,

    /// Consecutive closed-eye frames gating the Drowsy transition
    pub drowsy_frame_counter: u32,

    /// Consecutive open-eye, non-yawning frames gating the Normal transition
    pub normal_reset_frame_counter: u32,

    /// Session blink total
    pub blink_count: u32,

    /// Session yawn total
    pub yawn_count: u32,

    /// Latched while one open-mouth episode has already been counted
    pub is_yawning: bool,
}
