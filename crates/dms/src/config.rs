//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR below this counts as eyes closed
    pub ear_threshold: f64,

    /// MAR above this counts as mouth open
    pub mar_threshold: f64,

    /// Consecutive closed-eye frames that make a blink
    pub blink_frames: u32,

    /// Consecutive closed-eye frames before declaring drowsiness
    pub consec_frames: u32,

    /// Consecutive open-eye, non-yawning frames before falling back to normal
    pub reset_frames: u32,

    /// Consecutive open-mouth frames before declaring a yawn
    pub yawn_frames: u32,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.22,
            mar_threshold: 0.65,
            blink_frames: 3,
            consec_frames: 30,
            reset_frames: 25,
            yawn_frames: 15,
        }
    }
}

impl DmsConfig {
    /// Create strict config (reacts sooner, clears later)
    pub fn strict() -> Self {
        Self {
            consec_frames: 20,
            yawn_frames: 10,
            reset_frames: 35,
            ..Default::default()
        }
    }

    /// Create lenient config (reacts later, clears sooner)
    pub fn lenient() -> Self {
        Self {
            consec_frames: 45,
            yawn_frames: 20,
            reset_frames: 15,
            ..Default::default()
        }
    }

    /// Reject thresholds the state machine cannot work with
    pub fn validate(&self) -> Result<(), DmsError> {
        for (name, value) in [
            ("ear_threshold", self.ear_threshold),
            ("mar_threshold", self.mar_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DmsError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("blink_frames", self.blink_frames),
            ("consec_frames", self.consec_frames),
            ("reset_frames", self.reset_frames),
            ("yawn_frames", self.yawn_frames),
        ] {
            if value == 0 {
                return Err(DmsError::Config(format!("{name} must be at least 1")));
            }
        }

        Ok(())
    }
}
