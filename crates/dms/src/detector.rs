//! Blink, yawn, and drowsiness state machine
//!
//! Turns one (EAR, MAR) sample per frame into debounced driver status.
//! Every transition is gated by a consecutive-frame counter so landmark
//! jitter on a single frame never flips the status.

use face_geometry::RatioSample;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::DmsAlert;
use crate::{DetectorState, DmsConfig, DriverStatus};

/// Facts produced by one state machine tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSignals {
    /// A closed-eye run of at least `blink_frames` just ended
    pub blink_counted: bool,

    /// An open-mouth run reached `yawn_frames` and was not yet latched
    pub yawn_declared: bool,

    /// Closed-eye run is at or past `consec_frames`
    pub drowsy_reached: bool,

    /// Drowsy was reached from a non-Drowsy status this tick
    pub drowsy_entered: bool,

    /// Open-eye, non-yawning run is at or past `reset_frames`
    pub normal_reached: bool,
}

impl TickSignals {
    /// Status after this tick.
    ///
    /// Priority: Drowsy > Yawning > Normal > unchanged. A sustained eye
    /// closure wins over a yawn declared on the same frame, and the yawn
    /// latch only ever blocks the Normal path.
    pub fn resolve(&self, previous: DriverStatus) -> DriverStatus {
        if self.drowsy_reached {
            DriverStatus::Drowsy
        } else if self.yawn_declared {
            DriverStatus::Yawning
        } else if self.normal_reached {
            DriverStatus::Normal
        } else {
            previous
        }
    }

    /// Alerts requested this tick, yawn before drowsiness
    pub fn alerts(&self) -> Vec<DmsAlert> {
        let mut alerts = Vec::new();
        if self.yawn_declared {
            alerts.push(DmsAlert::Yawning);
        }
        if self.drowsy_entered {
            alerts.push(DmsAlert::Drowsiness);
        }
        alerts
    }
}

/// Debounce/hysteresis state machine over [`DetectorState`]
#[derive(Debug, Clone)]
pub struct DrowsinessDetector {
    config: DmsConfig,
}

impl DrowsinessDetector {
    pub fn new(config: DmsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    /// Advance the state machine by one measured frame
    pub fn update(&self, state: &mut DetectorState, sample: RatioSample) -> TickSignals {
        let config = &self.config;
        let eyes_closed = sample.ear < config.ear_threshold;
        let mouth_open = sample.mar > config.mar_threshold;
        let mut signals = TickSignals::default();

        // Blinks are counted when the eyes reopen
        if eyes_closed {
            state.eye_closed_frames = state.eye_closed_frames.saturating_add(1);
        } else {
            if state.eye_closed_frames >= config.blink_frames {
                state.blink_count = state.blink_count.saturating_add(1);
                signals.blink_counted = true;
            }
            state.eye_closed_frames = 0;
        }

        // Yawns are counted once per open-mouth episode
        if mouth_open {
            state.mouth_open_frames = state.mouth_open_frames.saturating_add(1);
            if state.mouth_open_frames >= config.yawn_frames && !state.is_yawning {
                state.yawn_count = state.yawn_count.saturating_add(1);
                state.is_yawning = true;
                signals.yawn_declared = true;
            }
        } else {
            state.mouth_open_frames = 0;
            state.is_yawning = false;
        }

        let status_after_yawn = if signals.yawn_declared {
            DriverStatus::Yawning
        } else {
            state.status
        };

        if eyes_closed {
            state.drowsy_frame_counter = state.drowsy_frame_counter.saturating_add(1);
            state.normal_reset_frame_counter = 0;
            if state.drowsy_frame_counter >= config.consec_frames {
                signals.drowsy_reached = true;
                signals.drowsy_entered = status_after_yawn != DriverStatus::Drowsy;
            }
        } else if !state.is_yawning {
            state.drowsy_frame_counter = 0;
            state.normal_reset_frame_counter = state.normal_reset_frame_counter.saturating_add(1);
            signals.normal_reached = state.normal_reset_frame_counter >= config.reset_frames;
        }

        let previous = state.status;
        state.status = signals.resolve(previous);

        if signals.blink_counted {
            debug!(blinks = state.blink_count, "Blink counted");
        }
        if signals.yawn_declared {
            warn!(yawns = state.yawn_count, mar = sample.mar, "Yawn detected");
        }
        if signals.drowsy_entered {
            warn!(
                closed_frames = state.drowsy_frame_counter,
                ear = sample.ear,
                "Drowsiness detected"
            );
        }
        if state.status != previous {
            info!("Driver status: {} -> {}", previous, state.status);
        }

        signals
    }
}

impl Default for DrowsinessDetector {
    fn default() -> Self {
        Self::new(DmsConfig::default())
    }
}
