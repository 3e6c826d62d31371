//! Alerting System
//!
//! Plays the alert sound for yawn and drowsiness transitions, at most one
//! playback at a time. Alerts are best-effort: a failing sink never stops
//! the monitoring session.

mod gate;
mod sink;

pub use gate::{AlertConfig, AlertEvent, AlertGate, AlertStats};
pub use sink::{AudioSink, BellSink, PlayerSink, SilentSink};

use thiserror::Error;

/// Alert playback errors
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Audio output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("Audio device unavailable: {0}")]
    Unavailable(String),
}
