//! Alert Gate Implementation

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::sink::{AudioSink, BellSink, PlayerSink, SilentSink};

/// Alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Play sound; when off, alerts are only logged
    pub enabled: bool,
    /// Alert sound file; without one the terminal bell is used
    pub sound_path: Option<PathBuf>,
    /// Player program the sound file is handed to
    pub player: String,
    /// Arguments placed before the sound file
    pub player_args: Vec<String>,
    /// How long one bell alert keeps the output busy (milliseconds)
    pub clip_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound_path: None,
            player: "aplay".to_string(),
            player_args: vec!["-q".to_string()],
            clip_ms: 2000,
        }
    }
}

/// Outcome of one alert request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    /// Playback started
    Played,
    /// Dropped because an alert is still playing
    Suppressed,
    /// The sink failed; the session carries on
    Failed,
}

impl AlertEvent {
    pub fn fired(&self) -> bool {
        matches!(self, AlertEvent::Played)
    }
}

/// Alert counters for the session summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertStats {
    pub played: u64,
    pub suppressed: u64,
    pub failed: u64,
}

/// Plays alerts, at most one at a time
///
/// Requests arriving while the sink is busy are dropped, not queued.
pub struct AlertGate<S: AudioSink> {
    sink: S,
    stats: AlertStats,
}

impl<S: AudioSink> AlertGate<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            stats: AlertStats::default(),
        }
    }

    /// Request playback of the alert sound
    pub fn fire_alert(&mut self, reason: &str) -> AlertEvent {
        if self.sink.is_playing() {
            self.stats.suppressed += 1;
            debug!("Alert suppressed: {} (already playing)", reason);
            return AlertEvent::Suppressed;
        }

        match self.sink.play() {
            Ok(()) => {
                self.stats.played += 1;
                info!("Alert played: {} (count: {})", reason, self.stats.played);
                AlertEvent::Played
            }
            Err(e) => {
                self.stats.failed += 1;
                warn!("Alert playback failed for {}: {}", reason, e);
                AlertEvent::Failed
            }
        }
    }

    pub fn stats(&self) -> AlertStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl AlertGate<Box<dyn AudioSink>> {
    /// Build a gate over the sink the configuration asks for.
    ///
    /// A sound file that cannot be used falls back to the terminal bell.
    pub fn from_config(config: &AlertConfig) -> Self {
        info!("Creating alert gate with config: {:?}", config);
        if !config.enabled {
            return Self::new(Box::new(SilentSink));
        }

        let bell = || -> Box<dyn AudioSink> {
            Box::new(BellSink::new(Duration::from_millis(config.clip_ms)))
        };
        let sink: Box<dyn AudioSink> = match &config.sound_path {
            Some(path) => {
                match PlayerSink::new(&config.player, config.player_args.clone(), path) {
                    Ok(player) => Box::new(player),
                    Err(e) => {
                        warn!("{}, falling back to terminal bell", e);
                        bell()
                    }
                }
            }
            None => bell(),
        };
        Self::new(sink)
    }
}
