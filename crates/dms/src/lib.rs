//! Driver Monitoring System (DMS)
//!
//! Real-time driver state analysis from facial landmarks:
//! - Blink counting
//! - Yawn detection with a once-per-episode latch
//! - Drowsiness detection from sustained eye closure
//!
//! All transitions are debounced over consecutive frames.

pub mod analysis;
pub mod config;
pub mod detector;
pub mod state;

pub use analysis::{DmsAlert, DmsAnalysis, NeutralTick};
pub use config::DmsConfig;
pub use detector::{DrowsinessDetector, TickSignals};
pub use state::{DetectorState, DriverStatus};

use face_geometry::{BoundingBox, GeometryError, LandmarkSource, RatioSample};
use thiserror::Error;
use tracing::{debug, warn};

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Landmark geometry unusable: {0}")]
    Geometry(#[from] GeometryError),
}

/// Driver monitoring module
///
/// Owns the [`DetectorState`] for one session and runs the state machine once
/// per frame that yields usable landmarks.
pub struct DmsModule {
    detector: DrowsinessDetector,
    state: DetectorState,
    ticks: u64,
    neutral_ticks: u64,
}

impl DmsModule {
    /// Create a new DMS module with configuration
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            detector: DrowsinessDetector::new(config),
            state: DetectorState::default(),
            ticks: 0,
            neutral_ticks: 0,
        })
    }

    /// Compute the frame's ratios from a landmark source
    pub fn measure(face: &dyn LandmarkSource) -> Result<RatioSample, DmsError> {
        Ok(RatioSample::from_landmarks(face)?)
    }

    /// Analyze one frame. `None` means no face was found.
    ///
    /// Frames without a face, or with unusable geometry, leave every counter
    /// untouched and report the current status.
    pub fn process(&mut self, face: Option<&dyn LandmarkSource>) -> DmsAnalysis {
        self.ticks += 1;

        let Some(face) = face else {
            self.neutral_ticks += 1;
            debug!(tick = self.ticks, "No face in frame");
            return self.neutral(NeutralTick::NoFace, None);
        };

        let face_bbox = face.bounding_box();
        match Self::measure(face) {
            Ok(sample) => {
                let mut analysis = self.apply(sample);
                analysis.face_bbox = face_bbox;
                analysis
            }
            Err(e) => {
                self.neutral_ticks += 1;
                warn!(tick = self.ticks, "Skipping frame: {}", e);
                self.neutral(NeutralTick::DegenerateGeometry, face_bbox)
            }
        }
    }

    /// Feed a precomputed sample straight into the state machine
    pub fn process_sample(&mut self, sample: RatioSample) -> DmsAnalysis {
        self.ticks += 1;
        self.apply(sample)
    }

    fn apply(&mut self, sample: RatioSample) -> DmsAnalysis {
        let signals = self.detector.update(&mut self.state, sample);
        debug!(
            tick = self.ticks,
            ear = sample.ear,
            mar = sample.mar,
            status = %self.state.status,
            "Frame analyzed"
        );

        DmsAnalysis {
            face_detected: true,
            face_bbox: None,
            sample: Some(sample),
            neutral: None,
            status: self.state.status,
            blink_count: self.state.blink_count,
            yawn_count: self.state.yawn_count,
            signals,
            alerts: signals.alerts(),
        }
    }

    fn neutral(&self, reason: NeutralTick, face_bbox: Option<BoundingBox>) -> DmsAnalysis {
        DmsAnalysis {
            face_detected: reason != NeutralTick::NoFace,
            face_bbox,
            sample: None,
            neutral: Some(reason),
            status: self.state.status,
            blink_count: self.state.blink_count,
            yawn_count: self.state.yawn_count,
            signals: TickSignals::default(),
            alerts: Vec::new(),
        }
    }

    pub fn config(&self) -> &DmsConfig {
        self.detector.config()
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Frames processed, including neutral ones
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames that left the state untouched
    pub fn neutral_ticks(&self) -> u64 {
        self.neutral_ticks
    }
}
