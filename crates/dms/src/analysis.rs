//! DMS analysis results and alerts

use face_geometry::{BoundingBox, RatioSample};
use serde::{Deserialize, Serialize};

use crate::detector::TickSignals;
use crate::state::DriverStatus;

/// DMS alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmsAlert {
    /// Driver yawned (once per open-mouth episode)
    Yawning,

    /// Driver entered the drowsy state
    Drowsiness,
}

impl DmsAlert {
    pub fn as_str(&self) -> &'static str {
        match self {
            DmsAlert::Yawning => "yawning",
            DmsAlert::Drowsiness => "drowsiness",
        }
    }
}

/// Why a tick left the detector state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeutralTick {
    /// No face landmarks in the frame
    NoFace,

    /// Landmarks present but the ratios could not be computed
    DegenerateGeometry,
}

/// Complete DMS analysis result for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DmsAnalysis {
    /// Whether a face was detected
    pub face_detected: bool,

    /// Face bounding box (if detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_bbox: Option<BoundingBox>,

    /// EAR/MAR for this frame (absent on neutral ticks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<RatioSample>,

    /// Set when the state machine did not run this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutral: Option<NeutralTick>,

    /// Status after this frame
    pub status: DriverStatus,

    /// Session blink total
    pub blink_count: u32,

    /// Session yawn total
    pub yawn_count: u32,

    /// State machine facts (default on neutral ticks)
    pub signals: TickSignals,

    /// Alerts requested this frame, in delivery order
    pub alerts: Vec<DmsAlert>,
}
