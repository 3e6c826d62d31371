//! Per-frame overlay
//!
//! The overlay is derived entirely from the analysis: status color, face box,
//! and five text lines. It is rendered as log records.

use dms::{DmsAnalysis, DriverStatus};
use face_geometry::BoundingBox;
use tracing::{debug, info, warn};

/// Margin around the landmark extent when drawing the face box (pixels)
pub const FACE_BOX_MARGIN: f64 = 20.0;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Display color for a status
pub fn status_color(status: DriverStatus) -> Rgb {
    match status {
        DriverStatus::Normal => Rgb(0, 255, 0),
        DriverStatus::Drowsy => Rgb(255, 0, 0),
        DriverStatus::Yawning => Rgb(255, 255, 0),
    }
}

/// What gets drawn over one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub status: DriverStatus,
    pub color: Rgb,
    pub face_box: Option<BoundingBox>,
    pub ear: f64,
    pub mar: f64,
    pub blink_count: u32,
    pub yawn_count: u32,
}

impl Overlay {
    /// Build the overlay for a measured frame; neutral frames have none
    pub fn from_analysis(analysis: &DmsAnalysis) -> Option<Self> {
        let sample = analysis.sample?;
        Some(Self {
            status: analysis.status,
            color: status_color(analysis.status),
            face_box: analysis.face_bbox.map(|b| b.expand(FACE_BOX_MARGIN)),
            ear: sample.ear,
            mar: sample.mar,
            blink_count: analysis.blink_count,
            yawn_count: analysis.yawn_count,
        })
    }

    pub fn lines(&self) -> [String; 5] {
        [
            format!("Status: {}", self.status),
            format!("EAR: {:.2}", self.ear),
            format!("MAR: {:.2}", self.mar),
            format!("Blinks: {}", self.blink_count),
            format!("Yawns: {}", self.yawn_count),
        ]
    }
}

/// Keeps the last drawn overlay so neutral frames show the previous status
#[derive(Debug, Default)]
pub struct Display {
    current: Option<Overlay>,
}

impl Display {
    /// Update from a frame's analysis and return what is on screen now
    pub fn render(&mut self, analysis: &DmsAnalysis) -> Option<&Overlay> {
        if let Some(overlay) = Overlay::from_analysis(analysis) {
            let previous = self.current.as_ref().map(|o| o.status);
            debug!(status = %overlay.status, "{}", overlay.lines().join(" | "));

            if previous != Some(overlay.status) {
                let [status, ear, mar, blinks, yawns] = overlay.lines();
                match overlay.status {
                    DriverStatus::Normal => info!("{status} ({ear}, {mar}, {blinks}, {yawns})"),
                    _ => warn!("{status} ({ear}, {mar}, {blinks}, {yawns})"),
                }
            }
            self.current = Some(overlay);
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Overlay> {
        self.current.as_ref()
    }
}
