//! Landmark frame type

use face_geometry::FaceLandmarks;

/// One captured frame after landmark extraction
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    /// Frame sequence number
    pub sequence: u64,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Faces found by the landmark model, most confident first
    pub faces: Vec<FaceLandmarks>,
}

impl LandmarkFrame {
    /// Create a new landmark frame
    pub fn new(sequence: u64, width: u32, height: u32, faces: Vec<FaceLandmarks>) -> Self {
        Self {
            sequence,
            timestamp_ns: 0,
            width,
            height,
            faces,
        }
    }

    /// The tracked subject; only the first face is monitored
    pub fn primary_face(&self) -> Option<&FaceLandmarks> {
        self.faces.first()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
