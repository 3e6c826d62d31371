//! Geometry Error Types

use thiserror::Error;

use crate::FacePoint;

/// Errors while deriving ratios from a landmark set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Zero-width or non-finite landmarks
    #[error("Degenerate {feature} geometry: {reason}")]
    Degenerate {
        feature: &'static str,
        reason: &'static str,
    },

    /// The landmark source could not answer for a required point
    #[error("Landmark missing: {0:?}")]
    MissingPoint(FacePoint),
}
