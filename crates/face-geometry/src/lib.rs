//! Face Geometry
//!
//! Landmark data model and the two geometric signals the driver monitor runs on:
//! - Eye Aspect Ratio (EAR), low when the eyes are closed
//! - Mouth Aspect Ratio (MAR), high when the mouth is open
//!
//! Landmark access goes through [`LandmarkSource`], so the ratio code never
//! sees a particular face-mesh index numbering.

mod error;
mod landmarks;
mod ratios;

pub use error::GeometryError;
pub use landmarks::{
    BoundingBox, FaceLandmarks, FacePoint, LandmarkSource, MeshLandmarks, NamedLandmarks,
    Point2, Side,
};
pub use ratios::{eye_aspect_ratio, mouth_aspect_ratio, RatioSample};
