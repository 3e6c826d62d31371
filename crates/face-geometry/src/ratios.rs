//! Eye and mouth aspect ratios

use serde::{Deserialize, Serialize};

use crate::{FacePoint, GeometryError, LandmarkSource, Point2, Side};

/// Eye Aspect Ratio: (‖p1−p5‖ + ‖p2−p4‖) / (2·‖p0−p3‖)
///
/// Points are in [`FacePoint::eye`] order. Fails on zero eye width.
pub fn eye_aspect_ratio(points: &[Point2; 6]) -> Result<f64, GeometryError> {
    check_finite("eye", points)?;

    let vertical_outer = points[1].distance(&points[5]);
    let vertical_inner = points[2].distance(&points[4]);
    let horizontal = points[0].distance(&points[3]);

    ratio("eye", vertical_outer + vertical_inner, 2.0 * horizontal)
}

/// Mouth Aspect Ratio: vertical lip gap over mouth width
///
/// Points are in [`FacePoint::MOUTH`] order. Fails on zero mouth width.
pub fn mouth_aspect_ratio(points: &[Point2; 4]) -> Result<f64, GeometryError> {
    check_finite("mouth", points)?;

    let vertical = points[0].distance(&points[1]);
    let horizontal = points[2].distance(&points[3]);

    ratio("mouth", vertical, horizontal)
}

fn check_finite(feature: &'static str, points: &[Point2]) -> Result<(), GeometryError> {
    if points.iter().all(Point2::is_finite) {
        Ok(())
    } else {
        Err(GeometryError::Degenerate {
            feature,
            reason: "non-finite landmark coordinate",
        })
    }
}

fn ratio(feature: &'static str, numerator: f64, denominator: f64) -> Result<f64, GeometryError> {
    if denominator == 0.0 {
        return Err(GeometryError::Degenerate {
            feature,
            reason: "zero horizontal distance",
        });
    }

    let value = numerator / denominator;
    if !value.is_finite() {
        return Err(GeometryError::Degenerate {
            feature,
            reason: "non-finite ratio",
        });
    }
    Ok(value)
}

fn gather<L: LandmarkSource + ?Sized, const N: usize>(
    source: &L,
    names: [FacePoint; N],
) -> Result<[Point2; N], GeometryError> {
    let mut points = [Point2::default(); N];
    for (slot, name) in points.iter_mut().zip(names) {
        *slot = source.point(name).ok_or(GeometryError::MissingPoint(name))?;
    }
    Ok(points)
}

/// One frame's pair of geometric signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioSample {
    /// Mean of left and right EAR
    pub ear: f64,
    pub mar: f64,
}

impl RatioSample {
    pub const fn new(ear: f64, mar: f64) -> Self {
        Self { ear, mar }
    }

    /// Extract both ratios from a landmark source
    pub fn from_landmarks<L: LandmarkSource + ?Sized>(source: &L) -> Result<Self, GeometryError> {
        let left = eye_aspect_ratio(&gather(source, FacePoint::eye(Side::Left))?)?;
        let right = eye_aspect_ratio(&gather(source, FacePoint::eye(Side::Right))?)?;
        let mar = mouth_aspect_ratio(&gather(source, FacePoint::MOUTH)?)?;

        Ok(Self {
            ear: (left + right) / 2.0,
            mar,
        })
    }
}
