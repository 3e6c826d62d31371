//! Landmark types and the named-point capability

use serde::{Deserialize, Serialize};

/// 2D point in frame-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Uniformly scale both coordinates
    pub fn scale(&self, k: f64) -> Point2 {
        Point2::new(self.x * k, self.y * k)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// Which side of the face (subject's left/right as the mesh labels it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Anatomical points consumed by the ratio extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacePoint {
    EyeOuterCorner(Side),
    EyeUpperOuter(Side),
    EyeUpperInner(Side),
    EyeInnerCorner(Side),
    EyeLowerInner(Side),
    EyeLowerOuter(Side),
    UpperLip,
    LowerLip,
    MouthLeftCorner,
    MouthRightCorner,
}

impl FacePoint {
    /// Mouth points in MAR order: top lip, bottom lip, left corner, right corner
    pub const MOUTH: [FacePoint; 4] = [
        FacePoint::UpperLip,
        FacePoint::LowerLip,
        FacePoint::MouthLeftCorner,
        FacePoint::MouthRightCorner,
    ];

    /// Every point a [`LandmarkSource`] must be able to answer
    pub const ALL: [FacePoint; 16] = [
        FacePoint::EyeOuterCorner(Side::Left),
        FacePoint::EyeUpperOuter(Side::Left),
        FacePoint::EyeUpperInner(Side::Left),
        FacePoint::EyeInnerCorner(Side::Left),
        FacePoint::EyeLowerInner(Side::Left),
        FacePoint::EyeLowerOuter(Side::Left),
        FacePoint::EyeOuterCorner(Side::Right),
        FacePoint::EyeUpperOuter(Side::Right),
        FacePoint::EyeUpperInner(Side::Right),
        FacePoint::EyeInnerCorner(Side::Right),
        FacePoint::EyeLowerInner(Side::Right),
        FacePoint::EyeLowerOuter(Side::Right),
        FacePoint::UpperLip,
        FacePoint::LowerLip,
        FacePoint::MouthLeftCorner,
        FacePoint::MouthRightCorner,
    ];

    /// Eye points in EAR order: outer corner, upper-outer lid, upper-inner lid,
    /// inner corner, lower-inner lid, lower-outer lid
    pub const fn eye(side: Side) -> [FacePoint; 6] {
        [
            FacePoint::EyeOuterCorner(side),
            FacePoint::EyeUpperOuter(side),
            FacePoint::EyeUpperInner(side),
            FacePoint::EyeInnerCorner(side),
            FacePoint::EyeLowerInner(side),
            FacePoint::EyeLowerOuter(side),
        ]
    }

    /// Index of this point in the 468/478-point face mesh
    pub const fn mesh_index(self) -> usize {
        match self {
            FacePoint::EyeOuterCorner(Side::Left) => 33,
            FacePoint::EyeUpperOuter(Side::Left) => 160,
            FacePoint::EyeUpperInner(Side::Left) => 158,
            FacePoint::EyeInnerCorner(Side::Left) => 133,
            FacePoint::EyeLowerInner(Side::Left) => 153,
            FacePoint::EyeLowerOuter(Side::Left) => 144,
            FacePoint::EyeOuterCorner(Side::Right) => 263,
            FacePoint::EyeUpperOuter(Side::Right) => 387,
            FacePoint::EyeUpperInner(Side::Right) => 385,
            FacePoint::EyeInnerCorner(Side::Right) => 362,
            FacePoint::EyeLowerInner(Side::Right) => 380,
            FacePoint::EyeLowerOuter(Side::Right) => 373,
            FacePoint::UpperLip => 13,
            FacePoint::LowerLip => 14,
            FacePoint::MouthLeftCorner => 78,
            FacePoint::MouthRightCorner => 308,
        }
    }
}

/// Axis-aligned box in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for no points
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }

    /// Grow the box by `margin` pixels on every side
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A landmark provider that can answer for named anatomical points
pub trait LandmarkSource {
    /// Pixel position of a named point, if the provider tracks it
    fn point(&self, name: FacePoint) -> Option<Point2>;

    /// Box around every landmark the provider exposes
    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(FacePoint::ALL.iter().filter_map(|&p| self.point(p)))
    }
}

/// Dense face-mesh output, indexed by the mesh numbering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshLandmarks {
    points: Vec<Point2>,
}

impl MeshLandmarks {
    /// Wrap points that are already in pixel coordinates
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Convert normalized `[0, 1]` model output to whole-pixel coordinates.
    ///
    /// Coordinates are truncated toward zero, so `0.999 * 640` lands on
    /// pixel 639.
    pub fn from_normalized(points: &[[f64; 2]], width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let points = points
            .iter()
            .map(|&[x, y]| Point2::new((x * w).trunc(), (y * h).trunc()))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }
}

impl LandmarkSource for MeshLandmarks {
    fn point(&self, name: FacePoint) -> Option<Point2> {
        self.points.get(name.mesh_index()).copied()
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.points.iter().copied())
    }
}

/// Only the 16 consumed points, stored by role (pixel coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLandmarks {
    /// EAR order, see [`FacePoint::eye`]
    pub left_eye: [Point2; 6],
    pub right_eye: [Point2; 6],
    /// MAR order, see [`FacePoint::MOUTH`]
    pub mouth: [Point2; 4],
}

impl LandmarkSource for NamedLandmarks {
    fn point(&self, name: FacePoint) -> Option<Point2> {
        let eye_slot = |side: Side| FacePoint::eye(side).iter().position(|&p| p == name);
        let found = match name {
            FacePoint::UpperLip => self.mouth[0],
            FacePoint::LowerLip => self.mouth[1],
            FacePoint::MouthLeftCorner => self.mouth[2],
            FacePoint::MouthRightCorner => self.mouth[3],
            FacePoint::EyeOuterCorner(side)
            | FacePoint::EyeUpperOuter(side)
            | FacePoint::EyeUpperInner(side)
            | FacePoint::EyeInnerCorner(side)
            | FacePoint::EyeLowerInner(side)
            | FacePoint::EyeLowerOuter(side) => {
                let slot = eye_slot(side)?;
                match side {
                    Side::Left => self.left_eye[slot],
                    Side::Right => self.right_eye[slot],
                }
            }
        };
        Some(found)
    }
}

/// Either landmark shape a frame source can deliver
#[derive(Debug, Clone, PartialEq)]
pub enum FaceLandmarks {
    Mesh(MeshLandmarks),
    Named(NamedLandmarks),
}

impl LandmarkSource for FaceLandmarks {
    fn point(&self, name: FacePoint) -> Option<Point2> {
        match self {
            FaceLandmarks::Mesh(mesh) => mesh.point(name),
            FaceLandmarks::Named(named) => named.point(name),
        }
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            FaceLandmarks::Mesh(mesh) => mesh.bounding_box(),
            FaceLandmarks::Named(named) => named.bounding_box(),
        }
    }
}

impl From<MeshLandmarks> for FaceLandmarks {
    fn from(mesh: MeshLandmarks) -> Self {
        FaceLandmarks::Mesh(mesh)
    }
}

impl From<NamedLandmarks> for FaceLandmarks {
    fn from(named: NamedLandmarks) -> Self {
        FaceLandmarks::Named(named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_normalized_truncates() {
        let mesh = MeshLandmarks::from_normalized(&[[0.5, 0.25], [0.999, 0.0]], 640, 480);
        assert_eq!(mesh.points()[0], Point2::new(320.0, 120.0));
        assert_eq!(mesh.points()[1], Point2::new(639.0, 0.0));
    }

    #[test]
    fn test_mesh_lookup_uses_layout() {
        let mut points = vec![Point2::default(); 400];
        points[33] = Point2::new(1.0, 2.0);
        points[308] = Point2::new(3.0, 4.0);
        let mesh = MeshLandmarks::new(points);

        assert_eq!(mesh.point(FacePoint::EyeOuterCorner(Side::Left)), Some(Point2::new(1.0, 2.0)));
        assert_eq!(mesh.point(FacePoint::MouthRightCorner), Some(Point2::new(3.0, 4.0)));
    }

    #[test]
    fn test_short_mesh_misses_points() {
        let mesh = MeshLandmarks::new(vec![Point2::default(); 100]);
        assert!(mesh.point(FacePoint::UpperLip).is_some());
        assert!(mesh.point(FacePoint::MouthRightCorner).is_none());
    }

    #[test]
    fn test_named_lookup_follows_ear_order() {
        let eye = |base: f64| std::array::from_fn(|i| Point2::new(base + i as f64, 0.0));
        let named = NamedLandmarks {
            left_eye: eye(0.0),
            right_eye: eye(100.0),
            mouth: std::array::from_fn(|i| Point2::new(200.0 + i as f64, 0.0)),
        };

        assert_eq!(named.point(FacePoint::EyeInnerCorner(Side::Left)).unwrap().x, 3.0);
        assert_eq!(named.point(FacePoint::EyeLowerOuter(Side::Right)).unwrap().x, 105.0);
        assert_eq!(named.point(FacePoint::LowerLip).unwrap().x, 201.0);
    }

    #[test]
    fn test_bounding_box_expand() {
        let bbox = BoundingBox::enclosing([Point2::new(10.0, 40.0), Point2::new(30.0, 20.0)])
            .unwrap()
            .expand(20.0);
        assert_eq!(bbox.min_x, -10.0);
        assert_eq!(bbox.min_y, 0.0);
        assert_eq!(bbox.width(), 60.0);
        assert_eq!(bbox.height(), 60.0);
        assert!(BoundingBox::enclosing(Vec::new()).is_none());
    }

    #[test]
    fn test_point_pair_conversion() {
        let p = Point2::from([1.5, 2.0]);
        assert_eq!(p, Point2::new(1.5, 2.0));
        assert_eq!(<[f64; 2]>::from(p), [1.5, 2.0]);
        assert!(!Point2::new(f64::NAN, 0.0).is_finite());
    }
}
