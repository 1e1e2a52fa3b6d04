use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

pub type Point = Point3<f64>;
pub type Vector = Vector3<f64>;

// Below this squared length a segment is treated as a single point
const DEGENERATE_LENGTH_SQUARED: f64 = 1e-12;

/// Which side of a road's direction (start -> end) a point lies on,
/// looking down the reference "up" axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Geometry capability attached to every road.
///
/// Only straight segments are provided here; curved roads plug in by
/// implementing this trait.
pub trait RoadGeometry: std::fmt::Debug + Send + Sync {
    fn start(&self) -> Point;
    fn end(&self) -> Point;

    /// Closest point on the road to `p`
    fn closest_point(&self, p: &Point) -> Point;

    /// Side of the road `p` lies on, or `None` if `p` is on the road's line
    fn side_of(&self, p: &Point, up: &Vector) -> Option<Side>;

    fn distance_squared(&self, p: &Point) -> f64 {
        nalgebra::distance_squared(&self.closest_point(p), p)
    }
}

/// Straight road geometry between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn direction(&self) -> Vector {
        self.end - self.start
    }

    /// Unit direction, or `None` for a degenerate segment
    pub fn unit_direction(&self) -> Option<Vector> {
        let dir = self.direction();
        if dir.norm_squared() < DEGENERATE_LENGTH_SQUARED {
            None
        } else {
            Some(dir.normalize())
        }
    }
}

impl RoadGeometry for Segment {
    fn start(&self) -> Point {
        self.start
    }

    fn end(&self) -> Point {
        self.end
    }

    fn closest_point(&self, p: &Point) -> Point {
        let dir = self.direction();
        let len_sq = dir.norm_squared();
        if len_sq < DEGENERATE_LENGTH_SQUARED {
            return self.start;
        }

        // Project onto the segment and clamp to its endpoints
        let t = ((p - self.start).dot(&dir) / len_sq).clamp(0.0, 1.0);
        self.start + dir * t
    }

    fn side_of(&self, p: &Point, up: &Vector) -> Option<Side> {
        let dir = self.unit_direction()?;
        let offset = p - self.start;
        let signed = up.dot(&dir.cross(&offset));

        if signed.abs() < f64::EPSILON {
            None
        } else if signed > 0.0 {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }
}
