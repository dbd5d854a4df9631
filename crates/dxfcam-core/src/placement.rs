//! Block placement transforms.
//!
//! A `Placement` captures how an insert positions a block: points are
//! taken relative to the block base point, scaled, rotated, and moved
//! to the insert point. Nested inserts compose by applying placements
//! innermost first.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::segment::{Arc, Hole, Line, Segment, Spline};

/// Placement of a block instance: `apply(p) = p0 + R(rot)·(s·(p − pb))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Insert point in the parent's coordinates.
    pub p0: Point,
    /// Base point of the referenced block.
    pub pb: Point,
    /// Scale vector (x, y, z). Arcs use the X factor; anisotropic
    /// scaling of arcs is not representable and not supported.
    pub scale: [f64; 3],
    /// Rotation in radians.
    pub rotation: f64,
}

impl Placement {
    pub fn new(p0: Point, pb: Point, scale: [f64; 3], rotation: f64) -> Self {
        Self {
            p0,
            pb,
            scale,
            rotation,
        }
    }

    /// The identity placement.
    pub fn identity() -> Self {
        Self {
            p0: Point::origin(),
            pb: Point::origin(),
            scale: [1.0, 1.0, 1.0],
            rotation: 0.0,
        }
    }

    /// The scale factor that applies to arc radii.
    pub fn uniform_scale(&self) -> f64 {
        self.scale[0]
    }

    /// Maps a point from block coordinates into parent coordinates.
    pub fn apply(&self, p: Point) -> Point {
        let local = Point::new(p.x - self.pb.x, p.y - self.pb.y);
        let scaled = local.scaled(self.scale[0], self.scale[1]);
        let rotated = scaled.rotated(self.rotation);
        Point::new(rotated.x + self.p0.x, rotated.y + self.p0.y)
    }

    /// Maps a segment from block coordinates into parent coordinates.
    pub fn apply_segment(&self, segment: &Segment) -> Segment {
        match segment {
            Segment::Line(line) => Segment::Line(Line::new(
                self.apply(line.start),
                self.apply(line.end),
            )),
            Segment::Arc(arc) => Segment::Arc(Arc {
                start: self.apply(arc.start),
                end: self.apply(arc.end),
                center: self.apply(arc.center),
                radius: arc.radius * self.uniform_scale(),
                start_angle: arc.start_angle + self.rotation,
                end_angle: arc.end_angle + self.rotation,
                ccw: arc.ccw,
            }),
            Segment::Spline(spline) => Segment::Spline(Spline::new(
                spline.control.iter().map(|p| self.apply(*p)).collect(),
            )),
            Segment::Hole(hole) => Segment::Hole(Hole::new(self.apply(hole.point))),
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Applies a root-to-leaf placement chain to a segment, innermost first.
pub fn apply_chain(chain: &[Placement], segment: &Segment) -> Segment {
    chain
        .iter()
        .rev()
        .fold(segment.clone(), |seg, placement| placement.apply_segment(&seg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_is_noop() {
        let p = Point::new(3.0, -2.0);
        assert_eq!(Placement::identity().apply(p), p);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let placement = Placement::new(
            Point::new(10.0, 0.0),
            Point::origin(),
            [2.0, 2.0, 2.0],
            FRAC_PI_2,
        );
        // (1, 0) -> scaled (2, 0) -> rotated (0, 2) -> moved (10, 2)
        let p = placement.apply(Point::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_base_point_offset() {
        let placement = Placement::new(
            Point::new(5.0, 5.0),
            Point::new(1.0, 1.0),
            [1.0, 1.0, 1.0],
            0.0,
        );
        // The base point itself lands on the insert point.
        let p = placement.apply(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_arc_endpoints_consistent_under_placement() {
        let placement = Placement::new(
            Point::new(4.0, -1.0),
            Point::origin(),
            [3.0, 3.0, 3.0],
            0.7,
        );
        let arc = Arc::new(Point::new(2.0, 2.0), 1.5, 0.2, 1.9, true);
        let placed = placement.apply_segment(&Segment::Arc(arc));
        if let Segment::Arc(placed) = placed {
            // Endpoints computed from the transformed center/angles must
            // match the directly transformed endpoints.
            let expect_start = placement.apply(arc.start);
            let derived_start = Point::new(
                placed.center.x + placed.radius * placed.start_angle.cos(),
                placed.center.y + placed.radius * placed.start_angle.sin(),
            );
            assert!(expect_start.distance_to(&placed.start) < 1e-9);
            assert!(derived_start.distance_to(&placed.start) < 1e-9);
            assert!((placed.radius - 4.5).abs() < 1e-12);
        } else {
            panic!("arc did not stay an arc");
        }
    }

    #[test]
    fn test_apply_chain_order() {
        // Root doubles, inner moves by (1, 0): local (0,0) -> inner (1,0) -> root (2,0).
        let root = Placement::new(Point::origin(), Point::origin(), [2.0, 2.0, 2.0], 0.0);
        let inner = Placement::new(Point::new(1.0, 0.0), Point::origin(), [1.0, 1.0, 1.0], 0.0);
        let seg = Segment::Hole(Hole::new(Point::origin()));
        let placed = apply_chain(&[root, inner], &seg);
        assert_eq!(placed.start(), Point::new(2.0, 0.0));
    }
}
