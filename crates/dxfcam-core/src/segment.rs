//! Cut-path segment primitives.
//!
//! The closed set of segment kinds a contour can be assembled from:
//! straight lines, circular arcs, splines, and drill holes. All kinds
//! share one capability surface: start/end points, length, direction
//! reversal, and parametric sampling. Angles are radians throughout.

use crate::geometry::{BoundingBox, Point};

/// Segments whose length falls within `[-DEGENERATE_EPS, DEGENERATE_EPS)`
/// are dropped during contour assembly.
pub const DEGENERATE_EPS: f64 = 1e-5;

const SPLINE_SAMPLES: usize = 32;

/// A straight cut between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }

    pub fn reversed(&self) -> Line {
        Line::new(self.end, self.start)
    }
}

/// A circular arc. Start and end points are kept alongside the
/// center/angle form so reversal and transformation stay exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub ccw: bool,
}

impl Arc {
    /// Builds an arc from its center/angle form; endpoints are derived.
    /// Equal start and end angles describe a full circle.
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64, ccw: bool) -> Self {
        let start = Point::new(
            center.x + radius * start_angle.cos(),
            center.y + radius * start_angle.sin(),
        );
        let end = Point::new(
            center.x + radius * end_angle.cos(),
            center.y + radius * end_angle.sin(),
        );
        Self {
            start,
            end,
            center,
            radius,
            start_angle,
            end_angle,
            ccw,
        }
    }

    /// A full circle starting at angle 0.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, 0.0, 0.0, true)
    }

    /// The swept angle, always positive, in (0, 2π].
    pub fn sweep(&self) -> f64 {
        let tau = std::f64::consts::TAU;
        let diff = if self.ccw {
            self.end_angle - self.start_angle
        } else {
            self.start_angle - self.end_angle
        };
        let wrapped = diff.rem_euclid(tau);
        if wrapped.abs() < 1e-12 {
            tau
        } else {
            wrapped
        }
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    pub fn point_at(&self, t: f64) -> Point {
        let sweep = self.sweep();
        let angle = if self.ccw {
            self.start_angle + sweep * t
        } else {
            self.start_angle - sweep * t
        };
        Point::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn reversed(&self) -> Arc {
        Arc {
            start: self.end,
            end: self.start,
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle,
            end_angle: self.start_angle,
            ccw: !self.ccw,
        }
    }
}

/// A Bezier spline of arbitrary degree over its control points.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    pub control: Vec<Point>,
}

impl Spline {
    pub fn new(control: Vec<Point>) -> Self {
        Self { control }
    }

    pub fn start(&self) -> Point {
        self.control.first().copied().unwrap_or_default()
    }

    pub fn end(&self) -> Point {
        self.control.last().copied().unwrap_or_default()
    }

    /// De Casteljau evaluation at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        if self.control.is_empty() {
            return Point::origin();
        }
        let mut points = self.control.clone();
        while points.len() > 1 {
            for i in 0..points.len() - 1 {
                points[i] = Point::new(
                    points[i].x + (points[i + 1].x - points[i].x) * t,
                    points[i].y + (points[i + 1].y - points[i].y) * t,
                );
            }
            points.pop();
        }
        points[0]
    }

    /// Approximate arc length from a fixed polyline sampling.
    pub fn length(&self) -> f64 {
        if self.control.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut prev = self.start();
        for i in 1..=SPLINE_SAMPLES {
            let p = self.point_at(i as f64 / SPLINE_SAMPLES as f64);
            total += prev.distance_to(&p);
            prev = p;
        }
        total
    }

    pub fn reversed(&self) -> Spline {
        let mut control = self.control.clone();
        control.reverse();
        Spline { control }
    }
}

/// A drill hole at a single position. Holes carry no cuttable length;
/// the negative nominal length keeps them clear of the degenerate
/// filter in contour assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub point: Point,
}

impl Hole {
    pub fn new(point: Point) -> Self {
        Self { point }
    }

    pub fn length(&self) -> f64 {
        -1.0
    }
}

/// The closed set of segment kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
    Spline(Spline),
    Hole(Hole),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(s) => s.start,
            Segment::Arc(s) => s.start,
            Segment::Spline(s) => s.start(),
            Segment::Hole(s) => s.point,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(s) => s.end,
            Segment::Arc(s) => s.end,
            Segment::Spline(s) => s.end(),
            Segment::Hole(s) => s.point,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Segment::Line(s) => s.length(),
            Segment::Arc(s) => s.length(),
            Segment::Spline(s) => s.length(),
            Segment::Hole(s) => s.length(),
        }
    }

    /// Returns a copy traversed in the opposite direction.
    pub fn reversed(&self) -> Segment {
        match self {
            Segment::Line(s) => Segment::Line(s.reversed()),
            Segment::Arc(s) => Segment::Arc(s.reversed()),
            Segment::Spline(s) => Segment::Spline(s.reversed()),
            Segment::Hole(s) => Segment::Hole(*s),
        }
    }

    /// Samples the segment at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        match self {
            Segment::Line(s) => s.point_at(t),
            Segment::Arc(s) => s.point_at(t),
            Segment::Spline(s) => s.point_at(t),
            Segment::Hole(s) => s.point,
        }
    }

    /// True when the length falls in the dropped range
    /// `[-DEGENERATE_EPS, DEGENERATE_EPS)`.
    pub fn is_degenerate(&self) -> bool {
        let len = self.length();
        (-DEGENERATE_EPS..DEGENERATE_EPS).contains(&len)
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, Segment::Hole(_))
    }

    /// Bounding box from a fixed sampling of the segment.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        match self {
            Segment::Line(s) => {
                bb.extend(s.start);
                bb.extend(s.end);
            }
            Segment::Hole(s) => bb.extend(s.point),
            _ => {
                for i in 0..=16 {
                    bb.extend(self.point_at(i as f64 / 16.0));
                }
            }
        }
        bb
    }
}
