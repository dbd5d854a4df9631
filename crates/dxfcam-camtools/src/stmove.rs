//! Start/end move synthesis.
//!
//! For each shape in final visiting order this derives the physical
//! entry and exit points and, when configured, a straight tangential
//! lead-in segment. The results are transient: they are recomputed
//! whenever the order or the start reference changes and are never
//! stored in the workpiece.

use dxfcam_core::{Line, Point, Segment};

use crate::config::LeadInConfig;
use crate::shape::Shape;

/// Derived entry/exit data for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct StartMove {
    /// Global number of the shape this move belongs to.
    pub shape_nr: usize,
    /// Physical entry point.
    pub entry: Point,
    /// Physical exit point, handed to the next shape as its reference.
    pub exit: Point,
    /// Optional approach segment ending at the entry point.
    pub lead_in: Option<Segment>,
}

/// Synthesizes start moves for shapes in visiting order.
#[derive(Debug, Clone)]
pub struct StartMoveBuilder {
    lead: LeadInConfig,
}

impl StartMoveBuilder {
    pub fn new(lead: LeadInConfig) -> Self {
        Self { lead }
    }

    /// Computes the start move for `shape` given the previous shape's
    /// exit point. Closed shapes are rotated so the cut begins at the
    /// segment boundary nearest the reference; open shapes always
    /// enter at their stored start.
    pub fn synthesize(&self, shape: &mut Shape, previous_exit: Point) -> StartMove {
        if shape.closed {
            shape.set_nearest_start_point(previous_exit);
        }
        let entry = shape.start_point();
        let exit = if shape.closed {
            entry
        } else {
            shape.end_point()
        };
        StartMove {
            shape_nr: shape.nr,
            entry,
            exit,
            lead_in: self.lead_in_for(shape, entry),
        }
    }

    /// A straight approach of the configured length, deviating from
    /// the contour tangent at the entry by the configured angle.
    fn lead_in_for(&self, shape: &Shape, entry: Point) -> Option<Segment> {
        if self.lead.length <= 0.0 {
            return None;
        }
        let first = shape.segments.first()?;
        let probe = first.point_at(0.05);
        let dx = probe.x - entry.x;
        let dy = probe.y - entry.y;
        if dx.hypot(dy) < 1e-9 {
            return None;
        }
        let approach_angle = dy.atan2(dx) + self.lead.angle;
        let start = Point::new(
            entry.x - self.lead.length * approach_angle.cos(),
            entry.y - self.lead.length * approach_angle.sin(),
        );
        Some(Segment::Line(Line::new(start, entry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfcam_core::Hole;

    fn square(nr: usize) -> Shape {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
        ];
        let mut shape = Shape::new(nr, true);
        for i in 0..4 {
            shape.append(Segment::Line(Line::new(corners[i], corners[(i + 1) % 4])));
        }
        shape
    }

    fn no_lead() -> StartMoveBuilder {
        StartMoveBuilder::new(LeadInConfig {
            length: 0.0,
            ..LeadInConfig::default()
        })
    }

    #[test]
    fn test_closed_shape_enters_nearest_corner() {
        let mut shape = square(0);
        let mv = no_lead().synthesize(&mut shape, Point::new(2.1, 1.9));
        assert_eq!(mv.entry, Point::new(2.0, 2.0));
        assert_eq!(mv.exit, mv.entry);
        assert!(mv.lead_in.is_none());
    }

    #[test]
    fn test_open_shape_keeps_stored_endpoints() {
        let mut shape = Shape::new(0, false);
        shape.append(Segment::Line(Line::new(
            Point::new(1.0, 0.0),
            Point::new(4.0, 0.0),
        )));
        let mv = no_lead().synthesize(&mut shape, Point::new(4.0, 0.0));
        assert_eq!(mv.entry, Point::new(1.0, 0.0));
        assert_eq!(mv.exit, Point::new(4.0, 0.0));
    }

    #[test]
    fn test_lead_in_geometry() {
        let builder = StartMoveBuilder::new(LeadInConfig {
            length: 1.5,
            angle: 0.0,
        });
        let mut shape = Shape::new(0, false);
        shape.append(Segment::Line(Line::new(
            Point::origin(),
            Point::new(10.0, 0.0),
        )));
        let mv = builder.synthesize(&mut shape, Point::origin());
        let lead = mv.lead_in.expect("lead-in expected");
        // Ends exactly on the entry point, one lead length away.
        assert!(lead.end().distance_to(&mv.entry) < 1e-12);
        assert!((lead.length() - 1.5).abs() < 1e-9);
        // Zero deviation angle approaches along the cut tangent.
        assert!((lead.start().x - (-1.5)).abs() < 1e-9);
        assert!(lead.start().y.abs() < 1e-9);
    }

    #[test]
    fn test_hole_has_no_lead_in() {
        let builder = StartMoveBuilder::new(LeadInConfig {
            length: 2.0,
            angle: 0.3,
        });
        let mut shape = Shape::new(0, true);
        shape.append(Segment::Hole(Hole::new(Point::new(3.0, 3.0))));
        let mv = builder.synthesize(&mut shape, Point::origin());
        assert_eq!(mv.entry, Point::new(3.0, 3.0));
        assert!(mv.lead_in.is_none());
    }
}
