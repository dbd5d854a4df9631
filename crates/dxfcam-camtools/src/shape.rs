//! Finalized shapes ready for path planning.
//!
//! A shape is the flattened result of one non-insert contour: an
//! absolute (fully transformed) segment chain with a type tag, a
//! unique sequence number, and plain-id back-references to its owning
//! layer and entity node.

use dxfcam_core::{BoundingBox, Point, Segment};

use crate::config::MachiningParams;

/// Type tag of a finalized shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    /// A milled contour.
    Normal,
    /// A drilled hole.
    Hole,
}

/// A finalized, direction-normalized geometric object.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Unique sequence number across the workpiece.
    pub nr: usize,
    /// Whether the chain closes back on its first point.
    pub closed: bool,
    pub shape_type: ShapeType,
    /// Numeric id of the owning layer.
    pub layer_nr: usize,
    /// Id of the entity node the shape was built under.
    pub entity_nr: usize,
    /// The absolute segment chain.
    pub segments: Vec<Segment>,
    /// Machining overrides; `None` inherits the layer parameters.
    pub params: Option<MachiningParams>,
    disabled: bool,
    locked: bool,
}

impl Shape {
    pub fn new(nr: usize, closed: bool) -> Self {
        Self {
            nr,
            closed,
            shape_type: ShapeType::Normal,
            layer_nr: 0,
            entity_nr: 0,
            segments: Vec::new(),
            params: None,
            disabled: false,
            locked: false,
        }
    }

    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Stored start endpoint of the chain.
    pub fn start_point(&self) -> Point {
        self.segments.first().map(|s| s.start()).unwrap_or_default()
    }

    /// Stored end endpoint of the chain.
    pub fn end_point(&self) -> Point {
        self.segments.last().map(|s| s.end()).unwrap_or_default()
    }

    /// Total cuttable length of the chain.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length().max(0.0)).sum()
    }

    /// A disabled shape stays in the model but is excluded from export.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// A locked shape keeps its position during path optimization.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Reverses traversal direction of the whole chain.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for segment in &mut self.segments {
            *segment = segment.reversed();
        }
    }

    /// Signed area under the shoelace convention, from a fixed sampling
    /// of the chain (curved segments contribute intermediate points).
    /// Positive means counter-clockwise traversal.
    pub fn signed_area(&self) -> f64 {
        let points = self.sample_outline();
        if points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Forces clockwise traversal (signed area <= 0).
    pub fn analyse_and_normalize(&mut self) {
        if self.signed_area() > 0.0 {
            self.reverse();
        }
    }

    /// Rotates a closed chain so it starts at the segment boundary
    /// nearest `reference`. Open chains keep their stored start.
    pub fn set_nearest_start_point(&mut self, reference: Point) {
        if !self.closed || self.segments.len() < 2 {
            return;
        }
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, segment) in self.segments.iter().enumerate() {
            let dist = segment.start().distance_to(&reference);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        self.segments.rotate_left(best);
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.segments
            .iter()
            .fold(BoundingBox::empty(), |bb, s| bb.join(&s.bounding_box()))
    }

    fn sample_outline(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for segment in &self.segments {
            if segment.is_hole() {
                continue;
            }
            if points.is_empty() {
                points.push(segment.start());
            }
            match segment {
                Segment::Line(line) => points.push(line.end),
                _ => {
                    for k in 1..=8 {
                        points.push(segment.point_at(k as f64 / 8.0));
                    }
                }
            }
        }
        points
    }
}
