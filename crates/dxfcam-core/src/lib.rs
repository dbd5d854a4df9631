//! # DXFCAM Core
//!
//! Geometry primitives for the DXFCAM toolpath pipeline: 2D points and
//! bounding boxes, the closed segment set (lines, arcs, splines, drill
//! holes), and block placement transforms.
//!
//! Everything here is a pure value type: operations return new values,
//! take no configuration, and never fail on well-formed geometry. A
//! zero-length line or zero-radius arc is a valid value; filtering
//! degenerate geometry is the contour builder's job.

pub mod geometry;
pub mod placement;
pub mod segment;

pub use geometry::{BoundingBox, Point};
pub use placement::{apply_chain, Placement};
pub use segment::{Arc, Hole, Line, Segment, Spline, DEGENERATE_EPS};
