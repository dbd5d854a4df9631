//! # DXFCAM
//!
//! The geometry-to-toolpath pipeline of a DXF to G-code converter:
//! - Contour assembly from an entity/block hierarchy with nested
//!   placements
//! - Direction-normalized shapes grouped by drawing layer
//! - Near-optimal visiting order per layer (open-path routing with a
//!   fixed start)
//! - Physical entry/exit points and lead-in moves per shape
//!
//! ## Architecture
//!
//! DXFCAM is organized as a workspace with two crates:
//!
//! 1. **dxfcam-core** - Geometry primitives: points, segments,
//!    bounding boxes, placement transforms
//! 2. **dxfcam-camtools** - The pipeline: drawing model, contour
//!    builder, layer model, path optimizer, start move synthesis
//!
//! DXF parsing and G-code emission live in external collaborators;
//! this workspace consumes the reader's structured drawing model and
//! produces the ordered shape/move data an emitter needs.

pub use dxfcam_camtools as camtools;
pub use dxfcam_core as geom;

pub use dxfcam_core::{Arc, BoundingBox, Hole, Line, Placement, Point, Segment, Spline};

pub use dxfcam_camtools::{
    process_drawing, Blocks, CamConfig, CamError, CamPipeline, CamResult, Contour, ContourBuilder,
    Drawing, Entity, EntityContent, EntityGeo, ExportStep, GeoKind, InsertRef, Layer, LayerKind,
    LayerRecord, LeadInConfig, MachiningParams, OptimizerConfig, PathOptimizer, RouteStop, Shape,
    ShapeType, StartMove, StartMoveBuilder, Workpiece,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
