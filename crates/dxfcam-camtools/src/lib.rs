//! # DXFCAM CAM Tools
//!
//! The geometry-to-toolpath pipeline behind a DXF to G-code converter.
//! Takes the structured entity/layer model produced by a DXF reader
//! and turns it into direction-normalized shapes in an optimized
//! visiting order, ready for a G-code emitter.
//!
//! ## Pipeline Stages
//!
//! - **Drawing Model**: the contract the reader collaborator fills in
//!   (entities, precomputed contours, blocks, layer table)
//! - **Contour Builder**: expands nested block inserts under composed
//!   placements, filters degenerate segments, normalizes direction
//! - **Layer Model**: groups shapes by source layer with export-order
//!   bookkeeping and per-layer machining overrides
//! - **Path Optimizer**: nearest-neighbor + bounded exchange passes
//!   over each layer's enabled shapes, locked shapes fixed
//! - **Start Move Synthesis**: physical entry/exit points and optional
//!   lead-in geometry per shape, in final visiting order
//!
//! One drawing load triggers one full synchronous pass; a structural
//! error (unknown block, insert cycle) aborts the load with context
//! and leaves no partial state behind.

pub mod builder;
pub mod config;
pub mod drawing;
pub mod error;
pub mod layers;
pub mod optimizer;
pub mod pipeline;
pub mod shape;
pub mod stmove;

pub use builder::{ContourBuilder, EntityContent};
pub use config::{CamConfig, LeadInConfig, MachiningParams, OptimizerConfig};
pub use drawing::{Blocks, Contour, Drawing, Entity, EntityGeo, GeoKind, InsertRef, LayerRecord};
pub use error::{CamError, CamResult};
pub use layers::{parse_layer_name, Layer, LayerKind};
pub use optimizer::{PathOptimizer, RouteStop};
pub use pipeline::{process_drawing, CamPipeline, ExportStep, Workpiece};
pub use shape::{Shape, ShapeType};
pub use stmove::{StartMove, StartMoveBuilder};
