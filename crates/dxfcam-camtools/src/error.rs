//! Error types for the CAM pipeline crate.
//!
//! Structural problems in the input drawing abort the load with enough
//! context (entity name, block name) to diagnose. Geometry-level
//! anomalies such as degenerate segments are handled locally in the
//! contour builder and never surface here.

use thiserror::Error;

/// Errors that can occur while building and ordering a workpiece.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamError {
    /// An entity references a block name absent from the blocks table.
    #[error("Entity '{entity}' references unknown block '{block}'")]
    BlockNotFound {
        /// The entity whose contour holds the insert.
        entity: String,
        /// The block name that could not be resolved.
        block: String,
    },

    /// A block inserts itself, directly or through nested inserts.
    #[error("Block '{block}' inserts itself through its own contour chain")]
    InsertCycle {
        /// The block at which the cycle was detected.
        block: String,
    },

    /// A caller-supplied export order is not a valid permutation.
    #[error("Invalid export order for layer {layer}: {reason}")]
    InvalidExportOrder {
        /// Numeric id of the layer being reordered.
        layer: usize,
        /// Why the order was rejected.
        reason: String,
    },

    /// A shape number does not exist in the workpiece.
    #[error("Unknown shape number {nr}")]
    UnknownShape {
        /// The shape number that was not found.
        nr: usize,
    },
}

/// Result type alias for CAM pipeline operations.
pub type CamResult<T> = Result<T, CamError>;
