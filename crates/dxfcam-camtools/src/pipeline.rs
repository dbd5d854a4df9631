//! One-pass orchestration: build contours, group layers, optimize
//! visiting order, and hand ordered export data to the emitter.
//!
//! The pipeline is synchronous and batch-oriented: one drawing load
//! triggers one full pass. On a structural error the caller's
//! previously loaded workpiece (if any) stays the externally visible
//! state; no partially built result is returned.

use tracing::debug;

use crate::builder::{ContourBuilder, EntityContent};
use crate::config::CamConfig;
use crate::drawing::Drawing;
use crate::error::{CamError, CamResult};
use crate::layers::Layer;
use crate::optimizer::{PathOptimizer, RouteStop};
use crate::shape::Shape;
use crate::stmove::{StartMove, StartMoveBuilder};

/// The fully built model of one loaded drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Workpiece {
    /// All shapes, indexed by their sequence number.
    pub shapes: Vec<Shape>,
    /// Layers in numeric-id order.
    pub layers: Vec<Layer>,
    /// The entity instantiation tree.
    pub entity_root: EntityContent,
}

impl Workpiece {
    pub(crate) fn new(shapes: Vec<Shape>, layers: Vec<Layer>, entity_root: EntityContent) -> Self {
        Self {
            shapes,
            layers,
            entity_root,
        }
    }

    pub fn shape(&self, nr: usize) -> CamResult<&Shape> {
        self.shapes.get(nr).ok_or(CamError::UnknownShape { nr })
    }

    pub fn layer_by_nr(&self, nr: usize) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.nr == nr)
    }

    /// Toggles a shape and refreshes its layer's enabled order.
    pub fn set_shape_disabled(&mut self, nr: usize, disabled: bool) -> CamResult<()> {
        let shape = self
            .shapes
            .get_mut(nr)
            .ok_or(CamError::UnknownShape { nr })?;
        shape.set_disabled(disabled);
        let layer_nr = shape.layer_nr;
        if let Some(layer) = self.layers.iter_mut().find(|layer| layer.nr == layer_nr) {
            layer.refresh_enabled_order(&self.shapes);
        }
        Ok(())
    }

    /// Marks a shape as fixed for the path optimizer.
    pub fn set_shape_locked(&mut self, nr: usize, locked: bool) -> CamResult<()> {
        let shape = self
            .shapes
            .get_mut(nr)
            .ok_or(CamError::UnknownShape { nr })?;
        shape.set_locked(locked);
        Ok(())
    }

    /// Bounding box over all shapes.
    pub fn bounding_box(&self) -> dxfcam_core::BoundingBox {
        self.shapes
            .iter()
            .fold(dxfcam_core::BoundingBox::empty(), |bb, shape| {
                bb.join(&shape.bounding_box())
            })
    }
}

/// One entry of the ordered export plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportStep {
    pub layer_nr: usize,
    pub shape_nr: usize,
    pub start_move: StartMove,
}

/// Runs the geometry-to-toolpath pipeline for one drawing.
#[derive(Debug, Clone)]
pub struct CamPipeline {
    config: CamConfig,
}

impl CamPipeline {
    pub fn new(config: CamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CamConfig {
        &self.config
    }

    /// Full pass: contour build, layer grouping, path optimization.
    pub fn process(&self, drawing: &Drawing) -> CamResult<Workpiece> {
        let mut workpiece = ContourBuilder::new(drawing, &self.config).build()?;
        self.optimize(&mut workpiece);
        Ok(workpiece)
    }

    /// (Re)computes every layer's visiting order. The start reference
    /// carries forward from each layer's final exit point.
    pub fn optimize(&self, workpiece: &mut Workpiece) {
        let optimizer = PathOptimizer::new(self.config.optimizer);
        let mut start = self.config.start_position;
        for layer in &mut workpiece.layers {
            let enabled = layer.exp_order.clone();
            let stops: Vec<RouteStop> = enabled
                .iter()
                .map(|&idx| route_stop(&workpiece.shapes[layer.shapes[idx]]))
                .collect();

            let slots = optimizer.optimize(&stops, start);
            let optimized: Vec<usize> = slots.iter().map(|&slot| enabled[slot]).collect();
            if let Some(&last) = slots.last() {
                start = stops[last].exit;
            }
            debug!("Layer {} visiting order: {:?}", layer.nr, optimized);
            layer.apply_optimized_order(&optimized, &workpiece.shapes);
        }
    }

    /// Derives the ordered export plan: layers in numeric order, shapes
    /// in `exp_order`, each with its start move. Closed shapes are
    /// rotated to enter nearest the preceding exit, so the workpiece is
    /// taken mutably; the moves themselves are transient.
    pub fn export_plan(&self, workpiece: &mut Workpiece) -> Vec<ExportStep> {
        let builder = StartMoveBuilder::new(self.config.lead_in);
        let mut steps = Vec::new();
        let mut previous_exit = self.config.start_position;
        for li in 0..workpiece.layers.len() {
            let layer_nr = workpiece.layers[li].nr;
            let shape_nrs: Vec<usize> = workpiece.layers[li].export_shape_nrs().collect();
            for shape_nr in shape_nrs {
                let start_move =
                    builder.synthesize(&mut workpiece.shapes[shape_nr], previous_exit);
                previous_exit = start_move.exit;
                steps.push(ExportStep {
                    layer_nr,
                    shape_nr,
                    start_move,
                });
            }
        }
        steps
    }
}

/// Routing endpoints for a shape: closed shapes offer their stored
/// start as both entry and exit, open shapes their stored endpoints.
fn route_stop(shape: &Shape) -> RouteStop {
    let entry = shape.start_point();
    let exit = if shape.closed {
        entry
    } else {
        shape.end_point()
    };
    RouteStop {
        entry,
        exit,
        locked: shape.is_locked(),
    }
}

/// Convenience: process a drawing with the given configuration.
pub fn process_drawing(drawing: &Drawing, config: &CamConfig) -> CamResult<Workpiece> {
    CamPipeline::new(config.clone()).process(drawing)
}
