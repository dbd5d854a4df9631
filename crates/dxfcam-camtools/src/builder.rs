//! Contour builder: turns the reader's entity/contour model into
//! finalized shapes grouped by layer.
//!
//! Inserts are expanded recursively under their composed placements;
//! degenerate segments are dropped; every surviving shape is
//! direction-normalized to clockwise before registration. The build is
//! all-or-nothing: a structural error (unknown block, insert cycle)
//! aborts the whole load and no partial workpiece escapes.

use tracing::{debug, info};

use dxfcam_core::{apply_chain, Placement, Point, Segment};

use crate::config::CamConfig;
use crate::drawing::{Contour, Drawing, Entity, GeoKind, InsertRef};
use crate::error::{CamError, CamResult};
use crate::layers::Layer;
use crate::pipeline::Workpiece;
use crate::shape::{Shape, ShapeType};

/// Node of the entity instantiation tree. Block definitions stay in
/// the drawing; each node records one instantiation with its own
/// resolved placement.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityContent {
    /// Node id, unique within one build.
    pub nr: usize,
    /// Entity or block name.
    pub name: String,
    /// Placement of this node relative to its parent.
    pub placement: Placement,
    /// Nested block instantiations.
    pub children: Vec<EntityContent>,
    /// Global numbers of the shapes built directly under this node.
    pub shape_nrs: Vec<usize>,
}

impl EntityContent {
    pub fn new(nr: usize, name: impl Into<String>, placement: Placement) -> Self {
        Self {
            nr,
            name: name.into(),
            placement,
            children: Vec::new(),
            shape_nrs: Vec::new(),
        }
    }

    /// Total number of shapes in this subtree.
    pub fn shape_count(&self) -> usize {
        self.shape_nrs.len() + self.children.iter().map(|c| c.shape_count()).sum::<usize>()
    }
}

/// Builds shapes and layers from a drawing.
pub struct ContourBuilder<'a> {
    drawing: &'a Drawing,
    config: &'a CamConfig,
    shapes: Vec<Shape>,
    layers: Vec<Layer>,
    next_entity_nr: usize,
}

impl<'a> ContourBuilder<'a> {
    pub fn new(drawing: &'a Drawing, config: &'a CamConfig) -> Self {
        Self {
            drawing,
            config,
            shapes: Vec::new(),
            layers: Vec::new(),
            next_entity_nr: 0,
        }
    }

    /// Runs the full build pass and returns the finished workpiece.
    pub fn build(mut self) -> CamResult<Workpiece> {
        let drawing = self.drawing;
        self.log_load_statistics();

        let root_placement = Placement::new(
            self.config.drawing_offset,
            Point::origin(),
            [
                self.config.drawing_scale,
                self.config.drawing_scale,
                self.config.drawing_scale,
            ],
            self.config.drawing_rotation,
        );
        let mut root = EntityContent::new(0, "Entities", root_placement);
        self.next_entity_nr = 1;

        let mut chain = vec![root_placement];
        let mut stack: Vec<String> = Vec::new();
        self.build_entity(&mut root, &drawing.entities, &mut chain, &mut stack, None)?;

        self.layers.sort_by_key(|layer| layer.nr);
        for layer in &mut self.layers {
            layer.reset_export_order(&self.shapes);
        }

        info!(
            "Built {} shapes across {} layers",
            self.shapes.len(),
            self.layers.len()
        );
        Ok(Workpiece::new(self.shapes, self.layers, root))
    }

    fn log_load_statistics(&self) {
        let drawing = self.drawing;
        info!(
            "Loaded layers: {}, blocks: {}",
            drawing.layers.len(),
            drawing.blocks.entities.len()
        );
        for (i, block) in drawing.blocks.entities.iter().enumerate() {
            debug!(
                "Block {} ('{}') includes {} geometries, reduced to {} contours, used layers: {:?}",
                i,
                block.name,
                block.geo.len(),
                block.cont.len(),
                block.used_layers()
            );
        }
        info!(
            "Loaded {} entity geometries; reduced to {} contours; used layers: {:?}; number of inserts {}",
            drawing.entities.geo.len(),
            drawing.entities.cont.len(),
            drawing.entities.used_layers(),
            drawing.entities.insert_count()
        );
    }

    fn build_entity(
        &mut self,
        parent: &mut EntityContent,
        entity: &'a Entity,
        chain: &mut Vec<Placement>,
        stack: &mut Vec<String>,
        insert_layer: Option<usize>,
    ) -> CamResult<()> {
        for cont in &entity.cont {
            let Some(&(first_idx, _)) = cont.order.first() else {
                continue;
            };
            let first = &entity.geo[first_idx];
            match &first.kind {
                GeoKind::Insert(insert) => {
                    self.expand_insert(parent, entity, insert, first.layer_nr, chain, stack)?;
                }
                GeoKind::Chain(_) => {
                    self.assemble_shape(parent, entity, cont, chain, insert_layer);
                }
            }
        }
        Ok(())
    }

    fn expand_insert(
        &mut self,
        parent: &mut EntityContent,
        entity: &Entity,
        insert: &InsertRef,
        insert_layer_nr: usize,
        chain: &mut Vec<Placement>,
        stack: &mut Vec<String>,
    ) -> CamResult<()> {
        let drawing = self.drawing;
        let block_nr = drawing.blocks.nr_by_name(&insert.block_name).ok_or_else(|| {
            CamError::BlockNotFound {
                entity: entity.name.clone(),
                block: insert.block_name.clone(),
            }
        })?;
        if stack.iter().any(|name| name == &insert.block_name) {
            return Err(CamError::InsertCycle {
                block: insert.block_name.clone(),
            });
        }
        let block = &drawing.blocks.entities[block_nr];

        let placement = Placement::new(insert.point, block.base_point, insert.scale, insert.rotation);
        let nr = self.next_entity_nr;
        self.next_entity_nr += 1;
        let mut child = EntityContent::new(nr, insert.block_name.clone(), placement);

        debug!(
            "Expanding block '{}' at ({}, {})",
            insert.block_name, insert.point.x, insert.point.y
        );
        chain.push(placement);
        stack.push(insert.block_name.clone());
        let result = self.build_entity(&mut child, block, chain, stack, Some(insert_layer_nr));
        stack.pop();
        chain.pop();
        result?;

        parent.children.push(child);
        Ok(())
    }

    fn assemble_shape(
        &mut self,
        parent: &mut EntityContent,
        entity: &Entity,
        cont: &Contour,
        chain: &[Placement],
        insert_layer: Option<usize>,
    ) {
        let mut shape = Shape::new(self.shapes.len(), cont.closed);
        shape.entity_nr = parent.nr;
        let mut source_layer = 0;

        for &(idx, reversed) in &cont.order {
            let geo = &entity.geo[idx];
            source_layer = geo.layer_nr;
            let GeoKind::Chain(segments) = &geo.kind else {
                continue;
            };
            if reversed {
                for segment in segments.iter().rev() {
                    self.append_segment(&mut shape, segment.reversed(), chain);
                }
            } else {
                for segment in segments {
                    self.append_segment(&mut shape, segment.clone(), chain);
                }
            }
        }

        if shape.is_empty() {
            return;
        }
        shape.analyse_and_normalize();

        let layer_nr = match insert_layer {
            Some(nr) if self.config.insert_at_block_layer => nr,
            _ => source_layer,
        };
        parent.shape_nrs.push(shape.nr);
        self.add_to_layer(shape, layer_nr);
    }

    /// Appends one segment to the shape under construction. The length
    /// filter runs on the local (pre-placement) geometry.
    fn append_segment(&mut self, shape: &mut Shape, segment: Segment, chain: &[Placement]) {
        if segment.is_degenerate() {
            return;
        }
        if segment.is_hole() {
            shape.shape_type = ShapeType::Hole;
            shape.closed = true;
        }
        shape.append(apply_chain(chain, &segment));
    }

    fn add_to_layer(&mut self, mut shape: Shape, layer_nr: usize) {
        shape.layer_nr = layer_nr;
        let idx = match self.layers.iter().position(|layer| layer.nr == layer_nr) {
            Some(idx) => idx,
            None => {
                let name = self.drawing.layer_name(layer_nr);
                self.layers
                    .push(Layer::new(layer_nr, name, self.config.machine));
                self.layers.len() - 1
            }
        };
        let layer = &mut self.layers[idx];
        if layer.is_ignored() {
            shape.set_disabled(true);
        }
        layer.shapes.push(shape.nr);
        self.shapes.push(shape);
    }
}
