//! Structured drawing model handed over by the DXF reader.
//!
//! The reader collaborator delivers, per entity, an ordered geometry
//! list (`geo`) and a precomputed contour list (`cont`) of
//! (geometry-index, reversed) pairs, plus the layer table and the
//! named block definitions. Nothing here parses DXF; this is the
//! contract the contour builder consumes.

use dxfcam_core::{Point, Segment};

/// One record of the drawing's layer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRecord {
    /// Numeric layer id.
    pub nr: usize,
    /// Layer name as it appears in the drawing.
    pub name: String,
}

/// A placed reference to a block, carrying its own transform.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertRef {
    /// Name of the referenced block.
    pub block_name: String,
    /// Insert point in the parent entity's coordinates.
    pub point: Point,
    /// Scale vector (x, y, z).
    pub scale: [f64; 3],
    /// Rotation in radians.
    pub rotation: f64,
}

/// The payload of one entry in an entity's geometry list.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoKind {
    /// An ordered sub-chain of plain segments (a polyline expands to
    /// several, a single line or arc to one).
    Chain(Vec<Segment>),
    /// A nested block reference.
    Insert(InsertRef),
}

/// One entry of an entity's geometry list, tagged with its source layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGeo {
    pub layer_nr: usize,
    pub kind: GeoKind,
}

impl EntityGeo {
    pub fn chain(layer_nr: usize, segments: Vec<Segment>) -> Self {
        Self {
            layer_nr,
            kind: GeoKind::Chain(segments),
        }
    }

    pub fn insert(layer_nr: usize, insert: InsertRef) -> Self {
        Self {
            layer_nr,
            kind: GeoKind::Insert(insert),
        }
    }
}

/// An ordered chain of geometry references forming one continuous path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Whether the chain closes back on its first point.
    pub closed: bool,
    /// (geometry-index, reversed) pairs in traversal order.
    pub order: Vec<(usize, bool)>,
}

impl Contour {
    pub fn new(closed: bool, order: Vec<(usize, bool)>) -> Self {
        Self { closed, order }
    }
}

/// A named group of raw geometry plus its precomputed contours.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub name: String,
    /// Base point, relevant when the entity is a block definition.
    pub base_point: Point,
    pub geo: Vec<EntityGeo>,
    pub cont: Vec<Contour>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_point: Point::origin(),
            geo: Vec::new(),
            cont: Vec::new(),
        }
    }

    /// Distinct source layer ids referenced by this entity's geometry.
    pub fn used_layers(&self) -> Vec<usize> {
        let mut layers: Vec<usize> = self.geo.iter().map(|g| g.layer_nr).collect();
        layers.sort_unstable();
        layers.dedup();
        layers
    }

    /// Number of block references in this entity's geometry.
    pub fn insert_count(&self) -> usize {
        self.geo
            .iter()
            .filter(|g| matches!(g.kind, GeoKind::Insert(_)))
            .count()
    }
}

/// The named block definitions of a drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Blocks {
    pub entities: Vec<Entity>,
}

impl Blocks {
    /// Looks up a block index by name.
    pub fn nr_by_name(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.name == name)
    }

    pub fn by_name(&self, name: &str) -> Option<&Entity> {
        self.nr_by_name(name).map(|nr| &self.entities[nr])
    }
}

/// A complete drawing as delivered by the reader collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    /// The top-level entity section.
    pub entities: Entity,
    /// Named block definitions referenced by inserts.
    pub blocks: Blocks,
    /// Layer table (numeric id to name).
    pub layers: Vec<LayerRecord>,
}

impl Drawing {
    pub fn new() -> Self {
        Self {
            entities: Entity::new("Entities"),
            blocks: Blocks::default(),
            layers: Vec::new(),
        }
    }

    /// Name for a layer id; synthesizes one for ids the table misses.
    pub fn layer_name(&self, nr: usize) -> String {
        self.layers
            .iter()
            .find(|record| record.nr == nr)
            .map(|record| record.name.clone())
            .unwrap_or_else(|| format!("LAYER_{}", nr))
    }
}
