//! Layer bookkeeping: shape grouping, export order, and per-layer
//! machining overrides.
//!
//! Layer names can embed machining parameters, e.g. `MILL: ZF=-3 F=500`
//! or `DRILL: T=2`; `IGNORE:` layers are loaded but their shapes start
//! out disabled.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::MachiningParams;
use crate::error::{CamError, CamResult};
use crate::shape::Shape;

/// Machining role parsed from the layer name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Standard,
    Mill,
    Drill,
    Ignore,
}

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?i)\s*(MILL|DRILL|IGNORE)\s*:\s*(.*)$").expect("layer prefix pattern")
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(ZF|FZ|F|T)\s*=\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("layer token pattern")
    })
}

/// Applies name-embedded parameters on top of the machine defaults.
/// Returns the layer kind and the effective parameters.
pub fn parse_layer_name(name: &str, defaults: MachiningParams) -> (LayerKind, MachiningParams) {
    let Some(caps) = prefix_re().captures(name) else {
        return (LayerKind::Standard, defaults);
    };
    let kind = match caps[1].to_ascii_uppercase().as_str() {
        "MILL" => LayerKind::Mill,
        "DRILL" => LayerKind::Drill,
        _ => LayerKind::Ignore,
    };
    let mut params = defaults;
    for token in token_re().captures_iter(&caps[2]) {
        let value: f64 = match token[2].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        match token[1].to_ascii_uppercase().as_str() {
            "ZF" => params.mill_depth = value,
            "F" => params.feed_xy = value,
            "FZ" => params.feed_z = value,
            "T" => params.tool_nr = value as u32,
            _ => {}
        }
    }
    (kind, params)
}

/// A named grouping of shapes sharing a source drawing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Numeric layer id from the drawing.
    pub nr: usize,
    /// Layer name as it appears in the drawing.
    pub name: String,
    /// Machining role parsed from the name.
    pub kind: LayerKind,
    /// Global shape numbers in insertion order.
    pub shapes: Vec<usize>,
    /// Effective machining parameters for this layer.
    pub params: MachiningParams,
    /// Optimized visiting order: layer-relative indices of enabled
    /// shapes only.
    pub exp_order: Vec<usize>,
    /// The same order including disabled shapes, for display/audit.
    pub exp_order_complete: Vec<usize>,
}

impl Layer {
    pub fn new(nr: usize, name: impl Into<String>, defaults: MachiningParams) -> Self {
        let name = name.into();
        let (kind, params) = parse_layer_name(&name, defaults);
        Self {
            nr,
            name,
            kind,
            shapes: Vec::new(),
            params,
            exp_order: Vec::new(),
            exp_order_complete: Vec::new(),
        }
    }

    /// Whether shapes on this layer start out disabled.
    pub fn is_ignored(&self) -> bool {
        self.kind == LayerKind::Ignore
    }

    /// Effective machining parameters for a shape of this layer.
    pub fn params_for(&self, shape: &Shape) -> MachiningParams {
        shape.params.unwrap_or(self.params)
    }

    /// Resets both orders to insertion order. `shapes` is the global
    /// shape list the layer's numbers index into.
    pub fn reset_export_order(&mut self, shapes: &[Shape]) {
        self.exp_order_complete = (0..self.shapes.len()).collect();
        self.refresh_enabled_order(shapes);
    }

    /// Rederives `exp_order` from `exp_order_complete`, dropping
    /// disabled shapes.
    pub fn refresh_enabled_order(&mut self, shapes: &[Shape]) {
        self.exp_order = self
            .exp_order_complete
            .iter()
            .copied()
            .filter(|&idx| !shapes[self.shapes[idx]].is_disabled())
            .collect();
    }

    /// Replaces the complete order with a caller-supplied permutation
    /// (e.g. from drag & drop reordering). The replacement is atomic:
    /// on error the previous order stays untouched.
    pub fn set_export_order(&mut self, order: Vec<usize>, shapes: &[Shape]) -> CamResult<()> {
        if order.len() != self.shapes.len() {
            return Err(CamError::InvalidExportOrder {
                layer: self.nr,
                reason: format!(
                    "expected {} entries, got {}",
                    self.shapes.len(),
                    order.len()
                ),
            });
        }
        let mut seen = vec![false; self.shapes.len()];
        for &idx in &order {
            if idx >= self.shapes.len() {
                return Err(CamError::InvalidExportOrder {
                    layer: self.nr,
                    reason: format!("index {} out of range", idx),
                });
            }
            if seen[idx] {
                return Err(CamError::InvalidExportOrder {
                    layer: self.nr,
                    reason: format!("duplicate index {}", idx),
                });
            }
            seen[idx] = true;
        }
        self.exp_order_complete = order;
        self.refresh_enabled_order(shapes);
        Ok(())
    }

    /// Applies an optimizer result: `optimized` holds the enabled
    /// layer-relative indices in their new visiting order. Disabled
    /// shapes keep their slots in the complete order.
    pub fn apply_optimized_order(&mut self, optimized: &[usize], shapes: &[Shape]) {
        let mut next = optimized.iter().copied();
        let complete = self
            .exp_order_complete
            .iter()
            .map(|&idx| {
                if shapes[self.shapes[idx]].is_disabled() {
                    idx
                } else {
                    next.next().unwrap_or(idx)
                }
            })
            .collect();
        self.exp_order_complete = complete;
        self.exp_order = optimized.to_vec();
    }

    /// Global shape numbers in export order.
    pub fn export_shape_nrs(&self) -> impl Iterator<Item = usize> + '_ {
        self.exp_order.iter().map(|&idx| self.shapes[idx])
    }
}
