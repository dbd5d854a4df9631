//! Configuration for the CAM pipeline.
//!
//! All configuration is passed explicitly into the builder and
//! optimizer constructors; geometry code never reads ambient state.

use serde::{Deserialize, Serialize};

use dxfcam_core::Point;

/// Machining parameters a layer inherits unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachiningParams {
    /// Final mill depth (negative = below stock top).
    pub mill_depth: f64,
    /// Horizontal feed rate in mm/min.
    pub feed_xy: f64,
    /// Vertical (plunge) feed rate in mm/min.
    pub feed_z: f64,
    /// Tool number.
    pub tool_nr: u32,
}

impl Default for MachiningParams {
    fn default() -> Self {
        Self {
            mill_depth: -2.0,
            feed_xy: 400.0,
            feed_z: 150.0,
            tool_nr: 1,
        }
    }
}

/// Lead-in preferences for start move synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadInConfig {
    /// Length of the straight approach segment. Zero disables lead-ins.
    pub length: f64,
    /// Approach angle in radians, measured against the contour tangent
    /// at the entry point.
    pub angle: f64,
}

impl Default for LeadInConfig {
    fn default() -> Self {
        Self {
            length: 0.0,
            angle: std::f64::consts::FRAC_PI_4,
        }
    }
}

/// Parameters bounding the path optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum number of improvement passes after the nearest-neighbor
    /// construction. Zero keeps the nearest-neighbor order.
    pub max_improvement_iterations: usize,
    /// Whether the travel back to the start position counts toward the
    /// route cost.
    pub return_to_start: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_improvement_iterations: 64,
            return_to_start: false,
        }
    }
}

/// Configuration consumed by the CAM pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CamConfig {
    /// Whether shapes expanded from a block are grouped under the layer
    /// of the referencing insert instead of their own layer.
    pub insert_at_block_layer: bool,
    /// Machine start/end reference point for path optimization.
    pub start_position: Point,
    /// Offset applied to the whole drawing.
    pub drawing_offset: Point,
    /// Rotation applied to the whole drawing, in radians.
    pub drawing_rotation: f64,
    /// Uniform scale applied to the whole drawing.
    pub drawing_scale: f64,
    /// Machining defaults inherited by layers without overrides.
    pub machine: MachiningParams,
    /// Lead-in preferences.
    pub lead_in: LeadInConfig,
    /// Path optimizer bounds.
    pub optimizer: OptimizerConfig,
}

impl Default for CamConfig {
    fn default() -> Self {
        Self {
            insert_at_block_layer: false,
            start_position: Point::origin(),
            drawing_offset: Point::origin(),
            drawing_rotation: 0.0,
            drawing_scale: 1.0,
            machine: MachiningParams::default(),
            lead_in: LeadInConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl CamConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether block shapes land on the insert's layer.
    pub fn with_insert_at_block_layer(mut self, enabled: bool) -> Self {
        self.insert_at_block_layer = enabled;
        self
    }

    /// Sets the machine start/end reference point.
    pub fn with_start_position(mut self, x: f64, y: f64) -> Self {
        self.start_position = Point::new(x, y);
        self
    }

    /// Sets the drawing placement (offset, rotation in radians, scale).
    pub fn with_drawing_placement(mut self, dx: f64, dy: f64, rotation: f64, scale: f64) -> Self {
        self.drawing_offset = Point::new(dx, dy);
        self.drawing_rotation = rotation;
        self.drawing_scale = scale;
        self
    }

    /// Sets the lead-in length and angle (radians).
    pub fn with_lead_in(mut self, length: f64, angle: f64) -> Self {
        self.lead_in = LeadInConfig { length, angle };
        self
    }

    /// Sets the optimizer improvement-pass budget.
    pub fn with_max_improvement_iterations(mut self, iterations: usize) -> Self {
        self.optimizer.max_improvement_iterations = iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let config = CamConfig::new()
            .with_insert_at_block_layer(true)
            .with_start_position(10.0, -5.0)
            .with_lead_in(2.0, 0.5)
            .with_max_improvement_iterations(7);
        assert!(config.insert_at_block_layer);
        assert_eq!(config.start_position, Point::new(10.0, -5.0));
        assert_eq!(config.lead_in.length, 2.0);
        assert_eq!(config.optimizer.max_improvement_iterations, 7);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = CamConfig::new().with_drawing_placement(1.0, 2.0, 0.3, 2.0);
        let json = serde_json::to_string(&config).unwrap();
        let back: CamConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
