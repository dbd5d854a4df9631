//! Full-pass pipeline tests: optimization across layers, locked
//! shapes, and the ordered export plan.

use dxfcam_camtools::{CamConfig, CamPipeline, Contour, Drawing, EntityGeo, LayerRecord};
use dxfcam_core::{Line, Point, Segment};

fn line(a: (f64, f64), b: (f64, f64)) -> Segment {
    Segment::Line(Line::new(Point::new(a.0, a.1), Point::new(b.0, b.1)))
}

fn push_open_line(drawing: &mut Drawing, layer_nr: usize, a: (f64, f64), b: (f64, f64)) {
    let idx = drawing.entities.geo.len();
    drawing
        .entities
        .geo
        .push(EntityGeo::chain(layer_nr, vec![line(a, b)]));
    drawing.entities.cont.push(Contour::new(false, vec![(idx, false)]));
}

/// Three open shapes with the endpoint pairs from the routing scenario:
/// (0,0)-(1,0), (5,5)-(5,6), (1,1)-(0,1).
fn routing_drawing() -> Drawing {
    let mut drawing = Drawing::new();
    drawing.layers.push(LayerRecord {
        nr: 0,
        name: "cuts".to_string(),
    });
    push_open_line(&mut drawing, 0, (0.0, 0.0), (1.0, 0.0));
    push_open_line(&mut drawing, 0, (5.0, 5.0), (5.0, 6.0));
    push_open_line(&mut drawing, 0, (1.0, 1.0), (0.0, 1.0));
    drawing
}

#[test]
fn nearest_neighbor_order_from_fixed_start() {
    let pipeline = CamPipeline::new(CamConfig::default().with_start_position(0.0, 0.0));
    let mut workpiece = pipeline.process(&routing_drawing()).unwrap();
    assert_eq!(workpiece.layers[0].exp_order, vec![0, 2, 1]);

    // Re-running the optimizer on the same input keeps the result.
    pipeline.optimize(&mut workpiece);
    assert_eq!(workpiece.layers[0].exp_order, vec![0, 2, 1]);
}

#[test]
fn locked_shape_keeps_its_position_across_reruns() {
    let pipeline = CamPipeline::new(CamConfig::default());
    let mut workpiece = pipeline.process(&routing_drawing()).unwrap();

    // Lock the far shape into the slot the first optimization gave it.
    let locked_nr = workpiece.layers[0].shapes[workpiece.layers[0].exp_order[1]];
    workpiece.set_shape_locked(locked_nr, true).unwrap();
    let locked_pos = workpiece.layers[0]
        .exp_order
        .iter()
        .position(|&idx| workpiece.layers[0].shapes[idx] == locked_nr)
        .unwrap();

    for _ in 0..3 {
        pipeline.optimize(&mut workpiece);
        let pos = workpiece.layers[0]
            .exp_order
            .iter()
            .position(|&idx| workpiece.layers[0].shapes[idx] == locked_nr)
            .unwrap();
        assert_eq!(pos, locked_pos);
    }
}

#[test]
fn start_reference_carries_across_layers() {
    let mut drawing = Drawing::new();
    // Layer 0: one line ending at (10, 0).
    push_open_line(&mut drawing, 0, (0.0, 0.0), (10.0, 0.0));
    // Layer 1: two lines; the one at x=10 is nearest to the previous exit.
    push_open_line(&mut drawing, 1, (0.0, 1.0), (0.0, 2.0));
    push_open_line(&mut drawing, 1, (10.0, 1.0), (10.0, 2.0));

    let pipeline = CamPipeline::new(CamConfig::default().with_start_position(0.0, 0.0));
    let workpiece = pipeline.process(&drawing).unwrap();

    assert_eq!(workpiece.layers[1].nr, 1);
    assert_eq!(workpiece.layers[1].exp_order, vec![1, 0]);
}

#[test]
fn export_plan_emits_layers_in_numeric_order() {
    let mut drawing = Drawing::new();
    // Insertion order deliberately puts layer 3 before layer 1.
    push_open_line(&mut drawing, 3, (0.0, 0.0), (1.0, 0.0));
    push_open_line(&mut drawing, 1, (2.0, 0.0), (3.0, 0.0));

    let pipeline = CamPipeline::new(CamConfig::default());
    let mut workpiece = pipeline.process(&drawing).unwrap();
    let plan = pipeline.export_plan(&mut workpiece);

    let layer_nrs: Vec<usize> = plan.iter().map(|step| step.layer_nr).collect();
    assert_eq!(layer_nrs, vec![1, 3]);
}

#[test]
fn export_plan_never_emits_disabled_shapes() {
    let pipeline = CamPipeline::new(CamConfig::default());
    let mut workpiece = pipeline.process(&routing_drawing()).unwrap();
    workpiece.set_shape_disabled(1, true).unwrap();
    pipeline.optimize(&mut workpiece);

    let plan = pipeline.export_plan(&mut workpiece);
    assert_eq!(plan.len(), 2);
    assert!(plan.iter().all(|step| step.shape_nr != 1));
    // The disabled shape still shows up in the complete order.
    assert!(workpiece.layers[0].exp_order_complete.contains(&1));
}

#[test]
fn closed_shape_enters_nearest_previous_exit() {
    let mut drawing = Drawing::new();
    // An open approach line ending near the rectangle's far corner.
    push_open_line(&mut drawing, 0, (0.0, 0.0), (4.1, 2.9));
    let start = drawing.entities.geo.len();
    for (a, b) in [
        ((0.0, 0.0), (4.0, 0.0)),
        ((4.0, 0.0), (4.0, 3.0)),
        ((4.0, 3.0), (0.0, 3.0)),
        ((0.0, 3.0), (0.0, 0.0)),
    ] {
        drawing
            .entities
            .geo
            .push(EntityGeo::chain(0, vec![line(a, b)]));
    }
    drawing.entities.cont.push(Contour::new(
        true,
        (start..start + 4).map(|i| (i, false)).collect(),
    ));

    let pipeline = CamPipeline::new(CamConfig::default());
    let mut workpiece = pipeline.process(&drawing).unwrap();
    let plan = pipeline.export_plan(&mut workpiece);

    let rect_step = plan
        .iter()
        .find(|step| workpiece.shape(step.shape_nr).unwrap().closed)
        .unwrap();
    // Entry lands on the corner nearest (4.1, 2.9).
    assert!(rect_step
        .start_move
        .entry
        .distance_to(&Point::new(4.0, 3.0))
        < 1e-9);
    assert_eq!(rect_step.start_move.exit, rect_step.start_move.entry);
}

#[test]
fn lead_in_is_synthesized_when_configured() {
    let pipeline = CamPipeline::new(
        CamConfig::default().with_lead_in(2.0, std::f64::consts::FRAC_PI_4),
    );
    let mut workpiece = pipeline.process(&routing_drawing()).unwrap();
    let plan = pipeline.export_plan(&mut workpiece);
    for step in &plan {
        let lead = step.start_move.lead_in.as_ref().expect("lead-in expected");
        assert!(lead.end().distance_to(&step.start_move.entry) < 1e-9);
        assert!((lead.length() - 2.0).abs() < 1e-9);
    }
}

#[test]
fn empty_drawing_yields_empty_workpiece() {
    let pipeline = CamPipeline::new(CamConfig::default());
    let mut workpiece = pipeline.process(&Drawing::new()).unwrap();
    assert!(workpiece.shapes.is_empty());
    assert!(workpiece.layers.is_empty());
    assert!(pipeline.export_plan(&mut workpiece).is_empty());
}

#[test]
fn repeated_processing_is_deterministic() {
    let pipeline = CamPipeline::new(CamConfig::default());
    let first = pipeline.process(&routing_drawing()).unwrap();
    let second = pipeline.process(&routing_drawing()).unwrap();
    assert_eq!(first, second);
}
