//! Tests for layout and canvas fitting.

use super::{MAP_HEIGHT, MAP_WIDTH, RawPos, compute_layout, fit_to_canvas};
use crate::dot::parse;

#[test]
fn fit_computes_documented_formula() {
    let raw = vec![RawPos { x: 10.0, y: 10.0 }, RawPos { x: 20.0, y: 20.0 }];
    let fitted = fit_to_canvas(&raw, MAP_WIDTH, MAP_HEIGHT);

    // x' = 10 * 1920 / 20 * 0.65 - 10 * 0.1 = 623
    // y' = (1280 - 10 * 1280 / 20) * 0.65 + 10 * 0.1 = 417
    assert_eq!(fitted[0], (623, 417));
    // Max-coordinate node: x' = 1920 * 0.65 - 2, y' = 0 + 2.
    assert_eq!(fitted[1], (1246, 2));
}

#[test]
fn fit_keeps_positions_inside_canvas() {
    let raw: Vec<RawPos> = (0..12)
        .map(|i| RawPos { x: f64::from(i) * 37.5, y: f64::from(i) * 21.25 })
        .collect();
    for (x, y) in fit_to_canvas(&raw, MAP_WIDTH, MAP_HEIGHT) {
        assert!((0..=i64::from(MAP_WIDTH)).contains(&x));
        assert!((0..=i64::from(MAP_HEIGHT)).contains(&y));
    }
}

#[test]
fn fit_flips_vertical_axis() {
    let raw = vec![RawPos { x: 5.0, y: 0.0 }, RawPos { x: 5.0, y: 100.0 }];
    let fitted = fit_to_canvas(&raw, MAP_WIDTH, MAP_HEIGHT);
    // Larger raw y means closer to the top of the canvas (smaller y').
    assert!(fitted[1].1 < fitted[0].1);
}

#[test]
fn fit_single_node_lands_on_canvas_midpoint() {
    let raw = vec![RawPos { x: 0.0, y: 0.0 }];
    assert_eq!(fit_to_canvas(&raw, MAP_WIDTH, MAP_HEIGHT), vec![(960, 640)]);
}

#[test]
fn fit_degenerate_axis_uses_midpoint_for_that_axis_only() {
    let raw = vec![RawPos { x: 0.0, y: 0.0 }, RawPos { x: 0.0, y: 10.0 }];
    let fitted = fit_to_canvas(&raw, MAP_WIDTH, MAP_HEIGHT);
    assert_eq!(fitted[0].0, 960);
    assert_eq!(fitted[1].0, 960);
    // y axis still follows the formula: (1280 - 0) * 0.65 and (1280 - 1280) * 0.65 + 1.
    assert_eq!(fitted[0].1, 832);
    assert_eq!(fitted[1].1, 1);
}

#[test]
fn fit_empty_input_is_empty() {
    assert!(fit_to_canvas(&[], MAP_WIDTH, MAP_HEIGHT).is_empty());
}

#[test]
fn layout_produces_one_position_per_node() {
    let graph = parse("digraph { a -> b; b -> c; c -> a; d; }").unwrap();
    let raw = compute_layout(&graph);
    assert_eq!(raw.len(), 4);
}

#[test]
fn layout_is_shifted_to_origin() {
    let graph = parse("digraph { a -> b -> c; }").unwrap();
    let raw = compute_layout(&graph);
    let min_x = raw.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = raw.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    assert!(min_x.abs() < 1e-6);
    assert!(min_y.abs() < 1e-6);
    assert!(raw.iter().all(|p| p.x >= 0.0 && p.y >= 0.0));
}

#[test]
fn layout_is_deterministic() {
    let graph = parse("digraph { a -> b; b -> c; a -> c; }").unwrap();
    let first = compute_layout(&graph);
    let second = compute_layout(&graph);
    assert_eq!(first, second);
}

#[test]
fn layout_separates_nodes() {
    let graph = parse("digraph { a -> b; }").unwrap();
    let raw = compute_layout(&graph);
    let dx = raw[0].x - raw[1].x;
    let dy = raw[0].y - raw[1].y;
    assert!(dx.hypot(dy) > 1.0, "nodes should not collapse onto each other");
}

#[test]
fn layout_of_empty_graph_is_empty() {
    let graph = parse("digraph {}").unwrap();
    assert!(compute_layout(&graph).is_empty());
}

#[test]
fn layout_tolerates_self_loops() {
    let graph = parse("digraph { a -> a; a -> b; }").unwrap();
    let raw = compute_layout(&graph);
    assert_eq!(raw.len(), 2);
    assert!(raw.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}
