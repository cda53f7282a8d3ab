//! Layout — force-directed node placement and canvas fitting.
//!
//! Placement itself is delegated to the `force_graph` simulation; this
//! module owns the seeding, the fixed-step run, and the rescale of raw
//! simulation coordinates into the map canvas.

use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::dot::DotGraph;

/// Published map canvas width in pixels.
pub const MAP_WIDTH: u32 = 1920;
/// Published map canvas height in pixels.
pub const MAP_HEIGHT: u32 = 1280;

const SEED_RADIUS: f32 = 400.0;
const SIMULATION_STEPS: u32 = 300;
const SIMULATION_DT: f32 = 0.035;

/// A raw layout position, bottom-left origin, both axes >= 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPos {
    pub x: f64,
    pub y: f64,
}

/// Run the force simulation over the graph and return one raw position per
/// node, in node order.
///
/// Nodes are seeded on a circle in enumeration order so layouts are
/// reproducible run to run. After the simulation settles, positions are
/// translated so the minimum x and y are zero.
#[must_use]
pub fn compute_layout(graph: &DotGraph) -> Vec<RawPos> {
    if graph.nodes.is_empty() {
        return Vec::new();
    }

    let mut sim = ForceGraph::<(), ()>::new(SimulationParameters {
        force_charge: 150.0,
        force_spring: 0.05,
        force_max: 100.0,
        node_speed: 500.0,
        damping_factor: 0.95,
    });

    let count = graph.nodes.len();
    let mut handles: Vec<DefaultNodeIdx> = Vec::with_capacity(count);
    let mut by_id: HashMap<&str, DefaultNodeIdx> = HashMap::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let angle = i as f32 * std::f32::consts::TAU / count as f32;
        let idx = sim.add_node(NodeData {
            x: SEED_RADIUS * angle.cos(),
            y: SEED_RADIUS * angle.sin(),
            mass: 10.0,
            is_anchor: false,
            user_data: (),
        });
        handles.push(idx);
        by_id.insert(node.id.as_str(), idx);
    }

    for edge in &graph.edges {
        let (Some(&a), Some(&b)) = (by_id.get(edge.from.as_str()), by_id.get(edge.to.as_str())) else {
            continue;
        };
        // Self-loops contribute no spring force and would only distort the run.
        if a != b {
            sim.add_edge(a, b, EdgeData::default());
        }
    }

    for _ in 0..SIMULATION_STEPS {
        sim.update(SIMULATION_DT);
    }

    let mut coords: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
    sim.visit_nodes(|node| {
        coords.insert(node.index(), (f64::from(node.x()), f64::from(node.y())));
    });

    let mut raw: Vec<RawPos> = handles
        .iter()
        .map(|idx| {
            let (x, y) = coords[idx];
            RawPos { x, y }
        })
        .collect();

    let min_x = raw.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = raw.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    for p in &mut raw {
        p.x -= min_x;
        p.y -= min_y;
    }

    raw
}

/// Rescale raw layout positions into integer canvas coordinates.
///
/// Per axis this blends a proportional scale with a small linear term
/// (65/35 weighting) and flips the vertical axis, since the layout origin
/// is bottom-left while the map origin is top-left:
///
/// ```text
/// x' = rawX * W / maxX * 0.65 - rawX * 0.1
/// y' = (H - rawY * H / maxY) * 0.65 + rawY * 0.1
/// ```
///
/// An axis with zero spread (single node, or all nodes sharing that
/// coordinate) places every node at the canvas midpoint of that axis
/// instead of dividing by zero.
#[must_use]
pub fn fit_to_canvas(raw: &[RawPos], width: u32, height: u32) -> Vec<(i64, i64)> {
    let w = f64::from(width);
    let h = f64::from(height);
    let max_x = raw.iter().map(|p| p.x).fold(0.0_f64, f64::max);
    let max_y = raw.iter().map(|p| p.y).fold(0.0_f64, f64::max);

    raw.iter()
        .map(|p| {
            #[allow(clippy::cast_possible_truncation)]
            let x = if max_x > 0.0 {
                (p.x * w / max_x * 0.65 - p.x * 0.1) as i64
            } else {
                (w / 2.0) as i64
            };
            #[allow(clippy::cast_possible_truncation)]
            let y = if max_y > 0.0 {
                ((h - p.y * h / max_y) * 0.65 + p.y * 0.1) as i64
            } else {
                (h / 2.0) as i64
            };
            (x, y)
        })
        .collect()
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
