use crate::core::analysis::backend::GraphBackend;
use crate::core::index::kdtree::SpatialIndex;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use crate::core::utils::geometry;
use crate::engine::config::LayoutConfig;
use crate::engine::state::{LayoutState, is_placed, planar};
use nalgebra::{Point2, Vector2};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const STRETCH_STIFFNESS: f64 = 0.4;
const BEND_STIFFNESS: f64 = 0.15;
const REPULSION_STIFFNESS: f64 = 0.5;
const MAX_STEP_FACTOR: f64 = 0.25;
const CHAIN_ANGLE_DEGREES: f64 = 120.0;

/// Bounded steepest-descent cleanup over the freshly placed vertices.
///
/// Three local terms: bonds relax toward the configured length, the angle
/// at a two-neighbor chain atom opens toward 120 degrees, and close
/// non-bonded pairs push apart. Ring members move at a reduced rate so
/// polygons and template drawings keep their shape. Vertices placed before
/// this invocation contribute forces but never move.
pub(crate) fn refine(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) {
    let movable: Vec<VertexId> = component
        .iter()
        .copied()
        .filter(|vertex| state.newly_placed.contains(vertex) && is_placed(graph, *vertex))
        .collect();
    if movable.is_empty() {
        return;
    }
    let members: HashSet<VertexId> = component.iter().copied().collect();
    let max_step = MAX_STEP_FACTOR * config.bond_length;

    for iteration in 0..config.refinement_iterations {
        let mut forces: HashMap<VertexId, Vector2<f64>> = HashMap::new();
        accumulate_stretch(graph, &members, config, &mut forces);
        accumulate_bend(graph, state, component, config, &mut forces);
        accumulate_repulsion(graph, component, config, &mut forces);

        let mut largest = 0.0_f64;
        for &vertex in &movable {
            let mut step = forces.get(&vertex).copied().unwrap_or_else(Vector2::zeros);
            if state.is_ring_vertex(vertex) {
                step *= config.ring_force_multiplier;
            }
            let magnitude = step.norm();
            if magnitude > max_step {
                step *= max_step / magnitude;
            }
            if magnitude > 0.0 {
                let target = planar(graph, vertex) + step;
                state.place(graph, vertex, target);
            }
            largest = largest.max(magnitude.min(max_step));
        }
        if largest < config.convergence_threshold() {
            debug!(iteration, "Refinement converged.");
            return;
        }
    }
}

fn accumulate_stretch(
    graph: &MolecularGraph,
    members: &HashSet<VertexId>,
    config: &LayoutConfig,
    forces: &mut HashMap<VertexId, Vector2<f64>>,
) {
    for (_, vertex1_id, vertex2_id) in graph.live_edges() {
        if !members.contains(&vertex1_id)
            || !is_placed(graph, vertex1_id)
            || !is_placed(graph, vertex2_id)
        {
            continue;
        }
        let p1 = planar(graph, vertex1_id);
        let p2 = planar(graph, vertex2_id);
        let unit = geometry::direction_or_x(&p1, &p2);
        let correction = ((p2 - p1).norm() - config.bond_length) * STRETCH_STIFFNESS * 0.5;
        *forces.entry(vertex1_id).or_insert_with(Vector2::zeros) += unit * correction;
        *forces.entry(vertex2_id).or_insert_with(Vector2::zeros) -= unit * correction;
    }
}

fn accumulate_bend(
    graph: &MolecularGraph,
    state: &LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
    forces: &mut HashMap<VertexId, Vector2<f64>>,
) {
    let target = CHAIN_ANGLE_DEGREES.to_radians();
    for &center in component {
        if state.is_ring_vertex(center) || !is_placed(graph, center) {
            continue;
        }
        let placed_neighbors: Vec<VertexId> = graph
            .neighbors(center)
            .unwrap_or(&[])
            .iter()
            .map(|&(neighbor, _)| neighbor)
            .filter(|&neighbor| is_placed(graph, neighbor))
            .collect();
        let (left, right) = match placed_neighbors[..] {
            [left, right] => (left, right),
            _ => continue,
        };

        let center_position = planar(graph, center);
        let u1 = geometry::direction_or_x(&center_position, &planar(graph, left));
        let u2 = geometry::direction_or_x(&center_position, &planar(graph, right));
        let delta = u1.dot(&u2).clamp(-1.0, 1.0).acos() - target;
        if delta.abs() < 1e-12 {
            continue;
        }
        let pull = delta * BEND_STIFFNESS * config.bond_length;
        *forces.entry(left).or_insert_with(Vector2::zeros) += in_plane_toward(&u1, &u2) * pull;
        *forces.entry(right).or_insert_with(Vector2::zeros) += in_plane_toward(&u2, &u1) * pull;
    }
}

/// Unit vector perpendicular to `from`, pointing toward `toward`; moving a
/// neighbor along it closes the angle between the two directions.
fn in_plane_toward(from: &Vector2<f64>, toward: &Vector2<f64>) -> Vector2<f64> {
    let projected = toward - from * from.dot(toward);
    if projected.norm_squared() < 1e-12 {
        geometry::perpendicular(from)
    } else {
        projected.normalize()
    }
}

fn accumulate_repulsion(
    graph: &MolecularGraph,
    component: &[VertexId],
    config: &LayoutConfig,
    forces: &mut HashMap<VertexId, Vector2<f64>>,
) {
    let placed: Vec<VertexId> = component
        .iter()
        .copied()
        .filter(|&vertex| is_placed(graph, vertex))
        .collect();
    let positions: Vec<Point2<f64>> = placed.iter().map(|&vertex| planar(graph, vertex)).collect();
    let index = SpatialIndex::build(positions);
    let cutoff = config.repulsion_cutoff();

    for (i, j) in index.query_pairs(cutoff) {
        let a = placed[i];
        let b = placed[j];
        if graph.edge_between(a, b).is_some() {
            continue;
        }
        let pa = planar(graph, a);
        let pb = planar(graph, b);
        let overlap = cutoff - (pb - pa).norm();
        if overlap <= 0.0 {
            continue;
        }
        let unit = geometry::direction_or_x(&pa, &pb);
        let push = overlap * REPULSION_STIFFNESS * 0.5;
        *forces.entry(a).or_insert_with(Vector2::zeros) -= unit * push;
        *forces.entry(b).or_insert_with(Vector2::zeros) += unit * push;
    }
}
