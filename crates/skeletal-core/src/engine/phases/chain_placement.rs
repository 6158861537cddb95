use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use crate::core::utils::geometry;
use crate::engine::config::LayoutConfig;
use crate::engine::phases::ring_placement;
use crate::engine::state::{LayoutState, is_placed, occupied_angles, planar};
use nalgebra::Point2;
use std::collections::{HashSet, VecDeque};
use std::f64::consts::TAU;

const CHAIN_TURN_DEGREES: f64 = 120.0;

/// Grows acyclic chains outward from everything already placed.
///
/// Breadth-first: each placed vertex hands positions to its unplaced
/// neighbors, which then extend the frontier. A lone continuation bends
/// away from the incoming bond by 120 degrees, alternating sides along the
/// chain; branch points share the widest free arc evenly. The frontier
/// never grows into an unplaced ring vertex one bond at a time: on contact
/// the vertex's whole ring system is placed, then walked through.
pub(crate) fn grow_chains(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) {
    let mut queue: VecDeque<VertexId> = component
        .iter()
        .copied()
        .filter(|&vertex| is_placed(graph, vertex))
        .collect();

    if queue.is_empty() {
        let seed = component
            .iter()
            .copied()
            .min_by_key(|&vertex| (graph.degree(vertex).unwrap_or(0), vertex));
        let Some(seed) = seed else {
            return;
        };
        state.place(graph, seed, Point2::origin());
        queue.push_back(seed);
    }

    let mut visited: HashSet<VertexId> = queue.iter().copied().collect();
    while let Some(vertex) = queue.pop_front() {
        let adjacent: Vec<VertexId> = graph
            .neighbors(vertex)
            .unwrap_or(&[])
            .iter()
            .map(|&(neighbor, _)| neighbor)
            .collect();

        for &neighbor in &adjacent {
            if is_placed(graph, neighbor) || !state.is_ring_vertex(neighbor) {
                continue;
            }
            let systems = state
                .system_of_vertex
                .get(&neighbor)
                .cloned()
                .unwrap_or_default();
            for system_index in systems {
                ring_placement::ensure_system_placed(graph, state, system_index, config);
            }
        }

        let unplaced: Vec<VertexId> = adjacent
            .iter()
            .copied()
            .filter(|&neighbor| !is_placed(graph, neighbor))
            .collect();
        if !unplaced.is_empty() {
            place_neighbors(graph, state, vertex, &unplaced, config);
        }

        for &neighbor in &adjacent {
            if is_placed(graph, neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
}

/// Positions the unplaced neighbors of one frontier vertex.
fn place_neighbors(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    vertex: VertexId,
    unplaced: &[VertexId],
    config: &LayoutConfig,
) {
    let origin = planar(graph, vertex);

    // A single continuation of a chain zigzags off the incoming bond
    if let (&[child], Some(&parent)) = (unplaced, state.placement_parent.get(&vertex)) {
        let backward = geometry::direction_or_x(&origin, &planar(graph, parent));
        let sign = -state.turn_sign.get(&vertex).copied().unwrap_or(1.0);
        let direction = geometry::rotate(&backward, sign * CHAIN_TURN_DEGREES);
        state.place(graph, child, origin + direction * config.bond_length);
        state.placement_parent.insert(child, vertex);
        state.turn_sign.insert(child, sign);
        return;
    }

    let occupied = occupied_angles(graph, vertex);
    let (gap_start, gap_size) = geometry::largest_angular_gap(&occupied);
    let count = unplaced.len();
    for (index, &child) in unplaced.iter().enumerate() {
        let angle = if occupied.is_empty() {
            TAU * index as f64 / count as f64
        } else {
            gap_start + gap_size * (index as f64 + 1.0) / (count as f64 + 1.0)
        };
        let position = origin + geometry::unit_from_angle(angle) * config.bond_length;
        state.place(graph, child, position);
        state.placement_parent.insert(child, vertex);
    }
}
