use crate::core::analysis::components;
use crate::core::index::kdtree::SpatialIndex;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use crate::core::utils::geometry;
use crate::engine::config::LayoutConfig;
use crate::engine::state::{LayoutState, is_placed, planar};
use nalgebra::Point2;
use std::collections::HashSet;
use tracing::debug;

const NUDGE_FACTOR: f64 = 0.3;
const MAX_SWEEPS: usize = 4;

/// Pulls apart non-bonded vertex pairs that ended up closer than the
/// configured minimum separation.
///
/// For each collision the preferred move is flipping one colliding branch
/// across the bridge bond that roots it, walking from the collider toward
/// its placement root until a flip actually separates the pair. When no
/// flip helps, the collider is nudged sideways off its bond axis. Ring
/// members and vertices placed before this invocation are never nudged.
pub(crate) fn resolve_collisions(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) {
    for _ in 0..MAX_SWEEPS {
        let collisions = find_collisions(graph, state, component, config);
        if collisions.is_empty() {
            return;
        }
        let mut resolved_any = false;
        for (a, b) in collisions {
            // An earlier resolution in this sweep may have fixed the pair
            if (planar(graph, a) - planar(graph, b)).norm() >= config.min_separation() {
                continue;
            }
            if resolve_pair(graph, state, a, b, config) {
                resolved_any = true;
            }
        }
        if !resolved_any {
            debug!("Collision sweep made no progress; leaving the remainder in place.");
            return;
        }
    }
}

/// Collects non-bonded placed pairs closer than the minimum separation.
/// Pairs where neither vertex was placed by this invocation are not ours
/// to move and are skipped.
pub(crate) fn find_collisions(
    graph: &MolecularGraph,
    state: &LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) -> Vec<(VertexId, VertexId)> {
    let placed: Vec<VertexId> = component
        .iter()
        .copied()
        .filter(|&vertex| is_placed(graph, vertex))
        .collect();
    let positions: Vec<Point2<f64>> = placed.iter().map(|&vertex| planar(graph, vertex)).collect();
    let index = SpatialIndex::build(positions);

    index
        .query_pairs(config.min_separation())
        .into_iter()
        .map(|(i, j)| (placed[i], placed[j]))
        .filter(|&(a, b)| graph.edge_between(a, b).is_none())
        .filter(|&(a, b)| state.newly_placed.contains(&a) || state.newly_placed.contains(&b))
        .collect()
}

fn resolve_pair(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    a: VertexId,
    b: VertexId,
    config: &LayoutConfig,
) -> bool {
    if try_flip(graph, state, a, b, config) || try_flip(graph, state, b, a, config) {
        return true;
    }
    try_nudge(graph, state, a, b, config) || try_nudge(graph, state, b, a, config)
}

/// Walks the collider's placement ancestry and attempts to mirror the
/// branch hanging off each ancestor across that ancestor's own bond.
fn try_flip(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    victim: VertexId,
    other: VertexId,
    config: &LayoutConfig,
) -> bool {
    let mut child = victim;
    while let Some(&pivot) = state.placement_parent.get(&child) {
        if flip_branch_at(graph, state, pivot, victim, other, config.min_separation()) {
            return true;
        }
        child = pivot;
    }
    false
}

/// Mirrors the branch rooted at `pivot` across the bond joining `pivot`
/// to its own placement parent. The bond must be a bridge so the branch
/// is a clean cut, and the branch must be wholly owned by this
/// invocation. Kept only when it separates the colliding pair.
fn flip_branch_at(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    pivot: VertexId,
    victim: VertexId,
    other: VertexId,
    minimum: f64,
) -> bool {
    let Some(&axis_end) = state.placement_parent.get(&pivot) else {
        return false;
    };
    let Some(edge_id) = graph.edge_between(pivot, axis_end) else {
        return false;
    };
    if !graph.is_edge_a_bridge_cached(edge_id) {
        return false;
    }

    let branch = components::component_of(graph, pivot, Some(edge_id));
    let branch_set: HashSet<VertexId> = branch.iter().copied().collect();
    if branch_set.contains(&other)
        || !branch.iter().all(|vertex| state.newly_placed.contains(vertex))
    {
        return false;
    }

    let line_a = planar(graph, pivot);
    let line_b = planar(graph, axis_end);
    reflect_branch(graph, state, &branch, &line_a, &line_b);
    if (planar(graph, victim) - planar(graph, other)).norm() >= minimum {
        debug!(?pivot, "Flipped a colliding branch across its root bond.");
        return true;
    }
    // Reflection is its own inverse, so this undoes the attempt
    reflect_branch(graph, state, &branch, &line_a, &line_b);
    false
}

fn reflect_branch(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    branch: &[VertexId],
    line_a: &Point2<f64>,
    line_b: &Point2<f64>,
) {
    for &vertex in branch {
        let mirrored = geometry::reflect_across_line(&planar(graph, vertex), line_a, line_b);
        state.place(graph, vertex, mirrored);
    }
}

/// Moves the collider sideways off its bond axis, toward the side that
/// increases the pair distance. Parentless colliders back straight away
/// from the other vertex instead.
fn try_nudge(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    victim: VertexId,
    other: VertexId,
    config: &LayoutConfig,
) -> bool {
    if !state.newly_placed.contains(&victim) || state.is_ring_vertex(victim) {
        return false;
    }
    let victim_position = planar(graph, victim);
    let other_position = planar(graph, other);

    let displacement = match state.placement_parent.get(&victim) {
        Some(&parent) => {
            let axis = geometry::direction_or_x(&victim_position, &planar(graph, parent));
            let mut sideways = geometry::perpendicular(&axis);
            if sideways.dot(&(victim_position - other_position)) < 0.0 {
                sideways = -sideways;
            }
            sideways
        }
        None => geometry::direction_or_x(&other_position, &victim_position),
    };

    state.place(
        graph,
        victim,
        victim_position + displacement * (NUDGE_FACTOR * config.bond_length),
    );
    debug!(?victim, "Nudged a colliding vertex off its bond axis.");
    true
}
