use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use crate::core::utils::geometry;
use crate::engine::config::LayoutConfig;
use crate::engine::state::{LayoutState, RingSystem, is_placed, planar};
use crate::engine::templates;
use nalgebra::{Point2, Rotation2, Vector2};
use std::collections::HashSet;
use std::f64::consts::{PI, TAU};
use tracing::debug;

/// Lays out the ring systems of one connected component.
///
/// Systems holding pre-placed vertices are completed around them; on a
/// fully unplaced component the first system seeds the layout at the
/// origin. Every system that gains an anchor (a placed vertex, or a placed
/// neighbor just outside it) is drawn in the same sweep. Systems reachable
/// only through unplaced chain atoms are left alone here; chain growth
/// anchors them on contact.
pub(crate) fn place_ring_systems(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) {
    let members: HashSet<VertexId> = component.iter().copied().collect();
    let local_systems: Vec<usize> = (0..state.systems.len())
        .filter(|&index| members.contains(&state.systems[index].vertices[0]))
        .collect();
    if local_systems.is_empty() {
        return;
    }

    if !component.iter().any(|&vertex| is_placed(graph, vertex)) {
        ensure_system_placed(graph, state, local_systems[0], config);
    }

    loop {
        let mut progressed = false;
        for &system_index in &local_systems {
            if system_fully_placed(graph, state, system_index)
                || !has_anchor(graph, &state.systems[system_index])
            {
                continue;
            }
            ensure_system_placed(graph, state, system_index, config);
            progressed = true;
        }
        if !progressed {
            return;
        }
    }
}

/// Places whatever remains unplaced of one ring system.
///
/// A fully unplaced system is drawn fresh, from a template drawing when
/// one matches and from regular polygons otherwise, then moved onto its
/// placed external neighbor if it has one. A partially placed system keeps
/// its placed vertices fixed and completes rings around them.
pub(crate) fn ensure_system_placed(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    system_index: usize,
    config: &LayoutConfig,
) {
    let system = state.systems[system_index].clone();
    if system.vertices.iter().all(|&vertex| is_placed(graph, vertex)) {
        return;
    }

    if system.vertices.iter().any(|&vertex| is_placed(graph, vertex)) {
        expand_polygons(graph, state, &system, config);
        return;
    }

    if let Some((template, assignment)) = templates::match_system(graph, &system.vertices) {
        debug!(template = template.name, "Ring system matched a template drawing.");
        for (index, &vertex_id) in assignment.iter().enumerate() {
            let (x, y) = template.coordinates[index];
            let position = Point2::new(x * config.bond_length, y * config.bond_length);
            state.place(graph, vertex_id, position);
        }
    } else {
        expand_polygons(graph, state, &system, config);
    }
    anchor_fresh_system(graph, state, &system, config);
}

fn system_fully_placed(graph: &MolecularGraph, state: &LayoutState, system_index: usize) -> bool {
    state.systems[system_index]
        .vertices
        .iter()
        .all(|&vertex| is_placed(graph, vertex))
}

fn has_anchor(graph: &MolecularGraph, system: &RingSystem) -> bool {
    system.vertices.iter().any(|&vertex| {
        is_placed(graph, vertex)
            || graph
                .neighbors(vertex)
                .unwrap_or(&[])
                .iter()
                .any(|&(neighbor, _)| {
                    !system.vertex_set.contains(&neighbor) && is_placed(graph, neighbor)
                })
    })
}

/// Draws the system ring by ring, most-anchored ring first, so every ring
/// after the first expands outward across an already drawn edge or vertex.
fn expand_polygons(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    system: &RingSystem,
    config: &LayoutConfig,
) {
    let mut remaining = system.rings.clone();
    while !remaining.is_empty() {
        let next = remaining.iter().enumerate().max_by_key(|&(ref position, &ring_index)| {
            let anchored = state.rings[ring_index]
                .iter()
                .filter(|&&vertex| is_placed(graph, vertex))
                .count();
            (anchored, std::cmp::Reverse(*position))
        });
        let Some((position, _)) = next else {
            return;
        };
        let ring_index = remaining.remove(position);
        let ring = state.rings[ring_index].clone();
        place_ring_polygon(graph, state, &ring, config);
    }
}

fn place_ring_polygon(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    ring: &[VertexId],
    config: &LayoutConfig,
) {
    let count = ring.len();
    if count < 3 {
        return;
    }
    let radius = geometry::polygon_circumradius(count, config.bond_length);
    let anchors: Vec<usize> = (0..count)
        .filter(|&position| is_placed(graph, ring[position]))
        .collect();

    if anchors.is_empty() {
        for (index, &vertex_id) in ring.iter().enumerate() {
            let angle = PI / 2.0 + TAU * index as f64 / count as f64;
            let position = Point2::origin() + geometry::unit_from_angle(angle) * radius;
            state.place(graph, vertex_id, position);
        }
        return;
    }

    if let Some(first) = adjacent_anchor_pair(&anchors, count) {
        complete_ring_from_edge(graph, state, ring, first, radius);
        return;
    }
    complete_ring_from_vertex(graph, state, ring, anchors[0], radius);
}

/// Finds a cyclically adjacent pair of placed vertices, returning the
/// position of the first one.
fn adjacent_anchor_pair(anchors: &[usize], count: usize) -> Option<usize> {
    let placed: HashSet<usize> = anchors.iter().copied().collect();
    (0..count).find(|&position| placed.contains(&position) && placed.contains(&((position + 1) % count)))
}

/// Completes a ring around one fixed vertex, typically a spiro junction.
/// The ring's center sits in the widest free direction seen from the
/// anchor, so the new polygon swings away from whatever is already drawn.
fn complete_ring_from_vertex(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    ring: &[VertexId],
    anchor_position: usize,
    radius: f64,
) {
    let count = ring.len();
    let anchor_id = ring[anchor_position];
    let anchor = planar(graph, anchor_id);

    let occupied: Vec<f64> = graph
        .neighbors(anchor_id)
        .unwrap_or(&[])
        .iter()
        .filter(|(neighbor, _)| is_placed(graph, *neighbor))
        .map(|(neighbor, _)| geometry::angle_of(&(planar(graph, *neighbor) - anchor)))
        .collect();
    let (gap_start, gap_size) = geometry::largest_angular_gap(&occupied);
    let center = anchor + geometry::unit_from_angle(gap_start + gap_size / 2.0) * radius;

    let base = geometry::angle_of(&(anchor - center));
    for offset in 1..count {
        let vertex_id = ring[(anchor_position + offset) % count];
        if is_placed(graph, vertex_id) {
            continue;
        }
        let angle = base + TAU * offset as f64 / count as f64;
        state.place(graph, vertex_id, center + geometry::unit_from_angle(angle) * radius);
    }
}

/// Completes a ring across one fixed edge. The two candidate centers sit
/// mirrored about the chord; the one farther from the neighboring drawn
/// material wins, so fused rings expand outward.
fn complete_ring_from_edge(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    ring: &[VertexId],
    first: usize,
    radius: f64,
) {
    let count = ring.len();
    let second = (first + 1) % count;
    let p1 = planar(graph, ring[first]);
    let p2 = planar(graph, ring[second]);

    let chord = (p2 - p1).norm();
    let height = (radius * radius - (chord / 2.0) * (chord / 2.0)).max(0.0).sqrt();
    let mid = p1 + (p2 - p1) / 2.0;
    let perpendicular = geometry::perpendicular(&geometry::direction_or_x(&p1, &p2));

    let ring_set: HashSet<VertexId> = ring.iter().copied().collect();
    let mut reference_points = Vec::new();
    for &anchor_vertex in &[ring[first], ring[second]] {
        for &(neighbor, _) in graph.neighbors(anchor_vertex).unwrap_or(&[]) {
            if !ring_set.contains(&neighbor) && is_placed(graph, neighbor) {
                reference_points.push(planar(graph, neighbor));
            }
        }
    }

    let candidate_a = mid + perpendicular * height;
    let candidate_b = mid - perpendicular * height;
    let center = if reference_points.is_empty() {
        candidate_a
    } else {
        let reference = centroid_of_points(&reference_points);
        if (candidate_a - reference).norm_squared() >= (candidate_b - reference).norm_squared() {
            candidate_a
        } else {
            candidate_b
        }
    };

    // Walk the circle in whichever direction reproduces the second anchor.
    let base = geometry::angle_of(&(p1 - center));
    let actual = geometry::angle_of(&(p2 - center));
    let step = TAU / count as f64;
    let signed_step = if angular_distance(base + step, actual) <= angular_distance(base - step, actual)
    {
        step
    } else {
        -step
    };

    for offset in 1..count {
        let vertex_id = ring[(first + offset) % count];
        if is_placed(graph, vertex_id) {
            continue;
        }
        let angle = base + signed_step * offset as f64;
        state.place(graph, vertex_id, center + geometry::unit_from_angle(angle) * radius);
    }
}

/// Moves a freshly drawn system onto its placed external neighbor: the
/// attachment vertex lands one bond length into the neighbor's widest free
/// direction, and the system spins so its bulk points away from the bond.
/// Without an external neighbor the system stays where it was drawn.
fn anchor_fresh_system(
    graph: &mut MolecularGraph,
    state: &mut LayoutState,
    system: &RingSystem,
    config: &LayoutConfig,
) {
    let mut attachment = None;
    'search: for &vertex in &system.vertices {
        for &(neighbor, _) in graph.neighbors(vertex).unwrap_or(&[]) {
            if !system.vertex_set.contains(&neighbor) && is_placed(graph, neighbor) {
                attachment = Some((vertex, neighbor));
                break 'search;
            }
        }
    }
    let Some((inner, outer)) = attachment else {
        return;
    };

    let outer_position = planar(graph, outer);
    let occupied: Vec<f64> = graph
        .neighbors(outer)
        .unwrap_or(&[])
        .iter()
        .filter(|(neighbor, _)| {
            !system.vertex_set.contains(neighbor) && is_placed(graph, *neighbor)
        })
        .map(|(neighbor, _)| geometry::angle_of(&(planar(graph, *neighbor) - outer_position)))
        .collect();
    let (gap_start, gap_size) = geometry::largest_angular_gap(&occupied);
    let target = outer_position
        + geometry::unit_from_angle(gap_start + gap_size / 2.0) * config.bond_length;

    let shift = target - planar(graph, inner);
    for &vertex in &system.vertices {
        let moved = planar(graph, vertex) + shift;
        state.place(graph, vertex, moved);
    }

    let centroid = centroid_of(graph, &system.vertices);
    let current = geometry::direction_or_x(&target, &centroid);
    let desired = geometry::direction_or_x(&outer_position, &target);
    let rotation = Rotation2::rotation_between(&current, &desired);
    for &vertex in &system.vertices {
        let spun = target + rotation * (planar(graph, vertex) - target);
        state.place(graph, vertex, spun);
    }
}

fn centroid_of(graph: &MolecularGraph, vertices: &[VertexId]) -> Point2<f64> {
    let mut sum = Vector2::zeros();
    for &vertex in vertices {
        sum += planar(graph, vertex).coords;
    }
    Point2::origin() + sum / vertices.len().max(1) as f64
}

fn centroid_of_points(points: &[Point2<f64>]) -> Point2<f64> {
    let mut sum = Vector2::zeros();
    for point in points {
        sum += point.coords;
    }
    Point2::origin() + sum / points.len().max(1) as f64
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let difference = geometry::normalize_angle(a - b);
    difference.min(TAU - difference)
}
