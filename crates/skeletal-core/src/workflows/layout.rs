use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::VertexId;
use crate::core::utils::geometry::{self, Rect};
use crate::engine::config::{DEFAULT_BOND_LENGTH, LayoutConfig};
use crate::engine::phases::{chain_placement, collision, refinement, ring_placement};
use crate::engine::state::{self, LayoutState};
use nalgebra::{Point2, Vector2};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Generates 2D coordinates for every unplaced vertex of the graph.
///
/// Vertices that already carry coordinates are kept as-is and the new
/// drawing grows around them; pass `force` to discard them and lay the
/// whole graph out fresh. A non-finite or non-positive `bond_length`
/// falls back to [`DEFAULT_BOND_LENGTH`].
pub fn calculate_coords(graph: &mut MolecularGraph, bond_length: f64, force: bool) {
    let bond_length = if bond_length.is_finite() && bond_length > 0.0 {
        bond_length
    } else {
        warn!(bond_length, "Invalid bond length, using the default.");
        DEFAULT_BOND_LENGTH
    };
    let config = LayoutConfig {
        bond_length,
        ..LayoutConfig::default()
    };
    run(graph, &config, force);
}

/// Same as [`calculate_coords`], with every generator parameter exposed.
pub fn calculate_coords_with_config(
    graph: &mut MolecularGraph,
    config: &LayoutConfig,
    force: bool,
) {
    run(graph, config, force);
}

/// Lays out a batch of independent graphs with a shared configuration.
pub fn layout_all(graphs: &mut [MolecularGraph], config: &LayoutConfig, force: bool) {
    #[cfg(not(feature = "parallel"))]
    let iterator = graphs.iter_mut();

    #[cfg(feature = "parallel")]
    let iterator = graphs.par_iter_mut();

    iterator.for_each(|graph| run(graph, config, force));
}

#[instrument(skip_all, name = "coordinate_generation")]
fn run(graph: &mut MolecularGraph, config: &LayoutConfig, force: bool) {
    if force {
        graph.clear_placed_flags();
    }
    if graph.vertex_count() == 0 {
        return;
    }

    let components = graph.connected_components();
    let mut layout_state = LayoutState::analyze(graph);
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        components = components.len(),
        rings = layout_state.rings.len(),
        "Starting coordinate generation."
    );

    for component in &components {
        layout_component(graph, &mut layout_state, component, config);
    }

    pack_components(graph, &layout_state, &components, config);

    debug!(
        placed = layout_state.newly_placed.len(),
        "Coordinate generation finished."
    );
}

fn layout_component(
    graph: &mut MolecularGraph,
    layout_state: &mut LayoutState,
    component: &[VertexId],
    config: &LayoutConfig,
) {
    if component
        .iter()
        .all(|&vertex| state::is_placed(graph, vertex))
    {
        return;
    }
    if let [lone] = component {
        layout_state.place(graph, *lone, Point2::origin());
        return;
    }

    // === Phase 1: Ring systems ===
    ring_placement::place_ring_systems(graph, layout_state, component, config);

    // === Phase 2: Chain growth ===
    chain_placement::grow_chains(graph, layout_state, component, config);

    // === Phase 3: Collision resolution ===
    collision::resolve_collisions(graph, layout_state, component, config);

    // === Phase 4: Force refinement ===
    refinement::refine(graph, layout_state, component, config);
}

/// Translates the components this invocation drew into a row so their
/// bounding boxes never overlap.
///
/// Components holding pre-placed vertices stay where they are; fresh ones
/// line up to the right of them, vertically centered on the axis.
fn pack_components(
    graph: &mut MolecularGraph,
    layout_state: &LayoutState,
    components: &[Vec<VertexId>],
    config: &LayoutConfig,
) {
    if components.len() <= 1 {
        return;
    }
    let padding = config.component_padding();

    let mut anchored_edge = f64::NEG_INFINITY;
    for component in components {
        if is_fresh(layout_state, component) {
            continue;
        }
        if let Some(rect) = component_rect(graph, component) {
            anchored_edge = anchored_edge.max(rect.max.x);
        }
    }
    let mut cursor = if anchored_edge.is_finite() {
        anchored_edge + padding
    } else {
        0.0
    };

    for component in components {
        if !is_fresh(layout_state, component) {
            continue;
        }
        let Some(rect) = component_rect(graph, component) else {
            continue;
        };
        let shift = Vector2::new(cursor - rect.min.x, -rect.center().y);
        for &vertex_id in component {
            if let Some(vertex) = graph.vertex_mut(vertex_id) {
                let moved = geometry::xy(&vertex.position) + shift;
                geometry::set_xy(&mut vertex.position, moved);
            }
        }
        cursor += rect.width() + padding;
    }
}

/// A component is fresh when every vertex in it was placed by this
/// invocation; only fresh components may be moved as a whole.
fn is_fresh(layout_state: &LayoutState, component: &[VertexId]) -> bool {
    component
        .iter()
        .all(|vertex| layout_state.newly_placed.contains(vertex))
}

fn component_rect(graph: &MolecularGraph, component: &[VertexId]) -> Option<Rect> {
    Rect::from_points(component.iter().map(|&vertex| state::planar(graph, vertex)))
}
