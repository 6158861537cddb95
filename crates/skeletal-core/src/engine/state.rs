use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::{EdgeId, VertexId};
use crate::core::utils::geometry;
use nalgebra::Point2;
use std::collections::{HashMap, HashSet, VecDeque};

/// A cluster of basis rings connected through shared edges (fused and
/// bridged polycycles). Rings meeting only at a vertex (spiro junctions)
/// belong to separate systems.
#[derive(Debug, Clone)]
pub(crate) struct RingSystem {
    /// Indices into [`LayoutState::rings`], ascending.
    pub rings: Vec<usize>,
    /// Every vertex of the system, in first-seen order.
    pub vertices: Vec<VertexId>,
    pub vertex_set: HashSet<VertexId>,
}

/// Working data shared by the generator phases.
///
/// Built once per invocation from the graph's cached ring analysis and
/// discarded when the invocation returns; nothing here outlives a single
/// coordinate-generation call.
#[derive(Debug)]
pub(crate) struct LayoutState {
    /// Minimum cycle basis, each ring in cyclic traversal order.
    pub rings: Vec<Vec<VertexId>>,
    pub systems: Vec<RingSystem>,
    /// Indices into `systems` for every ring vertex; spiro junctions map
    /// to more than one.
    pub system_of_vertex: HashMap<VertexId, Vec<usize>>,
    pub ring_vertices: HashSet<VertexId>,
    pub ring_edges: HashSet<EdgeId>,
    /// Vertices placed during this invocation; later phases only ever
    /// move these.
    pub newly_placed: HashSet<VertexId>,
    /// The vertex each chain atom was placed from.
    pub placement_parent: HashMap<VertexId, VertexId>,
    /// Zigzag turn direction consumed when extending a chain; alternates
    /// along each chain.
    pub turn_sign: HashMap<VertexId, f64>,
}

impl LayoutState {
    pub fn analyze(graph: &MolecularGraph) -> Self {
        let rings = graph.smallest_independent_cycles();
        let ring_edge_lists = graph.smallest_independent_cycles_edges();

        let mut ring_vertices = HashSet::new();
        for ring in &rings {
            ring_vertices.extend(ring.iter().copied());
        }

        let mut ring_edges = HashSet::new();
        let mut edge_rings: HashMap<EdgeId, Vec<usize>> = HashMap::new();
        for (ring_index, edges) in ring_edge_lists.iter().enumerate() {
            for &edge_id in edges {
                ring_edges.insert(edge_id);
                edge_rings.entry(edge_id).or_default().push(ring_index);
            }
        }

        let mut assigned = vec![false; rings.len()];
        let mut systems = Vec::new();
        for start in 0..rings.len() {
            if assigned[start] {
                continue;
            }
            assigned[start] = true;
            let mut queue = VecDeque::from([start]);
            let mut members = Vec::new();
            while let Some(ring_index) = queue.pop_front() {
                members.push(ring_index);
                for &edge_id in &ring_edge_lists[ring_index] {
                    for &other in &edge_rings[&edge_id] {
                        if !assigned[other] {
                            assigned[other] = true;
                            queue.push_back(other);
                        }
                    }
                }
            }
            members.sort_unstable();

            let mut vertices = Vec::new();
            let mut vertex_set = HashSet::new();
            for &ring_index in &members {
                for &vertex in &rings[ring_index] {
                    if vertex_set.insert(vertex) {
                        vertices.push(vertex);
                    }
                }
            }
            systems.push(RingSystem {
                rings: members,
                vertices,
                vertex_set,
            });
        }

        let mut system_of_vertex: HashMap<VertexId, Vec<usize>> = HashMap::new();
        for (system_index, system) in systems.iter().enumerate() {
            for &vertex in &system.vertices {
                system_of_vertex.entry(vertex).or_default().push(system_index);
            }
        }

        Self {
            rings,
            systems,
            system_of_vertex,
            ring_vertices,
            ring_edges,
            newly_placed: HashSet::new(),
            placement_parent: HashMap::new(),
            turn_sign: HashMap::new(),
        }
    }

    /// Writes a planar position, raises the placed flag, and records the
    /// vertex as owned by this invocation.
    pub fn place(&mut self, graph: &mut MolecularGraph, vertex_id: VertexId, position: Point2<f64>) {
        if let Some(vertex) = graph.vertex_mut(vertex_id) {
            geometry::set_xy(&mut vertex.position, position);
            vertex.placed = true;
            self.newly_placed.insert(vertex_id);
        }
    }

    pub fn is_ring_vertex(&self, vertex_id: VertexId) -> bool {
        self.ring_vertices.contains(&vertex_id)
    }
}

/// Planar view of a vertex position; unknown IDs read as the origin.
pub(crate) fn planar(graph: &MolecularGraph, vertex_id: VertexId) -> Point2<f64> {
    graph
        .vertex(vertex_id)
        .map_or_else(Point2::origin, |vertex| geometry::xy(&vertex.position))
}

pub(crate) fn is_placed(graph: &MolecularGraph, vertex_id: VertexId) -> bool {
    graph.vertex(vertex_id).is_some_and(|vertex| vertex.placed)
}

/// Angles of the directions from a vertex toward each placed neighbor.
pub(crate) fn occupied_angles(graph: &MolecularGraph, vertex_id: VertexId) -> Vec<f64> {
    let origin = planar(graph, vertex_id);
    graph
        .neighbors(vertex_id)
        .unwrap_or(&[])
        .iter()
        .filter(|(neighbor, _)| is_placed(graph, *neighbor))
        .map(|(neighbor, _)| geometry::angle_of(&(planar(graph, *neighbor) - origin)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(vertex_count: usize, edges: &[(usize, usize)]) -> (MolecularGraph, Vec<VertexId>) {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..vertex_count).map(|_| graph.add_vertex()).collect();
        for &(a, b) in edges {
            graph.add_edge(ids[a], ids[b]).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn acyclic_graph_has_no_systems() {
        let (graph, _) = build(4, &[(0, 1), (1, 2), (2, 3)]);
        let state = LayoutState::analyze(&graph);
        assert!(state.rings.is_empty());
        assert!(state.systems.is_empty());
        assert!(state.ring_vertices.is_empty());
    }

    #[test]
    fn fused_rings_share_one_system() {
        // Two hexagons sharing the 0-1 edge
        let (graph, _) = build(
            10,
            &[
                (0, 1),
                (0, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 1),
                (0, 6),
                (6, 7),
                (7, 8),
                (8, 9),
                (9, 1),
            ],
        );
        let state = LayoutState::analyze(&graph);
        assert_eq!(state.rings.len(), 2);
        assert_eq!(state.systems.len(), 1);
        assert_eq!(state.systems[0].vertices.len(), 10);
        assert_eq!(state.ring_edges.len(), 11);
        assert_eq!(state.ring_vertices.len(), 10);
    }

    #[test]
    fn spiro_rings_split_into_two_systems() {
        // Two five-rings sharing only vertex 0
        let (graph, ids) = build(
            9,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 0),
                (0, 5),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 0),
            ],
        );
        let state = LayoutState::analyze(&graph);
        assert_eq!(state.systems.len(), 2);
        assert!(state.systems.iter().all(|s| s.vertices.len() == 5));
        // The junction belongs to both systems
        assert!(state.systems.iter().all(|s| s.vertex_set.contains(&ids[0])));
        assert_eq!(state.system_of_vertex[&ids[0]].len(), 2);
        assert_eq!(state.system_of_vertex[&ids[1]].len(), 1);
    }

    #[test]
    fn ring_and_isolated_ring_form_separate_systems() {
        let (graph, _) = build(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let state = LayoutState::analyze(&graph);
        assert_eq!(state.systems.len(), 2);
    }

    #[test]
    fn place_marks_and_positions() {
        let (mut graph, ids) = build(2, &[(0, 1)]);
        let mut state = LayoutState::analyze(&graph);

        assert!(!is_placed(&graph, ids[0]));
        state.place(&mut graph, ids[0], Point2::new(2.0, -1.0));

        assert!(is_placed(&graph, ids[0]));
        assert!(state.newly_placed.contains(&ids[0]));
        assert_eq!(planar(&graph, ids[0]), Point2::new(2.0, -1.0));
        assert!(!is_placed(&graph, ids[1]));
    }

    #[test]
    fn occupied_angles_see_only_placed_neighbors() {
        let (mut graph, ids) = build(3, &[(0, 1), (0, 2)]);
        let mut state = LayoutState::analyze(&graph);
        state.place(&mut graph, ids[0], Point2::origin());
        state.place(&mut graph, ids[1], Point2::new(1.0, 0.0));

        let angles = occupied_angles(&graph, ids[0]);
        assert_eq!(angles.len(), 1);
        assert!((angles[0] - 0.0).abs() < 1e-9);
    }
}
