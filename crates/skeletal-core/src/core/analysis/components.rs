use super::backend::GraphBackend;
use crate::core::models::ids::{EdgeId, VertexId};
use std::collections::{HashSet, VecDeque};

/// Partitions the vertices of a graph into maximal connected components.
///
/// Traversal follows live edges only. Components and the vertices within
/// them appear in discovery order, which is deterministic for a given
/// mutation history.
pub fn connected_components<B: GraphBackend + ?Sized>(graph: &B) -> Vec<Vec<VertexId>> {
    let mut visited: HashSet<VertexId> = HashSet::with_capacity(graph.vertex_count());
    let mut components = Vec::new();

    for root in graph.vertex_ids() {
        if !visited.contains(&root) {
            components.push(collect_from(graph, root, None, &mut visited));
        }
    }
    components
}

/// Collects the connected component containing `root`, optionally treating
/// one edge as absent.
///
/// The skip-edge form answers "which vertices stay reachable if this edge
/// were cut" without mutating the graph. Unknown roots yield an empty
/// component.
pub fn component_of<B: GraphBackend + ?Sized>(
    graph: &B,
    root: VertexId,
    skip_edge: Option<EdgeId>,
) -> Vec<VertexId> {
    if !graph.contains_vertex(root) {
        return Vec::new();
    }
    let mut visited = HashSet::new();
    collect_from(graph, root, skip_edge, &mut visited)
}

fn collect_from<B: GraphBackend + ?Sized>(
    graph: &B,
    root: VertexId,
    skip_edge: Option<EdgeId>,
    visited: &mut HashSet<VertexId>,
) -> Vec<VertexId> {
    let mut component = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(root);
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        component.push(current);
        for &(neighbor, edge_id) in graph.neighbors_of(current) {
            if Some(edge_id) == skip_edge || !visited.insert(neighbor) {
                continue;
            }
            queue.push_back(neighbor);
        }
    }
    component
}
