use super::backend::GraphBackend;
use crate::core::models::ids::{EdgeId, VertexId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Finds a shortest path between two vertices by breadth-first search.
///
/// # Arguments
///
/// * `from` - The starting vertex.
/// * `to` - The target vertex.
/// * `avoid` - Vertices the path must not pass through. A path whose
///   endpoint is itself avoided does not exist.
///
/// # Return
///
/// The path including both endpoints, or `None` when no path exists.
/// `from == to` yields the single-vertex path.
pub fn shortest_path<B: GraphBackend + ?Sized>(
    graph: &B,
    from: VertexId,
    to: VertexId,
    avoid: &[VertexId],
) -> Option<Vec<VertexId>> {
    let avoid: HashSet<VertexId> = avoid.iter().copied().collect();
    bfs_path(graph, from, to, &avoid, None)
}

/// Finds a shortest path between the endpoints of an edge that does not use
/// the edge itself. Used for per-edge shortest-cycle construction.
pub(crate) fn shortest_path_skipping_edge<B: GraphBackend + ?Sized>(
    graph: &B,
    from: VertexId,
    to: VertexId,
    skip_edge: EdgeId,
) -> Option<Vec<VertexId>> {
    bfs_path(graph, from, to, &HashSet::new(), Some(skip_edge))
}

fn bfs_path<B: GraphBackend + ?Sized>(
    graph: &B,
    from: VertexId,
    to: VertexId,
    avoid: &HashSet<VertexId>,
    skip_edge: Option<EdgeId>,
) -> Option<Vec<VertexId>> {
    if !graph.contains_vertex(from) || !graph.contains_vertex(to) {
        return None;
    }
    if avoid.contains(&from) || avoid.contains(&to) {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let mut predecessor: HashMap<VertexId, VertexId> = HashMap::new();
    let mut visited: HashSet<VertexId> = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for &(neighbor, edge_id) in graph.neighbors_of(current) {
            if Some(edge_id) == skip_edge
                || avoid.contains(&neighbor)
                || !visited.insert(neighbor)
            {
                continue;
            }
            predecessor.insert(neighbor, current);
            if neighbor == to {
                return Some(reconstruct(&predecessor, from, to));
            }
            queue.push_back(neighbor);
        }
    }
    None
}

fn reconstruct(
    predecessor: &HashMap<VertexId, VertexId>,
    from: VertexId,
    to: VertexId,
) -> Vec<VertexId> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = predecessor[&current];
        path.push(current);
    }
    path.reverse();
    path
}

/// Computes hop distances from `root` to every reachable vertex.
pub(crate) fn bfs_distances<B: GraphBackend + ?Sized>(
    graph: &B,
    root: VertexId,
) -> HashMap<VertexId, usize> {
    let mut distances = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(root, 0);
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[&current] + 1;
        for &(neighbor, _) in graph.neighbors_of(current) {
            if !distances.contains_key(&neighbor) {
                distances.insert(neighbor, next_distance);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

/// Computes the graph diameter as the longest shortest-path length, in
/// edge counts, over all vertex pairs.
///
/// # Return
///
/// Returns `None` for empty or disconnected graphs, for which the quantity
/// is undefined.
pub fn diameter<B: GraphBackend + ?Sized>(graph: &B) -> Option<usize> {
    let ids = graph.vertex_ids();
    if ids.is_empty() {
        return None;
    }

    let mut best = 0;
    for &root in &ids {
        let distances = bfs_distances(graph, root);
        if distances.len() != ids.len() {
            return None;
        }
        best = best.max(distances.values().copied().max().unwrap_or(0));
    }
    Some(best)
}
