use super::backend::GraphBackend;
use super::{components, paths};
use crate::core::models::ids::{EdgeId, VertexId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Computes a minimum cycle basis of the graph, the "smallest set of
/// smallest rings" used for layout and ring perception.
///
/// Candidate cycles are the shortest cycle through each live edge; they are
/// admitted shortest-first under independence over GF(2), where each cycle
/// is a bit vector indexed by edge. Fundamental cycles of a spanning forest
/// are appended as a fallback pool so the basis always reaches full rank,
/// `|E| - |V| + C` for `C` connected components.
///
/// # Return
///
/// One vertex cycle per independent loop, each in cyclic traversal order.
pub fn minimum_cycle_basis<B: GraphBackend + ?Sized>(graph: &B) -> Vec<Vec<VertexId>> {
    let live_edges = graph.live_edges();
    let component_count = components::connected_components(graph).len();
    let rank = (live_edges.len() + component_count).saturating_sub(graph.vertex_count());
    if rank == 0 {
        return Vec::new();
    }

    let edge_bits: HashMap<EdgeId, usize> = live_edges
        .iter()
        .enumerate()
        .map(|(index, &(edge_id, _, _))| (edge_id, index))
        .collect();
    let words = live_edges.len().div_ceil(64);

    let mut candidates: Vec<Vec<VertexId>> = live_edges
        .iter()
        .filter_map(|&(edge_id, u, v)| paths::shortest_path_skipping_edge(graph, u, v, edge_id))
        .collect();
    candidates.sort_by_key(Vec::len);

    let fundamentals = fundamental_cycles(graph, &live_edges);

    let mut reduced_rows: Vec<(usize, Vec<u64>)> = Vec::new();
    let mut basis: Vec<Vec<VertexId>> = Vec::new();
    for cycle in candidates.into_iter().chain(fundamentals) {
        if basis.len() == rank {
            break;
        }
        let Some(mut row) = cycle_row(graph, &cycle, &edge_bits, words) else {
            continue;
        };
        for (pivot, reduced) in &reduced_rows {
            if bit(&row, *pivot) {
                xor_assign(&mut row, reduced);
            }
        }
        if let Some(pivot) = highest_bit(&row) {
            reduced_rows.push((pivot, row));
            basis.push(cycle);
        }
    }
    basis
}

/// Resolves a vertex cycle into its edges, in the same cyclic order.
/// Consecutive vertices (wrapping around) that share no live edge are
/// skipped, so the result length matches the input only for valid cycles.
pub fn cycle_edges<B: GraphBackend + ?Sized>(graph: &B, cycle: &[VertexId]) -> Vec<EdgeId> {
    let mut edges = Vec::with_capacity(cycle.len());
    for (index, &from) in cycle.iter().enumerate() {
        let to = cycle[(index + 1) % cycle.len()];
        if let Some(&(_, edge_id)) = graph
            .neighbors_of(from)
            .iter()
            .find(|(neighbor, _)| *neighbor == to)
        {
            edges.push(edge_id);
        }
    }
    edges
}

fn cycle_row<B: GraphBackend + ?Sized>(
    graph: &B,
    cycle: &[VertexId],
    edge_bits: &HashMap<EdgeId, usize>,
    words: usize,
) -> Option<Vec<u64>> {
    let edges = cycle_edges(graph, cycle);
    if edges.len() != cycle.len() {
        return None;
    }
    let mut row = vec![0u64; words];
    for edge_id in edges {
        let index = *edge_bits.get(&edge_id)?;
        row[index / 64] ^= 1u64 << (index % 64);
    }
    Some(row)
}

/// One cycle per non-tree edge of a breadth-first spanning forest: the
/// tree path between the edge's endpoints, closed by the edge itself.
fn fundamental_cycles<B: GraphBackend + ?Sized>(
    graph: &B,
    live_edges: &[(EdgeId, VertexId, VertexId)],
) -> Vec<Vec<VertexId>> {
    let mut parent: HashMap<VertexId, VertexId> = HashMap::new();
    let mut depth: HashMap<VertexId, usize> = HashMap::new();
    let mut tree_edges: HashSet<EdgeId> = HashSet::new();

    for root in graph.vertex_ids() {
        if depth.contains_key(&root) {
            continue;
        }
        depth.insert(root, 0);
        let mut queue = VecDeque::from([root]);
        while let Some(current) = queue.pop_front() {
            let next_depth = depth[&current] + 1;
            for &(neighbor, edge_id) in graph.neighbors_of(current) {
                if depth.contains_key(&neighbor) {
                    continue;
                }
                depth.insert(neighbor, next_depth);
                parent.insert(neighbor, current);
                tree_edges.insert(edge_id);
                queue.push_back(neighbor);
            }
        }
    }

    live_edges
        .iter()
        .filter(|(edge_id, _, _)| !tree_edges.contains(edge_id))
        .map(|&(_, u, v)| close_tree_path(&parent, &depth, u, v))
        .collect()
}

fn close_tree_path(
    parent: &HashMap<VertexId, VertexId>,
    depth: &HashMap<VertexId, usize>,
    u: VertexId,
    v: VertexId,
) -> Vec<VertexId> {
    let mut left = vec![u];
    let mut right = vec![v];
    let mut left_cursor = u;
    let mut right_cursor = v;

    while depth[&left_cursor] > depth[&right_cursor] {
        left_cursor = parent[&left_cursor];
        left.push(left_cursor);
    }
    while depth[&right_cursor] > depth[&left_cursor] {
        right_cursor = parent[&right_cursor];
        right.push(right_cursor);
    }
    while left_cursor != right_cursor {
        left_cursor = parent[&left_cursor];
        left.push(left_cursor);
        right_cursor = parent[&right_cursor];
        right.push(right_cursor);
    }

    // Both arms end at the common ancestor; keep it once
    right.pop();
    left.extend(right.into_iter().rev());
    left
}

fn bit(row: &[u64], index: usize) -> bool {
    row[index / 64] & (1u64 << (index % 64)) != 0
}

fn xor_assign(row: &mut [u64], other: &[u64]) {
    for (word, other_word) in row.iter_mut().zip(other) {
        *word ^= other_word;
    }
}

fn highest_bit(row: &[u64]) -> Option<usize> {
    for (word_index, word) in row.iter().enumerate().rev() {
        if *word != 0 {
            return Some(word_index * 64 + 63 - word.leading_zeros() as usize);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::graph::MolecularGraph;

    fn create_cycle(length: usize) -> (MolecularGraph, Vec<VertexId>) {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..length).map(|_| graph.add_vertex()).collect();
        for i in 0..length {
            graph.add_edge(ids[i], ids[(i + 1) % length]).unwrap();
        }
        (graph, ids)
    }

    // Two hexagons sharing the 0-1 edge
    fn create_fused_hexagons() -> MolecularGraph {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..10).map(|_| graph.add_vertex()).collect();
        let edges = [
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
        ];
        for (a, b) in edges {
            graph.add_edge(ids[a], ids[b]).unwrap();
        }
        graph
    }

    // Two five-rings joined at a single shared vertex
    fn create_spiro_pentagons() -> MolecularGraph {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..9).map(|_| graph.add_vertex()).collect();
        for window in [[0, 1, 2, 3, 4], [0, 5, 6, 7, 8]] {
            for i in 0..5 {
                graph.add_edge(ids[window[i]], ids[window[(i + 1) % 5]]).unwrap();
            }
        }
        graph
    }

    // Five-ring and five-ring bridged over a one-carbon apex
    fn create_norbornane() -> MolecularGraph {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..7).map(|_| graph.add_vertex()).collect();
        let edges = [(0, 2), (2, 3), (3, 1), (0, 4), (4, 5), (5, 1), (0, 6), (6, 1)];
        for (a, b) in edges {
            graph.add_edge(ids[a], ids[b]).unwrap();
        }
        graph
    }

    fn assert_closed(graph: &MolecularGraph, cycle: &[VertexId]) {
        assert_eq!(cycle_edges(graph, cycle).len(), cycle.len());
    }

    #[test]
    fn acyclic_graphs_have_empty_basis() {
        let mut graph = MolecularGraph::new();
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        let c = graph.add_vertex();
        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, c).unwrap();

        assert!(minimum_cycle_basis(&graph).is_empty());
        assert!(minimum_cycle_basis(&MolecularGraph::new()).is_empty());
    }

    #[test]
    fn single_ring_is_its_own_basis() {
        let (graph, _) = create_cycle(6);
        let basis = minimum_cycle_basis(&graph);
        assert_eq!(basis.len(), 1);
        assert_eq!(basis[0].len(), 6);
        assert_closed(&graph, &basis[0]);
    }

    #[test]
    fn fused_hexagons_yield_two_six_rings() {
        let graph = create_fused_hexagons();
        let basis = minimum_cycle_basis(&graph);
        assert_eq!(basis.len(), 2);
        assert!(basis.iter().all(|cycle| cycle.len() == 6));
        for cycle in &basis {
            assert_closed(&graph, cycle);
        }
    }

    #[test]
    fn bridged_bicyclic_prefers_the_small_rings() {
        let graph = create_norbornane();
        let mut lengths: Vec<usize> = minimum_cycle_basis(&graph)
            .iter()
            .map(Vec::len)
            .collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![5, 5]);
    }

    #[test]
    fn spiro_rings_are_independent() {
        let graph = create_spiro_pentagons();
        let basis = minimum_cycle_basis(&graph);
        assert_eq!(basis.len(), 2);
        assert!(basis.iter().all(|cycle| cycle.len() == 5));
    }

    #[test]
    fn rank_counts_per_component() {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..6).map(|_| graph.add_vertex()).collect();
        for offset in [0, 3] {
            graph.add_edge(ids[offset], ids[offset + 1]).unwrap();
            graph.add_edge(ids[offset + 1], ids[offset + 2]).unwrap();
            graph.add_edge(ids[offset + 2], ids[offset]).unwrap();
        }

        let basis = minimum_cycle_basis(&graph);
        assert_eq!(basis.len(), 2);
        assert!(basis.iter().all(|cycle| cycle.len() == 3));
    }

    #[test]
    fn parked_edges_drop_out_of_the_basis() {
        let (mut graph, ids) = create_cycle(4);
        let edge = graph.edge_between(ids[0], ids[1]).unwrap();
        graph.temporarily_disconnect_edge(edge);
        assert!(minimum_cycle_basis(&graph).is_empty());
    }

    #[test]
    fn cycle_edges_follow_traversal_order() {
        let (graph, ids) = create_cycle(3);
        let edges = cycle_edges(&graph, &ids);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0], graph.edge_between(ids[0], ids[1]).unwrap());
        assert_eq!(edges[2], graph.edge_between(ids[2], ids[0]).unwrap());
    }
}
