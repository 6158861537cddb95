use super::backend::GraphBackend;
use super::components;
use crate::core::models::ids::{EdgeId, VertexId};
use std::collections::HashMap;

struct Frame {
    vertex: VertexId,
    parent_edge: Option<EdgeId>,
    next_neighbor: usize,
}

/// Finds every bridge of the graph: the live edges whose removal would
/// split their component.
///
/// Runs one depth-first low-link pass per component (Tarjan), iteratively
/// with an explicit frame stack so deep chains cannot overflow the call
/// stack.
///
/// # Return
///
/// Bridge edge IDs in sorted order.
pub fn bridges<B: GraphBackend + ?Sized>(graph: &B) -> Vec<EdgeId> {
    let mut discovery: HashMap<VertexId, usize> = HashMap::with_capacity(graph.vertex_count());
    let mut low: HashMap<VertexId, usize> = HashMap::with_capacity(graph.vertex_count());
    let mut found = Vec::new();
    let mut counter = 0usize;

    for root in graph.vertex_ids() {
        if discovery.contains_key(&root) {
            continue;
        }
        discovery.insert(root, counter);
        low.insert(root, counter);
        counter += 1;

        let mut stack = vec![Frame {
            vertex: root,
            parent_edge: None,
            next_neighbor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let vertex = frame.vertex;
            let neighbors = graph.neighbors_of(vertex);

            if frame.next_neighbor < neighbors.len() {
                let (neighbor, edge_id) = neighbors[frame.next_neighbor];
                frame.next_neighbor += 1;
                if Some(edge_id) == frame.parent_edge {
                    continue;
                }

                if let Some(&seen) = discovery.get(&neighbor) {
                    // Back edge: pull the earlier discovery time into low
                    let updated = low[&vertex].min(seen);
                    low.insert(vertex, updated);
                } else {
                    discovery.insert(neighbor, counter);
                    low.insert(neighbor, counter);
                    counter += 1;
                    stack.push(Frame {
                        vertex: neighbor,
                        parent_edge: Some(edge_id),
                        next_neighbor: 0,
                    });
                }
            } else {
                let finished = match stack.pop() {
                    Some(frame) => frame,
                    None => break,
                };
                if let Some(parent) = stack.last() {
                    let child_low = low[&finished.vertex];
                    let updated = low[&parent.vertex].min(child_low);
                    low.insert(parent.vertex, updated);
                    if child_low > discovery[&parent.vertex] {
                        if let Some(edge_id) = finished.parent_edge {
                            found.push(edge_id);
                        }
                    }
                }
            }
        }
    }

    found.sort_unstable();
    found
}

/// Decides whether one edge is a bridge by probing reachability with the
/// edge ignored. Does not mutate the graph and does not depend on the
/// all-bridges result.
pub fn is_bridge<B: GraphBackend + ?Sized>(
    graph: &B,
    edge_id: EdgeId,
    vertex1_id: VertexId,
    vertex2_id: VertexId,
) -> bool {
    let reachable = components::component_of(graph, vertex1_id, Some(edge_id));
    !reachable.contains(&vertex2_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::graph::MolecularGraph;

    fn create_triangle_with_tail() -> (MolecularGraph, Vec<VertexId>, EdgeId) {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..4).map(|_| graph.add_vertex()).collect();
        graph.add_edge(ids[0], ids[1]).unwrap();
        graph.add_edge(ids[1], ids[2]).unwrap();
        graph.add_edge(ids[2], ids[0]).unwrap();
        let tail = graph.add_edge(ids[2], ids[3]).unwrap();
        (graph, ids, tail)
    }

    #[test]
    fn every_chain_edge_is_a_bridge() {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..4).map(|_| graph.add_vertex()).collect();
        let mut edge_ids: Vec<EdgeId> = ids
            .windows(2)
            .map(|pair| graph.add_edge(pair[0], pair[1]).unwrap())
            .collect();
        edge_ids.sort_unstable();

        assert_eq!(bridges(&graph), edge_ids);
    }

    #[test]
    fn cycle_has_no_bridges() {
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..5).map(|_| graph.add_vertex()).collect();
        for i in 0..5 {
            graph.add_edge(ids[i], ids[(i + 1) % 5]).unwrap();
        }
        assert!(bridges(&graph).is_empty());
    }

    #[test]
    fn only_the_tail_of_a_ring_is_a_bridge() {
        let (graph, _, tail) = create_triangle_with_tail();
        assert_eq!(bridges(&graph), vec![tail]);
    }

    #[test]
    fn bridges_are_found_per_component() {
        let mut graph = MolecularGraph::new();
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        let c = graph.add_vertex();
        let d = graph.add_vertex();
        let mut expected = vec![
            graph.add_edge(a, b).unwrap(),
            graph.add_edge(c, d).unwrap(),
        ];
        expected.sort_unstable();

        assert_eq!(bridges(&graph), expected);
    }

    #[test]
    fn single_probe_agrees_with_batch_result() {
        let (graph, _, tail) = create_triangle_with_tail();
        for (edge_id, edge) in graph.edges_iter() {
            let expected = edge_id == tail;
            assert_eq!(
                is_bridge(&graph, edge_id, edge.vertex1_id, edge.vertex2_id),
                expected
            );
        }
    }

    #[test]
    fn removing_a_bridge_disconnects_and_a_ring_edge_does_not() {
        let (mut graph, ids, tail) = create_triangle_with_tail();
        let ring_edge = graph.edge_between(ids[0], ids[1]).unwrap();

        graph.temporarily_disconnect_edge(ring_edge);
        assert!(graph.is_connected());
        graph.reconnect_temporarily_disconnected_edge(ring_edge);

        graph.temporarily_disconnect_edge(tail);
        assert!(!graph.is_connected());
    }

    #[test]
    fn fused_rings_share_no_bridges() {
        // Two squares sharing an edge
        let mut graph = MolecularGraph::new();
        let ids: Vec<VertexId> = (0..6).map(|_| graph.add_vertex()).collect();
        graph.add_edge(ids[0], ids[1]).unwrap();
        graph.add_edge(ids[1], ids[2]).unwrap();
        graph.add_edge(ids[2], ids[3]).unwrap();
        graph.add_edge(ids[3], ids[0]).unwrap();
        graph.add_edge(ids[1], ids[4]).unwrap();
        graph.add_edge(ids[4], ids[5]).unwrap();
        graph.add_edge(ids[5], ids[2]).unwrap();

        assert!(bridges(&graph).is_empty());
    }
}
