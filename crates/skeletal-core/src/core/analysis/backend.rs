use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::{EdgeId, VertexId};

/// Read-only view of a graph's live topology, as consumed by the analysis
/// algorithms in this module tree.
///
/// The algorithms are written against this trait rather than against
/// [`MolecularGraph`] directly, so alternative storages (immutable snapshots,
/// filtered overlays) can reuse them without conversion. Implementations must
/// expose only live edges: temporarily disconnected edges take no part in
/// connectivity.
pub trait GraphBackend {
    /// All vertex IDs, in a deterministic order.
    fn vertex_ids(&self) -> Vec<VertexId>;

    /// Whether the vertex exists in this graph.
    fn contains_vertex(&self, id: VertexId) -> bool;

    /// Live `(neighbor, edge)` pairs of a vertex; empty for unknown vertices.
    fn neighbors_of(&self, id: VertexId) -> &[(VertexId, EdgeId)];

    /// All live edges as `(edge, endpoint, endpoint)` triples, in a
    /// deterministic order.
    fn live_edges(&self) -> Vec<(EdgeId, VertexId, VertexId)>;

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}

impl GraphBackend for MolecularGraph {
    fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices_iter().map(|(id, _)| id).collect()
    }

    fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex(id).is_some()
    }

    fn neighbors_of(&self, id: VertexId) -> &[(VertexId, EdgeId)] {
        self.neighbors(id).unwrap_or(&[])
    }

    fn live_edges(&self) -> Vec<(EdgeId, VertexId, VertexId)> {
        self.edges_iter()
            .map(|(id, edge)| (id, edge.vertex1_id, edge.vertex2_id))
            .collect()
    }

    fn vertex_count(&self) -> usize {
        MolecularGraph::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        MolecularGraph::edge_count(self)
    }
}
