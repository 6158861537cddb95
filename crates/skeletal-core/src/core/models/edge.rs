use super::ids::VertexId;

pub const DEFAULT_EDGE_ORDER: f64 = 1.0;

/// Represents a connection between exactly two vertices of a molecular graph.
///
/// Edges carry a numeric order/weight (single bond = 1.0 by convention) that
/// the graph and layout algorithms treat as opaque. Whether an edge currently
/// participates in traversal is tracked by the owning graph's live/parked
/// bookkeeping, not by the edge itself, so an `Edge` value stays immutable
/// while it is temporarily disconnected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub vertex1_id: VertexId, // ID of the first endpoint
    pub vertex2_id: VertexId, // ID of the second endpoint
    pub order: f64,           // Order/weight value (default 1.0)
}

impl Edge {
    pub fn new(vertex1_id: VertexId, vertex2_id: VertexId, order: f64) -> Self {
        Self {
            vertex1_id,
            vertex2_id,
            order,
        }
    }

    pub fn contains(&self, vertex_id: VertexId) -> bool {
        self.vertex1_id == vertex_id || self.vertex2_id == vertex_id
    }

    /// Returns the endpoint opposite to `vertex_id`, or `None` if the given
    /// vertex is not an endpoint of this edge.
    pub fn other(&self, vertex_id: VertexId) -> Option<VertexId> {
        if vertex_id == self.vertex1_id {
            Some(self.vertex2_id)
        } else if vertex_id == self.vertex2_id {
            Some(self.vertex1_id)
        } else {
            None
        }
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.vertex1_id, self.vertex2_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_vertex_id(n: u64) -> VertexId {
        VertexId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn edge_new_initializes_fields_correctly() {
        let v1 = dummy_vertex_id(1);
        let v2 = dummy_vertex_id(2);
        let edge = Edge::new(v1, v2, 2.0);
        assert_eq!(edge.vertex1_id, v1);
        assert_eq!(edge.vertex2_id, v2);
        assert_eq!(edge.order, 2.0);
    }

    #[test]
    fn edge_contains_returns_true_for_both_endpoints() {
        let v1 = dummy_vertex_id(10);
        let v2 = dummy_vertex_id(20);
        let edge = Edge::new(v1, v2, DEFAULT_EDGE_ORDER);
        assert!(edge.contains(v1));
        assert!(edge.contains(v2));
        assert!(!edge.contains(dummy_vertex_id(30)));
    }

    #[test]
    fn edge_other_returns_opposite_endpoint() {
        let v1 = dummy_vertex_id(100);
        let v2 = dummy_vertex_id(200);
        let edge = Edge::new(v1, v2, DEFAULT_EDGE_ORDER);
        assert_eq!(edge.other(v1), Some(v2));
        assert_eq!(edge.other(v2), Some(v1));
        assert_eq!(edge.other(dummy_vertex_id(300)), None);
    }

    #[test]
    fn edge_endpoints_returns_pair_in_declaration_order() {
        let v1 = dummy_vertex_id(7);
        let v2 = dummy_vertex_id(8);
        let edge = Edge::new(v1, v2, DEFAULT_EDGE_ORDER);
        assert_eq!(edge.endpoints(), (v1, v2));
    }
}
